use glam::Vec3;
use thiserror::Error;
use voxen_core::{ChunkCoord, Voxel};

/// Errors returned by world registry operations.
#[derive(Debug, Error)]
pub enum WorldError {
    /// Writes require the owning chunk to be present already.
    #[error("chunk {0} is not loaded")]
    ChunkNotLoaded(ChunkCoord),

    #[error("voxel value {0:#x} is reserved and cannot be stored")]
    ReservedVoxel(Voxel),

    #[error("chunk storage has {actual} voxels, expected {expected}")]
    InvalidChunkSize { expected: usize, actual: usize },

    #[error("ray direction {0} is zero or not finite")]
    DegenerateRay(Vec3),

    #[error("pick distance {0} must be finite and non-negative")]
    InvalidPickDistance(f32),

    /// The mutation was applied but a subscriber failed while handling
    /// the resulting event.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Failure reported by an event subscriber.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("{0}")]
    Failed(String),

    /// The subscriber can no longer receive events and should be dropped.
    #[error("subscriber disconnected")]
    Disconnected,
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        HandlerError::Failed(message.to_string())
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        HandlerError::Failed(message)
    }
}

/// A subscriber failed during synchronous dispatch. Delivery of that event
/// stopped at the failing subscriber.
#[derive(Debug, Error)]
#[error("subscriber '{subscriber}' failed handling {event} for chunk {coord}: {source}")]
pub struct DispatchError {
    pub subscriber: String,
    pub event: &'static str,
    pub coord: ChunkCoord,
    #[source]
    pub source: HandlerError,
}

/// Errors loading or validating a [`crate::config::WorldConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config RON: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}
