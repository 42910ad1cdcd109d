use thiserror::Error;
use voxen_world::WorldError;

/// Errors returned by [`crate::Session`].
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    World(#[from] WorldError),

    /// The session's event subscription was removed from the world's bus.
    #[error("session event queue is detached from the world")]
    EventsDetached,
}
