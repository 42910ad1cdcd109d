use voxen_world::WorldError;

/// Errors decoding or applying wire payloads.
#[derive(Debug, thiserror::Error)]
pub enum NetError {
    #[error("invalid magic bytes (expected VXN1)")]
    InvalidMagic,

    #[error("unknown packet kind {0}")]
    UnknownKind(u8),

    #[error("truncated packet: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("packet has {0} trailing bytes")]
    TrailingBytes(usize),

    #[error("LZ4 decompression failed: {0}")]
    Decompress(String),

    #[error("invalid chunk size: expected {expected} bytes, got {actual}")]
    InvalidChunkSize { expected: usize, actual: usize },

    #[error("invalid fill body (expected 4 bytes, got {0})")]
    InvalidFill(usize),

    #[error(transparent)]
    World(#[from] WorldError),
}
