//! Wire payloads for chunk replication: full chunk snapshots and single
//! voxel deltas, with a compact binary encoding.

pub mod codec;
pub mod compress;
pub mod error;
pub mod format;
pub mod payload;

pub use codec::{decode, encode};
pub use error::NetError;
pub use format::{PacketHeader, PacketKind};
pub use payload::{apply, ChunkSnapshot, Payload, VoxelDelta};
