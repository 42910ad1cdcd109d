//! Shared voxel types, constants and coordinate-space math.
//!
//! Four coordinate spaces form one conversion lattice:
//! chunk-space ([`ChunkCoord`]), local-space ([`LocalCoord`]),
//! voxel-space ([`VoxelCoord`]) and world-space ([`WorldCoord`]).
//! Everything here is pure and stateless.

pub mod constants;
pub mod direction;
pub mod hash;
pub mod math;
pub mod types;

pub use types::{ChunkCoord, LocalCoord, Voxel, VoxelCoord, WorldCoord};
