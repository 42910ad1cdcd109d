//! Tick-driven simulation over a voxel world: ECS components, per-tick
//! passes and the [`Session`] that sequences them.

pub mod components;
pub mod error;
pub mod passes;
pub mod session;

#[cfg(test)]
mod test_harness;

pub use components::{ChunkEntity, Collision, Head, Transform, Velocity};
pub use error::SessionError;
pub use passes::dirty::DirtyChunks;
pub use passes::movement::integrate_velocity;
pub use session::{Session, TickReport, VoxelChange};
