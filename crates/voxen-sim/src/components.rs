//! Component schemas shared by the simulation, renderer and network sync.

use glam::Vec3;
use voxen_core::math::world_to_voxel;
use voxen_core::{ChunkCoord, VoxelCoord, WorldCoord};

/// Position in chunk-relative space plus orientation (Euler angles, radians).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    pub position: WorldCoord,
    pub angles: Vec3,
}

impl Transform {
    pub fn at(position: WorldCoord) -> Self {
        Self {
            position,
            angles: Vec3::ZERO,
        }
    }
}

/// Per-second linear and angular rates applied by the movement pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub linear: Vec3,
    pub angular: Vec3,
}

impl Velocity {
    pub fn linear(linear: Vec3) -> Self {
        Self {
            linear,
            angular: Vec3::ZERO,
        }
    }
}

/// Look orientation and eye offset relative to the body transform.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Head {
    pub angles: Vec3,
    pub offset: Vec3,
}

/// Axis-aligned box centred on the transform position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    pub half_extents: Vec3,
}

impl Default for Collision {
    fn default() -> Self {
        // Roughly a standing player.
        Self {
            half_extents: Vec3::new(0.3, 0.9, 0.3),
        }
    }
}

impl Collision {
    /// Inclusive range of voxels the box overlaps at `position`.
    pub fn voxel_bounds(&self, position: WorldCoord) -> (VoxelCoord, VoxelCoord) {
        let min = position.translated(-self.half_extents);
        let max = position.translated(self.half_extents);
        (world_to_voxel(min), world_to_voxel(max))
    }
}

/// Marker for the entity that stands in for a loaded chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkEntity {
    pub coord: ChunkCoord,
}
