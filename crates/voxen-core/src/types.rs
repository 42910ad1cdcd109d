use glam::{IVec3, Vec3};

/// Voxel identifier. 32 bits wide; 0 is air.
pub type Voxel = u32;

/// Chunk index in chunk-space (each unit = CHUNK_SIZE voxels).
pub type ChunkCoord = IVec3;

/// Position inside a chunk, each axis in `[0, CHUNK_SIZE)`.
pub type LocalCoord = IVec3;

/// Position on the global voxel grid.
pub type VoxelCoord = IVec3;

/// Sub-voxel position: a chunk index plus a float offset inside it.
///
/// The offset is kept below one chunk width per axis by
/// [`crate::math::renormalize`], so precision does not degrade with
/// distance from the origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldCoord {
    pub chunk: ChunkCoord,
    pub local: Vec3,
}

impl WorldCoord {
    pub const ORIGIN: Self = Self {
        chunk: IVec3::ZERO,
        local: Vec3::ZERO,
    };

    pub fn new(chunk: ChunkCoord, local: Vec3) -> Self {
        Self { chunk, local }
    }
}
