use crate::constants::{CHUNK_AREA, CHUNK_SIZE, CHUNK_SIZE_F, CHUNK_VOLUME};
use crate::types::{ChunkCoord, LocalCoord, VoxelCoord, WorldCoord};
use glam::{DVec3, IVec3, Vec3};

/// Convert a voxel-space coordinate to its containing chunk coordinate.
pub fn voxel_to_chunk(voxel: VoxelCoord) -> ChunkCoord {
    IVec3::new(
        voxel.x.div_euclid(CHUNK_SIZE),
        voxel.y.div_euclid(CHUNK_SIZE),
        voxel.z.div_euclid(CHUNK_SIZE),
    )
}

/// Convert a voxel-space coordinate to its local offset within a chunk.
pub fn voxel_to_local(voxel: VoxelCoord) -> LocalCoord {
    IVec3::new(
        voxel.x.rem_euclid(CHUNK_SIZE),
        voxel.y.rem_euclid(CHUNK_SIZE),
        voxel.z.rem_euclid(CHUNK_SIZE),
    )
}

/// Convert a chunk coordinate and local offset back to voxel-space.
pub fn chunk_local_to_voxel(chunk: ChunkCoord, local: LocalCoord) -> VoxelCoord {
    chunk * CHUNK_SIZE + local
}

/// The voxel containing a world-space position. Negative offsets floor
/// into the previous voxel.
pub fn world_to_voxel(world: WorldCoord) -> VoxelCoord {
    world.chunk * CHUNK_SIZE + world.local.floor().as_ivec3()
}

/// World-space position of a voxel's minimum corner.
pub fn voxel_to_world(voxel: VoxelCoord) -> WorldCoord {
    WorldCoord {
        chunk: voxel_to_chunk(voxel),
        local: voxel_to_local(voxel).as_vec3(),
    }
}

/// Carry whole chunk widths out of the local offset into the chunk index.
///
/// Afterwards every axis satisfies `|local| < CHUNK_SIZE` and the offset
/// keeps its sign. Dividing by a power of two is exact, so the carry never
/// rounds across a chunk boundary.
pub fn renormalize(world: WorldCoord) -> WorldCoord {
    let carry = (world.local / CHUNK_SIZE_F).trunc();
    WorldCoord {
        chunk: world.chunk + carry.as_ivec3(),
        local: world.local - carry * CHUNK_SIZE_F,
    }
}

/// Whether each axis of `local` lies in `[0, CHUNK_SIZE)`.
pub fn is_local_in_bounds(local: LocalCoord) -> bool {
    local.cmpge(IVec3::ZERO).all() && local.cmplt(IVec3::splat(CHUNK_SIZE)).all()
}

/// Flat storage index: `x + y*CHUNK_SIZE + z*CHUNK_SIZE^2`.
///
/// Panics if `local` is out of range; callers resolve through
/// [`voxel_to_local`] first.
pub fn local_to_index(local: LocalCoord) -> usize {
    assert!(
        is_local_in_bounds(local),
        "local coordinate {local} outside chunk bounds"
    );
    local.x as usize + local.y as usize * CHUNK_SIZE as usize + local.z as usize * CHUNK_AREA
}

/// Inverse of [`local_to_index`].
pub fn index_to_local(index: usize) -> LocalCoord {
    assert!(index < CHUNK_VOLUME, "voxel index {index} outside chunk");
    let cs = CHUNK_SIZE as usize;
    IVec3::new(
        (index % cs) as i32,
        ((index / cs) % cs) as i32,
        (index / CHUNK_AREA) as i32,
    )
}

impl WorldCoord {
    /// Split an absolute double-precision position into chunk + offset.
    pub fn from_absolute(position: DVec3) -> Self {
        let size = CHUNK_SIZE as f64;
        let chunk = (position / size).floor();
        Self {
            chunk: chunk.as_ivec3(),
            local: (position - chunk * size).as_vec3(),
        }
    }

    /// Absolute position in double precision.
    pub fn to_absolute(&self) -> DVec3 {
        self.chunk.as_dvec3() * CHUNK_SIZE as f64 + self.local.as_dvec3()
    }

    /// Offset from `origin` to `self`, e.g. for camera-relative rendering.
    /// The chunk difference is taken in integers first, so nearby positions
    /// stay precise no matter how far both are from the world origin.
    pub fn relative_to(&self, origin: &WorldCoord) -> Vec3 {
        (self.chunk - origin.chunk).as_vec3() * CHUNK_SIZE_F + (self.local - origin.local)
    }

    /// Add a float displacement and renormalize.
    pub fn translated(&self, delta: Vec3) -> Self {
        renormalize(Self {
            chunk: self.chunk,
            local: self.local + delta,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voxel_to_chunk_positive() {
        assert_eq!(voxel_to_chunk(IVec3::new(0, 0, 0)), IVec3::ZERO);
        assert_eq!(voxel_to_chunk(IVec3::new(31, 31, 31)), IVec3::ZERO);
        assert_eq!(voxel_to_chunk(IVec3::new(32, 0, 0)), IVec3::new(1, 0, 0));
    }

    #[test]
    fn test_voxel_to_chunk_negative() {
        assert_eq!(voxel_to_chunk(IVec3::new(-1, 0, 0)), IVec3::new(-1, 0, 0));
        assert_eq!(voxel_to_chunk(IVec3::new(-32, 0, 0)), IVec3::new(-1, 0, 0));
        assert_eq!(voxel_to_chunk(IVec3::new(-33, 0, 0)), IVec3::new(-2, 0, 0));
    }

    #[test]
    fn test_voxel_to_local_negative() {
        assert_eq!(voxel_to_local(IVec3::new(-1, 0, 0)), IVec3::new(31, 0, 0));
        assert_eq!(voxel_to_local(IVec3::new(-32, 0, 0)), IVec3::ZERO);
        assert_eq!(voxel_to_local(IVec3::new(33, -33, 5)), IVec3::new(1, 31, 5));
    }

    #[test]
    fn test_chunk_local_roundtrip() {
        let samples = [
            IVec3::new(-50, 100, 3),
            IVec3::new(0, 0, 0),
            IVec3::new(-1, -1, -1),
            IVec3::new(31, 32, 33),
            IVec3::new(-1_000_000, 999_999, -32),
        ];
        for voxel in samples {
            let back = chunk_local_to_voxel(voxel_to_chunk(voxel), voxel_to_local(voxel));
            assert_eq!(back, voxel, "roundtrip failed for {voxel}");
        }
    }

    #[test]
    fn test_local_is_always_in_bounds() {
        for x in -70..70 {
            let local = voxel_to_local(IVec3::new(x, -x, x * 3));
            assert!(is_local_in_bounds(local), "{local} out of bounds");
        }
    }

    #[test]
    fn test_world_to_voxel_floors_negative_offset() {
        let world = WorldCoord::new(IVec3::new(1, 0, 0), Vec3::new(-0.5, 2.25, 31.9));
        assert_eq!(world_to_voxel(world), IVec3::new(31, 2, 31));
    }

    #[test]
    fn test_voxel_to_world_is_min_corner() {
        let world = voxel_to_world(IVec3::new(-1, 40, 5));
        assert_eq!(world.chunk, IVec3::new(-1, 1, 0));
        assert_eq!(world.local, Vec3::new(31.0, 8.0, 5.0));
        assert_eq!(world_to_voxel(world), IVec3::new(-1, 40, 5));
    }

    #[test]
    fn test_renormalize_carries_into_chunk() {
        let world = WorldCoord::new(IVec3::ZERO, Vec3::new(32.5, 0.0, 0.0));
        let norm = renormalize(world);
        assert_eq!(norm.chunk, IVec3::new(1, 0, 0));
        assert_eq!(norm.local, Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn test_renormalize_negative_and_large() {
        let world = WorldCoord::new(IVec3::new(5, 5, 5), Vec3::new(-40.0, 200.0, -32.0));
        let norm = renormalize(world);
        assert_eq!(norm.chunk, IVec3::new(4, 11, 4));
        assert_eq!(norm.local, Vec3::new(-8.0, 8.0, 0.0));
    }

    #[test]
    fn test_renormalize_idempotent_and_bounded() {
        let offsets = [
            Vec3::new(31.999, -31.999, 0.0),
            Vec3::new(64.0, -64.0, 1e6),
            Vec3::new(-0.001, 95.5, -1e5),
            Vec3::new(33.3, 33.3, -33.3),
        ];
        for local in offsets {
            let once = renormalize(WorldCoord::new(IVec3::new(-3, 7, 0), local));
            let twice = renormalize(once);
            assert_eq!(once, twice);
            assert!(
                once.local.abs().cmplt(Vec3::splat(CHUNK_SIZE_F)).all(),
                "offset {} not bounded",
                once.local
            );
        }
    }

    #[test]
    fn test_renormalize_preserves_absolute_position() {
        let world = WorldCoord::new(IVec3::new(2, -1, 0), Vec3::new(70.25, -3.5, 31.0));
        let norm = renormalize(world);
        assert_eq!(norm.to_absolute(), world.to_absolute());
    }

    #[test]
    fn test_local_index_layout() {
        assert_eq!(local_to_index(IVec3::new(0, 0, 0)), 0);
        assert_eq!(local_to_index(IVec3::new(1, 0, 0)), 1);
        assert_eq!(local_to_index(IVec3::new(0, 1, 0)), 32);
        assert_eq!(local_to_index(IVec3::new(0, 0, 1)), 1024);
        assert_eq!(local_to_index(IVec3::new(31, 31, 31)), CHUNK_VOLUME - 1);
        for index in [0, 1, 33, 1025, 4000, CHUNK_VOLUME - 1] {
            assert_eq!(local_to_index(index_to_local(index)), index);
        }
    }

    #[test]
    #[should_panic]
    fn test_local_index_out_of_range_panics() {
        local_to_index(IVec3::new(32, 0, 0));
    }

    #[test]
    fn test_absolute_roundtrip() {
        let position = DVec3::new(-1234.75, 5.5, 1_000_000.25);
        let world = WorldCoord::from_absolute(position);
        assert!(world.local.cmpge(Vec3::ZERO).all());
        assert_eq!(world.to_absolute(), position);
    }

    #[test]
    fn test_relative_to_far_from_origin() {
        let origin = WorldCoord::new(IVec3::new(1_000_000, 0, 0), Vec3::new(31.0, 0.0, 0.0));
        let other = WorldCoord::new(IVec3::new(1_000_001, 0, 0), Vec3::new(0.5, 1.0, 0.0));
        assert_eq!(other.relative_to(&origin), Vec3::new(1.5, 1.0, 0.0));
    }
}
