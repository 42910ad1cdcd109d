use std::fmt;

use hecs::Entity;
use voxen_core::constants::{CHUNK_VOLUME, NULL_VOXEL, VOXEL_MAX};
use voxen_core::math::local_to_index;
use voxen_core::{LocalCoord, Voxel};

use crate::error::WorldError;

/// Voxel storage for one `CHUNK_SIZE`^3 region.
///
/// Voxels live in a flat array indexed by
/// [`voxen_core::math::local_to_index`]. The entity handle is a
/// non-owning back-reference: the entity registry owns the entity, and
/// readers revalidate it through [`crate::World::chunk_entity`].
#[derive(Clone, PartialEq, Eq)]
pub struct Chunk {
    voxels: Box<[Voxel]>,
    entity: Option<Entity>,
}

impl Default for Chunk {
    fn default() -> Self {
        Self::new()
    }
}

impl Chunk {
    /// Create an all-air chunk with no associated entity.
    pub fn new() -> Self {
        Self {
            voxels: vec![NULL_VOXEL; CHUNK_VOLUME].into_boxed_slice(),
            entity: None,
        }
    }

    /// Create an all-air chunk already associated with `entity`.
    pub fn with_entity(entity: Entity) -> Self {
        Self {
            entity: Some(entity),
            ..Self::new()
        }
    }

    /// Wrap generated or received voxel data. The length must be exactly
    /// `CHUNK_VOLUME` and no voxel may be `VOXEL_MAX`.
    pub fn from_voxels(voxels: Vec<Voxel>) -> Result<Self, WorldError> {
        if voxels.len() != CHUNK_VOLUME {
            return Err(WorldError::InvalidChunkSize {
                expected: CHUNK_VOLUME,
                actual: voxels.len(),
            });
        }
        if voxels.contains(&VOXEL_MAX) {
            return Err(WorldError::ReservedVoxel(VOXEL_MAX));
        }
        Ok(Self {
            voxels: voxels.into_boxed_slice(),
            entity: None,
        })
    }

    /// Read one voxel. Panics if `local` is outside the chunk.
    pub fn get(&self, local: LocalCoord) -> Voxel {
        self.voxels[local_to_index(local)]
    }

    /// Write one voxel and return the previous value. Panics if `local` is
    /// outside the chunk.
    pub fn set(&mut self, local: LocalCoord, voxel: Voxel) -> Voxel {
        std::mem::replace(&mut self.voxels[local_to_index(local)], voxel)
    }

    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    pub fn fill(&mut self, voxel: Voxel) {
        self.voxels.fill(voxel);
    }

    /// Whether every voxel is air.
    pub fn is_empty(&self) -> bool {
        self.voxels.iter().all(|&v| v == NULL_VOXEL)
    }

    pub fn non_null_count(&self) -> usize {
        self.voxels.iter().filter(|&&v| v != NULL_VOXEL).count()
    }

    /// Associated entity handle, unvalidated.
    pub fn entity(&self) -> Option<Entity> {
        self.entity
    }

    pub(crate) fn set_entity(&mut self, entity: Option<Entity>) {
        self.entity = entity;
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("non_null", &self.non_null_count())
            .field("entity", &self.entity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;

    #[test]
    fn test_new_chunk_is_air() {
        let chunk = Chunk::new();
        assert_eq!(chunk.voxels().len(), CHUNK_VOLUME);
        assert!(chunk.is_empty());
        assert!(chunk.entity().is_none());
    }

    #[test]
    fn test_set_returns_previous() {
        let mut chunk = Chunk::new();
        let local = IVec3::new(5, 5, 5);
        assert_eq!(chunk.set(local, 7), NULL_VOXEL);
        assert_eq!(chunk.set(local, 9), 7);
        assert_eq!(chunk.get(local), 9);
        assert_eq!(chunk.get(IVec3::new(5, 5, 6)), NULL_VOXEL);
        assert_eq!(chunk.non_null_count(), 1);
    }

    #[test]
    fn test_set_null_clears() {
        let mut chunk = Chunk::new();
        chunk.set(IVec3::new(0, 0, 0), 3);
        chunk.set(IVec3::new(0, 0, 0), NULL_VOXEL);
        assert!(chunk.is_empty());
    }

    #[test]
    fn test_fill() {
        let mut chunk = Chunk::new();
        chunk.fill(4);
        assert_eq!(chunk.non_null_count(), CHUNK_VOLUME);
        assert_eq!(chunk.get(IVec3::new(31, 31, 31)), 4);
    }

    #[test]
    fn test_from_voxels_validates_length() {
        assert!(Chunk::from_voxels(vec![0; CHUNK_VOLUME]).is_ok());
        let err = Chunk::from_voxels(vec![0; 10]).expect_err("short storage must fail");
        assert!(matches!(
            err,
            WorldError::InvalidChunkSize {
                expected: CHUNK_VOLUME,
                actual: 10
            }
        ));
    }

    #[test]
    fn test_from_voxels_rejects_reserved_value() {
        let mut voxels = vec![0; CHUNK_VOLUME];
        voxels[CHUNK_VOLUME - 1] = VOXEL_MAX;
        assert!(matches!(
            Chunk::from_voxels(voxels),
            Err(WorldError::ReservedVoxel(VOXEL_MAX))
        ));
        assert!(Chunk::from_voxels(vec![VOXEL_MAX - 1; CHUNK_VOLUME]).is_ok());
    }

    #[test]
    fn test_from_voxels_layout() {
        let mut voxels = vec![0; CHUNK_VOLUME];
        voxels[1 + 2 * 32 + 3 * 1024] = 11;
        let chunk = Chunk::from_voxels(voxels).expect("valid storage");
        assert_eq!(chunk.get(IVec3::new(1, 2, 3)), 11);
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_get_panics() {
        Chunk::new().get(IVec3::new(0, -1, 0));
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_set_panics() {
        Chunk::new().set(IVec3::new(0, 0, 32), 1);
    }
}
