use std::collections::hash_map::Entry;
use std::collections::HashMap;

use hecs::Entity;
use voxen_core::direction::ALL_FACES;
use voxen_core::hash::CoordMap;
use voxen_core::ChunkCoord;

use crate::chunk::Chunk;

/// Spatial container for all loaded chunks, plus the reverse lookup from
/// associated entity to chunk coordinate.
///
/// Every chunk has exactly one entry and at most one entity; an entity is
/// associated with at most one chunk.
#[derive(Default)]
pub struct ChunkMap {
    chunks: CoordMap<ChunkCoord, Chunk>,
    owners: HashMap<Entity, ChunkCoord>,
}

impl ChunkMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the chunk at `coord`.
    ///
    /// A replacement without its own entity inherits the previous chunk's
    /// entity. Returns the replaced chunk (if any) and the stored chunk.
    pub fn insert(&mut self, coord: ChunkCoord, mut chunk: Chunk) -> (Option<Chunk>, &Chunk) {
        if let Some(entity) = chunk.entity() {
            self.release_entity(entity, coord);
            self.owners.insert(entity, coord);
        }

        match self.chunks.entry(coord) {
            Entry::Occupied(mut slot) => {
                let previous_entity = slot.get().entity();
                match (chunk.entity(), previous_entity) {
                    (None, inherited) => chunk.set_entity(inherited),
                    (Some(new), Some(old)) if new != old => {
                        self.owners.remove(&old);
                    }
                    _ => {}
                }
                let previous = std::mem::replace(slot.get_mut(), chunk);
                (Some(previous), slot.into_mut())
            }
            Entry::Vacant(slot) => (None, slot.insert(chunk)),
        }
    }

    /// Remove a chunk, dropping its entity association.
    pub fn remove(&mut self, coord: &ChunkCoord) -> Option<Chunk> {
        let chunk = self.chunks.remove(coord)?;
        if let Some(entity) = chunk.entity() {
            self.owners.remove(&entity);
        }
        Some(chunk)
    }

    /// Get a chunk by coordinate.
    pub fn get(&self, coord: &ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(coord)
    }

    pub(crate) fn get_mut(&mut self, coord: &ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(coord)
    }

    pub fn contains(&self, coord: &ChunkCoord) -> bool {
        self.chunks.contains_key(coord)
    }

    /// Associate `entity` with the chunk at `coord`, detaching it from any
    /// other chunk first. Returns the entity previously attached to this
    /// chunk, or `None` if the chunk is absent.
    pub fn attach_entity(&mut self, coord: ChunkCoord, entity: Entity) -> Option<Option<Entity>> {
        if !self.chunks.contains_key(&coord) {
            return None;
        }
        self.release_entity(entity, coord);
        let chunk = self.chunks.get_mut(&coord)?;
        let previous = chunk.entity();
        if let Some(old) = previous {
            self.owners.remove(&old);
        }
        chunk.set_entity(Some(entity));
        self.owners.insert(entity, coord);
        Some(previous)
    }

    /// Drop the association for `entity`. Returns the chunk it was attached to.
    pub fn detach_entity(&mut self, entity: Entity) -> Option<ChunkCoord> {
        let coord = self.owners.remove(&entity)?;
        if let Some(chunk) = self.chunks.get_mut(&coord) {
            chunk.set_entity(None);
        }
        Some(coord)
    }

    /// Reverse lookup: which chunk is `entity` attached to.
    pub fn entity_chunk(&self, entity: Entity) -> Option<ChunkCoord> {
        self.owners.get(&entity).copied()
    }

    /// Clear `entity` from whichever chunk other than `keep` holds it.
    fn release_entity(&mut self, entity: Entity, keep: ChunkCoord) {
        if let Some(old_coord) = self.owners.get(&entity).copied() {
            if old_coord != keep {
                if let Some(chunk) = self.chunks.get_mut(&old_coord) {
                    chunk.set_entity(None);
                }
                self.owners.remove(&entity);
            }
        }
    }

    /// Get the 6 face-adjacent neighbor coordinates for a chunk.
    pub fn face_neighbors(coord: &ChunkCoord) -> [ChunkCoord; 6] {
        ALL_FACES.map(|face| *coord + face.offset())
    }

    /// Iterator over all loaded chunks.
    pub fn iter(&self) -> impl Iterator<Item = (&ChunkCoord, &Chunk)> {
        self.chunks.iter()
    }

    /// Coordinates of all loaded chunks.
    pub fn coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.keys().copied()
    }

    /// Number of loaded chunks.
    pub fn loaded_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;

    fn spawn_entities(count: usize) -> (hecs::World, Vec<Entity>) {
        let mut registry = hecs::World::new();
        let entities = (0..count).map(|_| registry.spawn((0u32,))).collect();
        (registry, entities)
    }

    #[test]
    fn test_chunk_map_spatial_queries() {
        let mut map = ChunkMap::new();
        let coord = IVec3::new(1, 1, 1);
        let (previous, _) = map.insert(coord, Chunk::new());
        assert!(previous.is_none());
        assert!(map.get(&coord).is_some());

        let neighbors = ChunkMap::face_neighbors(&coord);
        assert_eq!(neighbors.len(), 6);
        assert!(neighbors.contains(&IVec3::new(0, 1, 1)));
        assert!(neighbors.contains(&IVec3::new(2, 1, 1)));

        assert!(map.remove(&coord).is_some());
        assert!(map.get(&coord).is_none());
        assert!(map.is_empty());
    }

    #[test]
    fn test_insert_replace_keeps_single_entry() {
        let mut map = ChunkMap::new();
        let coord = IVec3::new(2, -1, 3);
        map.insert(coord, Chunk::new());
        let mut filled = Chunk::new();
        filled.fill(5);
        let (previous, stored) = map.insert(coord, filled);
        assert!(previous.expect("replaced chunk").is_empty());
        assert_eq!(stored.non_null_count(), stored.voxels().len());
        assert_eq!(map.loaded_count(), 1);
    }

    #[test]
    fn test_replace_inherits_entity() {
        let (_registry, entities) = spawn_entities(1);
        let mut map = ChunkMap::new();
        let coord = IVec3::ZERO;
        map.insert(coord, Chunk::with_entity(entities[0]));
        let (_, stored) = map.insert(coord, Chunk::new());
        assert_eq!(stored.entity(), Some(entities[0]));
        assert_eq!(map.entity_chunk(entities[0]), Some(coord));
    }

    #[test]
    fn test_replace_with_new_entity_drops_old_owner() {
        let (_registry, entities) = spawn_entities(2);
        let mut map = ChunkMap::new();
        let coord = IVec3::ZERO;
        map.insert(coord, Chunk::with_entity(entities[0]));
        map.insert(coord, Chunk::with_entity(entities[1]));
        assert_eq!(map.entity_chunk(entities[0]), None);
        assert_eq!(map.entity_chunk(entities[1]), Some(coord));
    }

    #[test]
    fn test_attach_moves_entity_between_chunks() {
        let (_registry, entities) = spawn_entities(1);
        let entity = entities[0];
        let mut map = ChunkMap::new();
        let a = IVec3::new(0, 0, 0);
        let b = IVec3::new(1, 0, 0);
        map.insert(a, Chunk::new());
        map.insert(b, Chunk::new());

        assert_eq!(map.attach_entity(a, entity), Some(None));
        assert_eq!(map.entity_chunk(entity), Some(a));

        map.attach_entity(b, entity);
        assert_eq!(map.entity_chunk(entity), Some(b));
        assert_eq!(map.get(&a).expect("a").entity(), None);
        assert_eq!(map.get(&b).expect("b").entity(), Some(entity));
    }

    #[test]
    fn test_attach_to_absent_chunk() {
        let (_registry, entities) = spawn_entities(1);
        let mut map = ChunkMap::new();
        assert_eq!(map.attach_entity(IVec3::ZERO, entities[0]), None);
        assert_eq!(map.entity_chunk(entities[0]), None);
    }

    #[test]
    fn test_remove_and_detach_clear_reverse_lookup() {
        let (_registry, entities) = spawn_entities(2);
        let mut map = ChunkMap::new();
        map.insert(IVec3::ZERO, Chunk::with_entity(entities[0]));
        map.insert(IVec3::X, Chunk::with_entity(entities[1]));

        map.remove(&IVec3::ZERO);
        assert_eq!(map.entity_chunk(entities[0]), None);

        assert_eq!(map.detach_entity(entities[1]), Some(IVec3::X));
        assert_eq!(map.get(&IVec3::X).expect("chunk").entity(), None);
        assert_eq!(map.detach_entity(entities[1]), None);
    }
}
