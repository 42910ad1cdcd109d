use voxen_core::direction::border_faces;
use voxen_core::hash::CoordSet;
use voxen_core::{ChunkCoord, LocalCoord};
use voxen_world::ChunkMap;

/// Chunks whose mesh must be rebuilt before the next frame.
#[derive(Debug, Default)]
pub struct DirtyChunks {
    chunks: CoordSet<ChunkCoord>,
}

impl DirtyChunks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, coord: ChunkCoord) {
        self.chunks.insert(coord);
    }

    /// Mark a chunk and its six face neighbours, e.g. after the chunk
    /// appears or is replaced wholesale.
    pub fn mark_with_neighbors(&mut self, coord: ChunkCoord) {
        self.mark(coord);
        self.mark_neighbors(coord);
    }

    pub fn mark_neighbors(&mut self, coord: ChunkCoord) {
        for neighbor in ChunkMap::face_neighbors(&coord) {
            self.mark(neighbor);
        }
    }

    /// Mark the chunk owning a voxel write, plus each neighbour whose
    /// shared face the voxel touches.
    pub fn mark_voxel(&mut self, cpos: ChunkCoord, lpos: LocalCoord) {
        self.mark(cpos);
        for face in border_faces(lpos) {
            self.mark(cpos + face.offset());
        }
    }

    pub fn unmark(&mut self, coord: ChunkCoord) {
        self.chunks.remove(&coord);
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains(&coord)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Drain the set in a stable order.
    pub fn take(&mut self) -> Vec<ChunkCoord> {
        let mut coords: Vec<ChunkCoord> = self.chunks.drain().collect();
        coords.sort_by_key(|c| (c.x, c.y, c.z));
        coords
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;

    #[test]
    fn test_interior_voxel_marks_only_owner() {
        let mut dirty = DirtyChunks::new();
        dirty.mark_voxel(IVec3::ZERO, IVec3::new(10, 10, 10));
        assert_eq!(dirty.take(), vec![IVec3::ZERO]);
        assert!(dirty.is_empty());
    }

    #[test]
    fn test_corner_voxel_marks_three_neighbors() {
        let mut dirty = DirtyChunks::new();
        dirty.mark_voxel(IVec3::ZERO, IVec3::new(31, 0, 31));
        assert_eq!(dirty.len(), 4);
        assert!(dirty.contains(IVec3::new(1, 0, 0)));
        assert!(dirty.contains(IVec3::new(0, -1, 0)));
        assert!(dirty.contains(IVec3::new(0, 0, 1)));
    }

    #[test]
    fn test_marks_deduplicate() {
        let mut dirty = DirtyChunks::new();
        dirty.mark_with_neighbors(IVec3::ZERO);
        dirty.mark_voxel(IVec3::ZERO, IVec3::new(0, 5, 5));
        assert_eq!(dirty.len(), 7);
        dirty.unmark(IVec3::ZERO);
        assert!(!dirty.contains(IVec3::ZERO));
    }
}
