use glam::IVec3;

use crate::constants::CHUNK_SIZE;
use crate::types::LocalCoord;

/// One of the six axis-aligned faces of a voxel or chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Face {
    Down = 0,
    Up = 1,
    North = 2,
    South = 3,
    East = 4,
    West = 5,
}

/// All 6 faces.
pub const ALL_FACES: [Face; 6] = [
    Face::Down,
    Face::Up,
    Face::North,
    Face::South,
    Face::East,
    Face::West,
];

impl Face {
    /// Offset vector for this face. Y-up convention: Down = (0,-1,0).
    pub fn offset(self) -> IVec3 {
        match self {
            Face::Down => IVec3::new(0, -1, 0),
            Face::Up => IVec3::new(0, 1, 0),
            Face::North => IVec3::new(0, 0, -1),
            Face::South => IVec3::new(0, 0, 1),
            Face::East => IVec3::new(1, 0, 0),
            Face::West => IVec3::new(-1, 0, 0),
        }
    }

    pub fn opposite(self) -> Face {
        match self {
            Face::Down => Face::Up,
            Face::Up => Face::Down,
            Face::North => Face::South,
            Face::South => Face::North,
            Face::East => Face::West,
            Face::West => Face::East,
        }
    }

    /// Axis index (0 = x, 1 = y, 2 = z).
    pub fn axis(self) -> usize {
        match self {
            Face::East | Face::West => 0,
            Face::Down | Face::Up => 1,
            Face::North | Face::South => 2,
        }
    }

    /// Face whose offset equals `normal`, if it is a unit axis vector.
    pub fn from_normal(normal: IVec3) -> Option<Face> {
        ALL_FACES.into_iter().find(|face| face.offset() == normal)
    }
}

/// Faces of the enclosing chunk that a local coordinate touches.
/// Empty for interior voxels; up to three for a corner.
pub fn border_faces(local: LocalCoord) -> impl Iterator<Item = Face> {
    let last = CHUNK_SIZE - 1;
    ALL_FACES.into_iter().filter(move |face| {
        let axis = face.axis();
        let step = face.offset()[axis];
        (step < 0 && local[axis] == 0) || (step > 0 && local[axis] == last)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faces_unique() {
        for (i, a) in ALL_FACES.iter().enumerate() {
            for (j, b) in ALL_FACES.iter().enumerate() {
                if i != j {
                    assert_ne!(a.offset(), b.offset(), "faces {i} and {j} share offset");
                }
            }
        }
    }

    #[test]
    fn test_opposite_cancels() {
        for face in ALL_FACES {
            assert_eq!(face.offset() + face.opposite().offset(), IVec3::ZERO);
            assert_eq!(face.opposite().opposite(), face);
        }
    }

    #[test]
    fn test_from_normal() {
        assert_eq!(Face::from_normal(IVec3::new(0, -1, 0)), Some(Face::Down));
        assert_eq!(Face::from_normal(IVec3::new(1, 0, 0)), Some(Face::East));
        assert_eq!(Face::from_normal(IVec3::ZERO), None);
        assert_eq!(Face::from_normal(IVec3::new(1, 1, 0)), None);
    }

    #[test]
    fn test_border_faces() {
        assert_eq!(border_faces(IVec3::new(5, 5, 5)).count(), 0);
        let edge: Vec<Face> = border_faces(IVec3::new(0, 5, 5)).collect();
        assert_eq!(edge, vec![Face::West]);
        let corner: Vec<Face> = border_faces(IVec3::new(31, 0, 31)).collect();
        assert_eq!(corner, vec![Face::Down, Face::South, Face::East]);
    }
}
