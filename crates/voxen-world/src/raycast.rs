//! DDA ray traversal over the voxel grid.

use glam::{IVec3, Vec3};
use voxen_core::constants::NULL_VOXEL;
use voxen_core::direction::Face;
use voxen_core::math::world_to_voxel;
use voxen_core::{Voxel, VoxelCoord, WorldCoord};

use crate::error::WorldError;
use crate::World;

/// Incremental grid stepper. Unbounded: the caller decides when to stop.
#[derive(Debug, Clone)]
pub struct VoxelRay {
    direction: Vec3,
    vpos: VoxelCoord,
    step: IVec3,
    /// Ray length between successive boundaries on each axis.
    delta_dist: Vec3,
    /// Ray length from the start to the next boundary on each axis.
    side_dist: Vec3,
    vnormal: IVec3,
    distance: f32,
}

impl VoxelRay {
    /// Set up a ray at `start`. `direction` is normalized here; zero or
    /// non-finite directions are rejected.
    pub fn new(start: WorldCoord, direction: Vec3) -> Result<Self, WorldError> {
        let direction = direction
            .try_normalize()
            .ok_or(WorldError::DegenerateRay(direction))?;

        let vpos = world_to_voxel(start);
        let frac = start.local - start.local.floor();

        let mut step = IVec3::ZERO;
        let mut delta_dist = Vec3::INFINITY;
        let mut side_dist = Vec3::INFINITY;
        for axis in 0..3 {
            let d = direction[axis];
            // Zero and subnormal components stay at infinity so the axis is
            // never chosen.
            let delta = (1.0 / d).abs();
            if !delta.is_finite() {
                continue;
            }
            delta_dist[axis] = delta;
            if d > 0.0 {
                step[axis] = 1;
                side_dist[axis] = (1.0 - frac[axis]) * delta_dist[axis];
            } else {
                step[axis] = -1;
                side_dist[axis] = frac[axis] * delta_dist[axis];
            }
        }

        Ok(Self {
            direction,
            vpos,
            step,
            delta_dist,
            side_dist,
            vnormal: IVec3::ZERO,
            distance: 0.0,
        })
    }

    /// Cross the nearest voxel boundary and return the voxel now occupied.
    /// Ties resolve x before y before z.
    pub fn advance(&mut self) -> VoxelCoord {
        let s = self.side_dist;
        let axis = if s.x <= s.y && s.x <= s.z {
            0
        } else if s.y <= s.z {
            1
        } else {
            2
        };

        self.distance = self.side_dist[axis];
        self.side_dist[axis] += self.delta_dist[axis];
        self.vpos[axis] += self.step[axis];
        self.vnormal = IVec3::ZERO;
        self.vnormal[axis] = -self.step[axis];
        self.vpos
    }

    /// Advance one voxel and read it from `world`.
    pub fn step(&mut self, world: &World) -> Voxel {
        let vpos = self.advance();
        world.get_voxel(vpos)
    }

    pub fn vpos(&self) -> VoxelCoord {
        self.vpos
    }

    /// Normal of the face entered on the last step; zero before the first.
    pub fn vnormal(&self) -> IVec3 {
        self.vnormal
    }

    /// Ray length from the start to the boundary crossed on the last step.
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Distance at which the next step will cross a boundary.
    pub fn next_distance(&self) -> f32 {
        self.side_dist.min_element()
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn face(&self) -> Option<Face> {
        Face::from_normal(self.vnormal)
    }
}

/// First non-null voxel found by [`World::pick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub voxel: Voxel,
    pub vpos: VoxelCoord,
    /// Normal of the face the ray entered through. Zero when the ray
    /// started inside the hit voxel.
    pub normal: IVec3,
    pub distance: f32,
}

impl RayHit {
    /// Where a block placed against the hit face would go.
    pub fn place_position(&self) -> VoxelCoord {
        self.vpos + self.normal
    }

    pub fn face(&self) -> Option<Face> {
        Face::from_normal(self.normal)
    }
}

impl World {
    /// Cast a ray from `start` and return the first non-null voxel within
    /// `max_distance`. The start voxel is tested before stepping.
    pub fn pick(
        &self,
        start: WorldCoord,
        direction: Vec3,
        max_distance: f32,
    ) -> Result<Option<RayHit>, WorldError> {
        if !max_distance.is_finite() || max_distance < 0.0 {
            return Err(WorldError::InvalidPickDistance(max_distance));
        }

        let mut ray = VoxelRay::new(start, direction)?;
        let mut voxel = self.get_voxel(ray.vpos());
        loop {
            if voxel != NULL_VOXEL {
                return Ok(Some(RayHit {
                    voxel,
                    vpos: ray.vpos(),
                    normal: ray.vnormal(),
                    distance: ray.distance(),
                }));
            }
            if ray.next_distance() > max_distance {
                return Ok(None);
            }
            voxel = ray.step(self);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::Chunk;

    fn at(x: f32, y: f32, z: f32) -> WorldCoord {
        WorldCoord::new(IVec3::ZERO, Vec3::new(x, y, z))
    }

    fn world_with_chunks(coords: &[IVec3]) -> World {
        let mut world = World::default();
        for &coord in coords {
            world
                .emplace_or_replace(coord, Chunk::new())
                .expect("emplace");
        }
        world
    }

    #[test]
    fn test_axis_aligned_steps() {
        let mut ray = VoxelRay::new(at(0.5, 0.5, 0.5), Vec3::X).expect("ray");
        assert_eq!(ray.vpos(), IVec3::ZERO);
        assert_eq!(ray.advance(), IVec3::new(1, 0, 0));
        assert!((ray.distance() - 0.5).abs() < 1e-6);
        assert_eq!(ray.vnormal(), IVec3::new(-1, 0, 0));
        assert_eq!(ray.advance(), IVec3::new(2, 0, 0));
        assert!((ray.distance() - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_zero_components_never_chosen() {
        let mut ray = VoxelRay::new(at(3.25, 7.5, 9.75), Vec3::NEG_Z).expect("ray");
        for _ in 0..100 {
            ray.advance();
            assert!(ray.distance().is_finite());
        }
        assert_eq!(ray.vpos().x, 3);
        assert_eq!(ray.vpos().y, 7);
        assert_eq!(ray.vpos().z, 9 - 100);
        assert_eq!(ray.face(), Some(Face::South));
    }

    #[test]
    fn test_subnormal_component_treated_as_zero() {
        let mut ray =
            VoxelRay::new(WorldCoord::ORIGIN, Vec3::new(1.0, -1e-40, 0.0)).expect("ray");
        assert_eq!(ray.advance(), IVec3::new(1, 0, 0));
        assert_eq!(ray.distance(), 1.0);
        assert_eq!(ray.advance(), IVec3::new(2, 0, 0));
        assert!(ray.next_distance().is_finite());
    }

    #[test]
    fn test_pick_with_subnormal_component_terminates() {
        let mut world = world_with_chunks(&[IVec3::ZERO]);
        world.set_voxel(IVec3::new(3, 0, 0), 6).expect("set");
        let hit = world
            .pick(WorldCoord::ORIGIN, Vec3::new(1.0, -1e-40, 0.0), 8.0)
            .expect("pick")
            .expect("hit");
        assert_eq!(hit.vpos, IVec3::new(3, 0, 0));
        assert!(world
            .pick(WorldCoord::ORIGIN, Vec3::new(-1.0, -1e-40, 0.0), 8.0)
            .expect("pick")
            .is_none());
    }

    #[test]
    fn test_diagonal_steps_one_axis_at_a_time() {
        let mut ray =
            VoxelRay::new(at(0.1, 0.7, 0.4), Vec3::new(0.6, -0.3, 0.8)).expect("ray");
        let mut prev = ray.vpos();
        let mut prev_distance = ray.distance();
        for _ in 0..64 {
            let next = ray.advance();
            let diff = next - prev;
            assert_eq!(diff.abs().element_sum(), 1, "moved {diff} in one step");
            assert_eq!(diff, -ray.vnormal());
            assert!(ray.distance() >= prev_distance);
            prev = next;
            prev_distance = ray.distance();
        }
    }

    #[test]
    fn test_negative_direction_on_boundary() {
        let mut ray = VoxelRay::new(at(0.0, 0.0, 0.0), Vec3::NEG_X).expect("ray");
        assert_eq!(ray.advance(), IVec3::new(-1, 0, 0));
        assert_eq!(ray.distance(), 0.0);
        assert_eq!(ray.advance(), IVec3::new(-2, 0, 0));
        assert!((ray.distance() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_direction_rejected() {
        for direction in [Vec3::ZERO, Vec3::new(f32::NAN, 0.0, 1.0), Vec3::INFINITY] {
            assert!(matches!(
                VoxelRay::new(WorldCoord::ORIGIN, direction),
                Err(WorldError::DegenerateRay(_))
            ));
        }
    }

    #[test]
    fn test_direction_is_normalized() {
        let ray = VoxelRay::new(WorldCoord::ORIGIN, Vec3::new(0.0, 5.0, 0.0)).expect("ray");
        assert_eq!(ray.direction(), Vec3::Y);
    }

    #[test]
    fn test_pick_hits_face() {
        let mut world = world_with_chunks(&[IVec3::ZERO]);
        world.set_voxel(IVec3::new(5, 1, 1), 3).expect("set");

        let hit = world
            .pick(at(0.5, 1.5, 1.5), Vec3::X, 10.0)
            .expect("pick")
            .expect("hit");
        assert_eq!(hit.voxel, 3);
        assert_eq!(hit.vpos, IVec3::new(5, 1, 1));
        assert_eq!(hit.normal, IVec3::new(-1, 0, 0));
        assert_eq!(hit.face(), Some(Face::West));
        assert_eq!(hit.place_position(), IVec3::new(4, 1, 1));
        assert!((hit.distance - 4.5).abs() < 1e-5);
    }

    #[test]
    fn test_pick_respects_max_distance() {
        let mut world = world_with_chunks(&[IVec3::ZERO]);
        world.set_voxel(IVec3::new(5, 1, 1), 3).expect("set");
        assert!(world
            .pick(at(0.5, 1.5, 1.5), Vec3::X, 3.0)
            .expect("pick")
            .is_none());
    }

    #[test]
    fn test_pick_across_chunk_border() {
        let mut world = world_with_chunks(&[IVec3::ZERO, IVec3::new(-1, 0, 0)]);
        world.set_voxel(IVec3::new(-3, 0, 0), 8).expect("set");
        let hit = world
            .pick(at(0.5, 0.5, 0.5), Vec3::NEG_X, 16.0)
            .expect("pick")
            .expect("hit");
        assert_eq!(hit.vpos, IVec3::new(-3, 0, 0));
        assert_eq!(hit.face(), Some(Face::East));
        assert!((hit.distance - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_pick_from_inside_solid() {
        let mut world = world_with_chunks(&[IVec3::ZERO]);
        world.set_voxel(IVec3::new(2, 2, 2), 1).expect("set");
        let hit = world
            .pick(at(2.5, 2.5, 2.5), Vec3::Y, 4.0)
            .expect("pick")
            .expect("hit");
        assert_eq!(hit.vpos, IVec3::new(2, 2, 2));
        assert_eq!(hit.normal, IVec3::ZERO);
        assert_eq!(hit.distance, 0.0);
        assert_eq!(hit.face(), None);
    }

    #[test]
    fn test_pick_through_unloaded_space_misses() {
        let world = World::default();
        assert!(world
            .pick(WorldCoord::ORIGIN, Vec3::new(1.0, 1.0, 1.0), 64.0)
            .expect("pick")
            .is_none());
    }

    #[test]
    fn test_pick_rejects_bad_distance() {
        let world = World::default();
        for max in [-1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                world.pick(WorldCoord::ORIGIN, Vec3::X, max),
                Err(WorldError::InvalidPickDistance(_))
            ));
        }
    }
}
