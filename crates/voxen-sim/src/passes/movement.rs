use voxen_core::math::renormalize;

use crate::components::{Transform, Velocity};

/// Integrate velocity into transform for every entity carrying both, then
/// renormalize the position so the local offset stays inside one chunk
/// width. Returns the number of entities moved.
pub fn integrate_velocity(registry: &mut hecs::World, dt: f32) -> usize {
    let mut moved = 0;
    for (_entity, (transform, velocity)) in registry.query_mut::<(&mut Transform, &Velocity)>() {
        transform.position.local += velocity.linear * dt;
        transform.angles += velocity.angular * dt;
        transform.position = renormalize(transform.position);
        moved += 1;
    }
    moved
}
