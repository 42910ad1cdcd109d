use hecs::Entity;
use voxen_core::ChunkCoord;
use voxen_world::{World, WorldError};

use crate::components::ChunkEntity;

/// Outcome of handling one chunk lifecycle record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleOutcome {
    Spawned(Entity),
    Despawned(Entity),
    /// Nothing to do: the chunk is gone again or already has a live entity.
    Skipped,
}

/// Give a newly created chunk its `ChunkEntity`.
///
/// Records are handled a tick after the event fired, so the chunk may have
/// been removed since or already carry a live entity.
pub fn spawn_chunk_entity(
    world: &mut World,
    registry: &mut hecs::World,
    coord: ChunkCoord,
) -> Result<LifecycleOutcome, WorldError> {
    if !world.contains(coord) || world.chunk_entity(coord, registry).is_some() {
        return Ok(LifecycleOutcome::Skipped);
    }

    let entity = registry.spawn((ChunkEntity { coord },));
    if let Err(err) = world.attach_entity(coord, entity) {
        let _ = registry.despawn(entity);
        return Err(err);
    }
    log::trace!("chunk {coord} -> entity {entity:?}");
    Ok(LifecycleOutcome::Spawned(entity))
}

/// Destroy the entity of a removed or replaced chunk, if it is still alive.
pub fn despawn_chunk_entity(
    world: &mut World,
    registry: &mut hecs::World,
    entity: Option<Entity>,
) -> LifecycleOutcome {
    let Some(entity) = entity else {
        return LifecycleOutcome::Skipped;
    };
    world.forget_entity(entity);
    match registry.despawn(entity) {
        Ok(()) => LifecycleOutcome::Despawned(entity),
        Err(_) => LifecycleOutcome::Skipped,
    }
}
