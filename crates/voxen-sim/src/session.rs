//! Per-process simulation context: the world, the entity registry and the
//! work deferred from event handlers to tick boundaries.

use crossbeam_channel::{Receiver, TryRecvError};
use hecs::Entity;
use voxen_core::{ChunkCoord, Voxel, VoxelCoord, WorldCoord};
use voxen_world::{
    EventRecord, StreamingPolicy, StreamingReport, TerrainGenerator, World, WorldConfig,
};

use crate::components::{Collision, Head, Transform, Velocity};
use crate::error::SessionError;
use crate::passes::dirty::DirtyChunks;
use crate::passes::lifecycle::{despawn_chunk_entity, spawn_chunk_entity, LifecycleOutcome};
use crate::passes::movement::integrate_velocity;

const EVENT_QUEUE: &str = "session";

/// A voxel write observed this tick, queued for network sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoxelChange {
    pub vpos: VoxelCoord,
    pub old: Voxel,
    pub new: Voxel,
}

/// Summary of one [`Session::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Tick number after this tick completed.
    pub tick: u64,
    pub events: usize,
    pub moved: usize,
    pub chunks_spawned: usize,
    pub chunks_despawned: usize,
    /// Dirty chunks waiting for [`Session::take_dirty_chunks`].
    pub dirty: usize,
    /// Changes waiting for [`Session::take_outgoing`].
    pub outgoing: usize,
}

pub struct Session {
    world: World,
    registry: hecs::World,
    pending: Receiver<EventRecord>,
    dirty: DirtyChunks,
    outgoing: Vec<VoxelChange>,
    streaming: StreamingPolicy,
    tick: u64,
}

impl Session {
    /// Session over a fresh world using the default terrain generator.
    pub fn new(config: WorldConfig) -> Self {
        let generator = TerrainGenerator::new(config.seed);
        Self::with_world(World::with_generator(config, Box::new(generator)))
    }

    /// Session over an existing world. Events the world emitted before this
    /// call are not seen.
    pub fn with_world(mut world: World) -> Self {
        let pending = world.events_mut().channel(EVENT_QUEUE);
        let streaming = StreamingPolicy::from_config(world.config());
        log::info!(
            "session started ({} chunks loaded, {} Hz)",
            world.loaded_count(),
            world.config().tick_rate
        );
        Self {
            world,
            registry: hecs::World::new(),
            pending,
            dirty: DirtyChunks::new(),
            outgoing: Vec::new(),
            streaming,
            tick: 0,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access. Mutations made here are picked up by the next
    /// tick.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn registry(&self) -> &hecs::World {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut hecs::World {
        &mut self.registry
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Advance one tick: apply deferred event work, integrate velocities,
    /// then bump the tick counter.
    pub fn tick(&mut self, dt: f32) -> Result<TickReport, SessionError> {
        let mut report = TickReport::default();
        self.drain_events(&mut report)?;
        report.moved = integrate_velocity(&mut self.registry, dt);
        self.tick += 1;

        report.tick = self.tick;
        report.dirty = self.dirty.len();
        report.outgoing = self.outgoing.len();
        Ok(report)
    }

    fn drain_events(&mut self, report: &mut TickReport) -> Result<(), SessionError> {
        loop {
            let record = match self.pending.try_recv() {
                Ok(record) => record,
                Err(TryRecvError::Empty) => return Ok(()),
                Err(TryRecvError::Disconnected) => return Err(SessionError::EventsDetached),
            };
            report.events += 1;

            match record {
                EventRecord::ChunkCreate { coord, .. } => {
                    let outcome =
                        spawn_chunk_entity(&mut self.world, &mut self.registry, coord)?;
                    if matches!(outcome, LifecycleOutcome::Spawned(_)) {
                        report.chunks_spawned += 1;
                    }
                    self.dirty.mark_with_neighbors(coord);
                }
                EventRecord::ChunkUpdate { coord, replaced } => {
                    // The displaced entity may have been re-attached since.
                    let orphan = replaced.filter(|&e| self.world.entity_chunk(e).is_none());
                    let outcome = despawn_chunk_entity(&mut self.world, &mut self.registry, orphan);
                    if matches!(outcome, LifecycleOutcome::Despawned(_)) {
                        report.chunks_despawned += 1;
                    }
                    self.dirty.mark_with_neighbors(coord);
                }
                EventRecord::ChunkRemove { coord, entity } => {
                    let outcome =
                        despawn_chunk_entity(&mut self.world, &mut self.registry, entity);
                    if matches!(outcome, LifecycleOutcome::Despawned(_)) {
                        report.chunks_despawned += 1;
                    }
                    self.dirty.unmark(coord);
                    // Neighbours lose the faces they shared with this chunk.
                    self.dirty.mark_neighbors(coord);
                }
                EventRecord::VoxelSet {
                    vpos,
                    cpos,
                    lpos,
                    old,
                    new,
                } => {
                    self.dirty.mark_voxel(cpos, lpos);
                    self.outgoing.push(VoxelChange { vpos, old, new });
                }
            }
        }
    }

    /// Dirty chunks that are still loaded, in stable order. Clears the set.
    pub fn take_dirty_chunks(&mut self) -> Vec<ChunkCoord> {
        let world = &self.world;
        self.dirty
            .take()
            .into_iter()
            .filter(|&coord| world.contains(coord))
            .collect()
    }

    /// Voxel changes observed since the last call, in write order.
    pub fn take_outgoing(&mut self) -> Vec<VoxelChange> {
        std::mem::take(&mut self.outgoing)
    }

    /// Load and unload chunks around `center` using the configured view
    /// distance and load budget.
    pub fn stream_around(&mut self, center: ChunkCoord) -> Result<StreamingReport, SessionError> {
        Ok(self.streaming.update(&mut self.world, center)?)
    }

    /// Spawn a moving actor with a head and a collision box.
    pub fn spawn_actor(&mut self, position: WorldCoord, velocity: Velocity) -> Entity {
        self.registry.spawn((
            Transform::at(position),
            velocity,
            Head::default(),
            Collision::default(),
        ))
    }

    /// Destroy an entity and clear any chunk association it had.
    /// Returns `false` if the entity was already gone.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        self.world.forget_entity(entity);
        self.registry.despawn(entity).is_ok()
    }

    pub fn actor_count(&self) -> usize {
        self.registry.query::<&Transform>().iter().count()
    }

    /// Remove every chunk and apply the resulting lifecycle work.
    pub fn shutdown(&mut self) -> Result<TickReport, SessionError> {
        self.world.clear()?;
        let mut report = TickReport {
            tick: self.tick,
            ..Default::default()
        };
        self.drain_events(&mut report)?;
        self.dirty.take();
        log::info!(
            "session stopped after {} ticks ({} chunk entities released)",
            self.tick,
            report.chunks_despawned
        );
        Ok(report)
    }
}
