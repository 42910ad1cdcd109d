//! Chunked voxel world: chunk storage, the world registry and its event bus,
//! ray picking, generation and view-distance streaming.
//!
//! [`World`] is the single owner of all chunk memory. Mutation goes through
//! [`World::emplace_or_replace`], [`World::set_voxel`] and [`World::remove`]
//! only; each takes `&mut self`, so one mutation runs at a time and readers
//! never observe a partial write. Chunk loads produced off-thread (network,
//! async generation) must be handed to the owning thread before insertion.

pub mod chunk;
pub mod chunk_map;
pub mod config;
pub mod error;
pub mod events;
pub mod raycast;
pub mod streaming;
pub mod terrain;

use hecs::Entity;
use voxen_core::constants::{NULL_VOXEL, VOXEL_MAX};
use voxen_core::math::{local_to_index, voxel_to_chunk, voxel_to_local, voxel_to_world};
use voxen_core::{ChunkCoord, Voxel, VoxelCoord};

pub use chunk::Chunk;
pub use chunk_map::ChunkMap;
pub use config::WorldConfig;
pub use error::{ConfigError, DispatchError, HandlerError, WorldError};
pub use events::{EventBus, EventRecord, SubscriberId, VoxelSet, WorldEvent};
pub use raycast::{RayHit, VoxelRay};
pub use streaming::{StreamingPolicy, StreamingReport};
pub use terrain::{ChunkGenerator, TerrainGenerator};

/// World registry: chunk coordinate -> chunk, plus the event bus that
/// reports every mutation.
pub struct World {
    chunks: ChunkMap,
    events: EventBus,
    generator: Option<Box<dyn ChunkGenerator>>,
    config: WorldConfig,
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

impl World {
    /// Create an empty world with no generator installed.
    pub fn new(config: WorldConfig) -> Self {
        Self {
            chunks: ChunkMap::new(),
            events: EventBus::new(),
            generator: None,
            config,
        }
    }

    /// Create an empty world that generates absent chunks with `generator`
    /// when `config.auto_generate` is set.
    pub fn with_generator(config: WorldConfig, generator: Box<dyn ChunkGenerator>) -> Self {
        let mut world = Self::new(config);
        world.generator = Some(generator);
        world
    }

    pub fn set_generator(&mut self, generator: Box<dyn ChunkGenerator>) {
        self.generator = Some(generator);
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Subscriber registration.
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn chunk_map(&self) -> &ChunkMap {
        &self.chunks
    }

    pub fn loaded_count(&self) -> usize {
        self.chunks.loaded_count()
    }

    /// Look up a loaded chunk. Never creates one.
    pub fn find(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains(&coord)
    }

    /// Insert a new chunk or replace an existing one, then emit
    /// `ChunkCreate` or `ChunkUpdate`.
    pub fn emplace_or_replace(&mut self, coord: ChunkCoord, chunk: Chunk) -> Result<(), WorldError> {
        let (previous, stored) = self.chunks.insert(coord, chunk);
        let event = if let Some(previous) = previous {
            log::debug!("replaced chunk {coord}");
            let replaced = previous
                .entity()
                .filter(|&entity| Some(entity) != stored.entity());
            WorldEvent::ChunkUpdate {
                coord,
                chunk: stored,
                replaced,
            }
        } else {
            log::debug!("created chunk {coord}");
            WorldEvent::ChunkCreate { coord, chunk: stored }
        };
        self.events.publish(&event)?;
        Ok(())
    }

    /// Remove a chunk. `ChunkRemove` is emitted while the chunk is still
    /// readable; the chunk is freed afterwards. Returns `false` if absent.
    pub fn remove(&mut self, coord: ChunkCoord) -> Result<bool, WorldError> {
        let Some(chunk) = self.chunks.remove(&coord) else {
            return Ok(false);
        };
        log::debug!("removing chunk {coord}");
        let result = self.events.publish(&WorldEvent::ChunkRemove {
            coord,
            chunk: &chunk,
        });
        drop(chunk);
        result?;
        Ok(true)
    }

    /// Remove every chunk, emitting `ChunkRemove` for each. Session teardown.
    pub fn clear(&mut self) -> Result<(), WorldError> {
        let coords: Vec<ChunkCoord> = self.chunks.coords().collect();
        for coord in coords {
            self.remove(coord)?;
        }
        Ok(())
    }

    /// Read a voxel. Unloaded space reads as `NULL_VOXEL`.
    pub fn get_voxel(&self, vpos: VoxelCoord) -> Voxel {
        self.chunks
            .get(&voxel_to_chunk(vpos))
            .map_or(NULL_VOXEL, |chunk| chunk.get(voxel_to_local(vpos)))
    }

    /// Write a voxel into a loaded chunk and emit `VoxelSet`.
    ///
    /// Returns the previous value. Fails with `ChunkNotLoaded` if the owning
    /// chunk is absent; writes never create chunks.
    pub fn set_voxel(&mut self, vpos: VoxelCoord, voxel: Voxel) -> Result<Voxel, WorldError> {
        if voxel == VOXEL_MAX {
            return Err(WorldError::ReservedVoxel(voxel));
        }

        let cpos = voxel_to_chunk(vpos);
        let lpos = voxel_to_local(vpos);
        let Some(chunk) = self.chunks.get_mut(&cpos) else {
            return Err(WorldError::ChunkNotLoaded(cpos));
        };

        let old = chunk.set(lpos, voxel);
        self.events.publish(&WorldEvent::VoxelSet(VoxelSet {
            vpos,
            cpos,
            lpos,
            wpos: voxel_to_world(vpos),
            index: local_to_index(lpos),
            old,
            new: voxel,
            chunk,
        }))?;
        Ok(old)
    }

    /// Return the chunk at `coord`, generating it first if it is absent,
    /// auto-generation is enabled and a generator is installed.
    pub fn request_chunk(&mut self, coord: ChunkCoord) -> Result<Option<&Chunk>, WorldError> {
        if !self.chunks.contains(&coord) {
            if !self.config.auto_generate {
                return Ok(None);
            }
            let Some(generator) = &self.generator else {
                return Ok(None);
            };
            let chunk = Chunk::from_voxels(generator.generate(coord))?;
            self.emplace_or_replace(coord, chunk)?;
        }
        Ok(self.chunks.get(&coord))
    }

    /// Associate an entity with a loaded chunk (e.g. to hang renderable or
    /// visibility components on it).
    pub fn attach_entity(&mut self, coord: ChunkCoord, entity: Entity) -> Result<(), WorldError> {
        self.chunks
            .attach_entity(coord, entity)
            .map(|_| ())
            .ok_or(WorldError::ChunkNotLoaded(coord))
    }

    /// The chunk's entity, if it is still alive in `registry`.
    pub fn chunk_entity(&self, coord: ChunkCoord, registry: &hecs::World) -> Option<Entity> {
        self.chunks
            .get(&coord)?
            .entity()
            .filter(|&entity| registry.contains(entity))
    }

    /// Reverse lookup from entity to chunk coordinate.
    pub fn entity_chunk(&self, entity: Entity) -> Option<ChunkCoord> {
        self.chunks.entity_chunk(entity)
    }

    /// Drop any chunk association for an entity that is being destroyed.
    pub fn forget_entity(&mut self, entity: Entity) -> Option<ChunkCoord> {
        self.chunks.detach_entity(entity)
    }
}
