//! Synchronous publish/subscribe for chunk lifecycle and voxel mutations.
//!
//! Subscribers run inside the mutating call, in registration order, and see
//! the registry already updated. They receive a shared borrow of the event
//! only, so they cannot mutate the world re-entrantly; side effects that need
//! the world (remeshing, entity bookkeeping) go through [`EventBus::channel`]
//! and are drained at the next tick boundary.

use crossbeam_channel::{Receiver, Sender};
use hecs::Entity;
use voxen_core::{ChunkCoord, LocalCoord, Voxel, VoxelCoord, WorldCoord};

use crate::chunk::Chunk;
use crate::error::{DispatchError, HandlerError};

/// A single voxel write, resolved in all four coordinate spaces.
#[derive(Debug, Clone, Copy)]
pub struct VoxelSet<'a> {
    pub vpos: VoxelCoord,
    pub cpos: ChunkCoord,
    pub lpos: LocalCoord,
    pub wpos: WorldCoord,
    /// Flat storage index of `lpos`.
    pub index: usize,
    pub old: Voxel,
    pub new: Voxel,
    pub chunk: &'a Chunk,
}

/// Event dispatched at the point of mutation. Borrows the affected chunk,
/// which is still readable for `ChunkRemove`.
#[derive(Debug, Clone, Copy)]
pub enum WorldEvent<'a> {
    ChunkCreate { coord: ChunkCoord, chunk: &'a Chunk },
    /// `replaced` is the previous chunk's entity when the new chunk brought
    /// a different one.
    ChunkUpdate {
        coord: ChunkCoord,
        chunk: &'a Chunk,
        replaced: Option<Entity>,
    },
    ChunkRemove { coord: ChunkCoord, chunk: &'a Chunk },
    VoxelSet(VoxelSet<'a>),
}

impl WorldEvent<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            WorldEvent::ChunkCreate { .. } => "ChunkCreate",
            WorldEvent::ChunkUpdate { .. } => "ChunkUpdate",
            WorldEvent::ChunkRemove { .. } => "ChunkRemove",
            WorldEvent::VoxelSet(_) => "VoxelSet",
        }
    }

    /// Coordinate of the chunk the event concerns.
    pub fn coord(&self) -> ChunkCoord {
        match self {
            WorldEvent::ChunkCreate { coord, .. }
            | WorldEvent::ChunkUpdate { coord, .. }
            | WorldEvent::ChunkRemove { coord, .. } => *coord,
            WorldEvent::VoxelSet(set) => set.cpos,
        }
    }

    /// Owned projection without the chunk borrow, for deferred delivery.
    pub fn record(&self) -> EventRecord {
        match *self {
            WorldEvent::ChunkCreate { coord, chunk } => EventRecord::ChunkCreate {
                coord,
                entity: chunk.entity(),
            },
            WorldEvent::ChunkUpdate {
                coord, replaced, ..
            } => EventRecord::ChunkUpdate { coord, replaced },
            WorldEvent::ChunkRemove { coord, chunk } => EventRecord::ChunkRemove {
                coord,
                entity: chunk.entity(),
            },
            WorldEvent::VoxelSet(set) => EventRecord::VoxelSet {
                vpos: set.vpos,
                cpos: set.cpos,
                lpos: set.lpos,
                old: set.old,
                new: set.new,
            },
        }
    }
}

/// Owned copy of a [`WorldEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventRecord {
    ChunkCreate {
        coord: ChunkCoord,
        entity: Option<Entity>,
    },
    ChunkUpdate {
        coord: ChunkCoord,
        replaced: Option<Entity>,
    },
    ChunkRemove {
        coord: ChunkCoord,
        entity: Option<Entity>,
    },
    VoxelSet {
        vpos: VoxelCoord,
        cpos: ChunkCoord,
        lpos: LocalCoord,
        old: Voxel,
        new: Voxel,
    },
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type Handler = Box<dyn FnMut(&WorldEvent<'_>) -> Result<(), HandlerError> + Send>;

struct Subscriber {
    id: SubscriberId,
    name: String,
    handler: Handler,
}

/// Ordered list of event subscribers owned by one [`crate::World`].
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. Handlers run in registration order.
    pub fn subscribe<F>(&mut self, name: impl Into<String>, handler: F) -> SubscriberId
    where
        F: FnMut(&WorldEvent<'_>) -> Result<(), HandlerError> + Send + 'static,
    {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber {
            id,
            name: name.into(),
            handler: Box::new(handler),
        });
        id
    }

    /// Register a subscriber that forwards owned records into an unbounded
    /// channel. Dropping the receiver unsubscribes on the next event.
    pub fn channel(&mut self, name: impl Into<String>) -> Receiver<EventRecord> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.subscribe(name, forward_to(tx));
        rx
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    /// Deliver `event` to every subscriber in order.
    ///
    /// Stops at the first failing subscriber and returns its error.
    /// Disconnected subscribers are dropped and delivery continues.
    pub fn publish(&mut self, event: &WorldEvent<'_>) -> Result<(), DispatchError> {
        let mut index = 0;
        while index < self.subscribers.len() {
            let subscriber = &mut self.subscribers[index];
            match (subscriber.handler)(event) {
                Ok(()) => index += 1,
                Err(HandlerError::Disconnected) => {
                    log::debug!("dropping disconnected subscriber '{}'", subscriber.name);
                    self.subscribers.remove(index);
                }
                Err(source) => {
                    log::warn!(
                        "subscriber '{}' failed on {} at {}: {}",
                        subscriber.name,
                        event.name(),
                        event.coord(),
                        source
                    );
                    return Err(DispatchError {
                        subscriber: subscriber.name.clone(),
                        event: event.name(),
                        coord: event.coord(),
                        source,
                    });
                }
            }
        }
        Ok(())
    }

    /// Drop every subscriber. Channel receivers observe a disconnect.
    pub fn clear(&mut self) {
        self.subscribers.clear();
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

fn forward_to(tx: Sender<EventRecord>) -> impl FnMut(&WorldEvent<'_>) -> Result<(), HandlerError> {
    move |event| {
        tx.send(event.record())
            .map_err(|_| HandlerError::Disconnected)
    }
}
