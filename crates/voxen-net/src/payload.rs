use voxen_core::{ChunkCoord, Voxel, VoxelCoord};
use voxen_world::{Chunk, EventRecord, World};

use crate::error::NetError;

/// Full voxel contents of one chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSnapshot {
    pub coord: ChunkCoord,
    pub voxels: Vec<Voxel>,
}

impl ChunkSnapshot {
    /// Copy a loaded chunk out of the world.
    pub fn capture(world: &World, coord: ChunkCoord) -> Option<Self> {
        world.find(coord).map(|chunk| Self {
            coord,
            voxels: chunk.voxels().to_vec(),
        })
    }

    pub fn into_chunk(self) -> Result<Chunk, NetError> {
        Ok(Chunk::from_voxels(self.voxels)?)
    }
}

/// A single voxel write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoxelDelta {
    pub vpos: VoxelCoord,
    pub voxel: Voxel,
}

impl VoxelDelta {
    pub fn new(vpos: VoxelCoord, voxel: Voxel) -> Self {
        Self { vpos, voxel }
    }

    /// Delta carrying the new value of a `VoxelSet` record.
    pub fn from_record(record: &EventRecord) -> Option<Self> {
        match *record {
            EventRecord::VoxelSet { vpos, new, .. } => Some(Self::new(vpos, new)),
            _ => None,
        }
    }
}

/// The two payload shapes that cross the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Snapshot(ChunkSnapshot),
    Delta(VoxelDelta),
}

impl From<ChunkSnapshot> for Payload {
    fn from(snapshot: ChunkSnapshot) -> Self {
        Payload::Snapshot(snapshot)
    }
}

impl From<VoxelDelta> for Payload {
    fn from(delta: VoxelDelta) -> Self {
        Payload::Delta(delta)
    }
}

/// Apply a received payload: snapshots insert or replace their chunk,
/// deltas write into an already loaded chunk.
pub fn apply(world: &mut World, payload: Payload) -> Result<(), NetError> {
    match payload {
        Payload::Snapshot(snapshot) => {
            let coord = snapshot.coord;
            let chunk = snapshot.into_chunk()?;
            world.emplace_or_replace(coord, chunk)?;
            log::debug!("applied snapshot for chunk {coord}");
        }
        Payload::Delta(delta) => {
            if let Err(err) = world.set_voxel(delta.vpos, delta.voxel) {
                log::warn!("dropping delta at {}: {err}", delta.vpos);
                return Err(err.into());
            }
        }
    }
    Ok(())
}
