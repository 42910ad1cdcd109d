//! Session fixtures for simulation tests.

use glam::IVec3;
use voxen_core::constants::CHUNK_VOLUME;
use voxen_world::{Chunk, World, WorldConfig};

use crate::session::Session;

fn session_with(coords: &[IVec3], fill: u32) -> Session {
    let config = WorldConfig {
        auto_generate: false,
        ..Default::default()
    };
    let mut session = Session::with_world(World::new(config));
    for &coord in coords {
        let chunk = Chunk::from_voxels(vec![fill; CHUNK_VOLUME]).expect("chunk size");
        session
            .world_mut()
            .emplace_or_replace(coord, chunk)
            .expect("emplace");
    }
    session
}

/// Session whose listed chunks are solid stone (voxel 1).
pub(crate) fn flat_session(coords: &[IVec3]) -> Session {
    session_with(coords, 1)
}

/// Session whose listed chunks are all air.
pub(crate) fn empty_chunk_session(coords: &[IVec3]) -> Session {
    session_with(coords, 0)
}
