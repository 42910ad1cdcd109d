use glam::{IVec3, Vec3};
use voxen_core::constants::CHUNK_SIZE;
use voxen_core::{Voxel, VoxelCoord, WorldCoord};
use voxen_sim::Velocity;
use voxen_world::terrain::{DIRT, GRASS, SAND, STONE};

/// Workload driven each tick on top of the session's own passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workload {
    /// Terrain only: measures event draining and streaming bookkeeping.
    Idle,
    /// Actors wandering across chunk borders; streaming follows the first.
    MovingActors { actors: u32 },
    /// Voxel writes and downward picks scattered over the loaded area.
    EditStorm { edits_per_tick: u32, picks_per_tick: u32 },
}

/// Configuration for a single scenario run.
#[derive(Debug, Clone, Copy)]
pub struct SceneConfig {
    pub name: &'static str,
    pub workload: Workload,
}

/// The standard scenario suite.
pub fn standard_scenes() -> Vec<SceneConfig> {
    vec![
        SceneConfig {
            name: "idle",
            workload: Workload::Idle,
        },
        SceneConfig {
            name: "actors-64",
            workload: Workload::MovingActors { actors: 64 },
        },
        SceneConfig {
            name: "actors-1K",
            workload: Workload::MovingActors { actors: 1024 },
        },
        SceneConfig {
            name: "edit-storm",
            workload: Workload::EditStorm {
                edits_per_tick: 256,
                picks_per_tick: 64,
            },
        },
    ]
}

/// Hash a position and tick into a deterministic pseudo-random u32.
pub fn scatter_hash(x: i32, y: i32, z: i32, tick: u32) -> u32 {
    let mut state = (x as u32)
        .wrapping_mul(0x9E3779B9)
        .wrapping_add((y as u32).wrapping_mul(0x517CC1B7))
        .wrapping_add((z as u32).wrapping_mul(0x6C62272E))
        .wrapping_add(tick.wrapping_mul(0x2545F491));

    state = state ^ (state >> 16);
    state = state.wrapping_mul(0x45D9F3B);
    state = state ^ (state >> 16);
    state = state.wrapping_mul(0x45D9F3B);
    state = state ^ (state >> 16);

    state
}

/// Pick a value in `[-radius * CHUNK_SIZE, (radius + 1) * CHUNK_SIZE)`,
/// i.e. a voxel coordinate inside the loaded cube around chunk 0.
fn spread(hash: u32, radius: u32) -> i32 {
    let span = (2 * radius + 1) * CHUNK_SIZE as u32;
    (hash % span) as i32 - (radius as i32) * CHUNK_SIZE
}

/// Voxel targeted by the `index`-th edit of `tick`.
pub fn edit_position(index: u32, tick: u32, radius: u32) -> VoxelCoord {
    let i = index as i32;
    IVec3::new(
        spread(scatter_hash(i, 0, 0, tick), radius),
        spread(scatter_hash(0, i, 0, tick), radius),
        spread(scatter_hash(0, 0, i, tick), radius),
    )
}

/// Block written by an edit. Every fourth edit digs instead of placing.
pub fn edit_voxel(index: u32, tick: u32) -> Voxel {
    match scatter_hash(index as i32, tick as i32, 7, tick) % 8 {
        0 | 4 => 0,
        1 => STONE,
        2 => DIRT,
        3 | 5 => GRASS,
        _ => SAND,
    }
}

/// Start of the `index`-th downward pick: one chunk above the edit area.
pub fn pick_origin(index: u32, tick: u32, radius: u32) -> WorldCoord {
    let column = edit_position(index.wrapping_add(0x8000), tick, radius);
    WorldCoord::new(
        IVec3::new(0, radius as i32 + 1, 0),
        Vec3::new(column.x as f32 + 0.5, 0.5, column.z as f32 + 0.5),
    )
}

/// Spawn point and velocity of the `index`-th actor. Actors start near
/// the +x/+z faces of the origin chunk and head across them.
pub fn actor_spawn(index: u32) -> (WorldCoord, Velocity) {
    let i = index as i32;
    let local = Vec3::new(
        (CHUNK_SIZE - 1 - i % 8) as f32 + 0.5,
        8.5 + (i % 4) as f32,
        ((i * 5) % CHUNK_SIZE) as f32 + 0.5,
    );
    let h = scatter_hash(i, 1, 2, 3);
    let velocity = Velocity {
        linear: Vec3::new(
            2.0 + (h % 5) as f32,
            0.0,
            ((h >> 8) % 7) as f32 - 3.0,
        ),
        angular: Vec3::new(0.0, 0.5, 0.0),
    };
    (WorldCoord::new(IVec3::ZERO, local), velocity)
}
