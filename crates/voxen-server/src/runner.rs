use std::time::Instant;

use glam::{IVec3, Vec3};
use voxen_net::{encode, Payload, VoxelDelta};
use voxen_sim::{Session, SessionError, Transform};
use voxen_world::{WorldConfig, WorldError};

use crate::scenes::{self, SceneConfig, Workload};

/// Upper bound on streaming passes used to fill the view cube at startup.
const MAX_WARMUP_PASSES: usize = 4096;

/// Timing data for a single scenario run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TimingSeries {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Result of a single scenario run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SceneResult {
    pub scene_name: String,
    pub chunk_count: u32,
    pub actor_count: u32,
    pub tick_count: u32,
    /// Voxel deltas queued for network sync over the whole run.
    pub delta_count: u64,
    /// Encoded size of those deltas.
    pub delta_bytes: u64,
    /// Edits rejected because their chunk was not loaded.
    pub dropped_edits: u64,
    pub pick_hits: u64,
    /// Dirty chunks handed to the mesher over the whole run.
    pub remeshed_chunks: u64,
    pub timings: TimingSeries,
}

/// Runs scenario sessions headlessly and times each tick.
pub struct SceneRunner {
    config: WorldConfig,
    tick_count: u32,
}

impl SceneRunner {
    pub fn new(config: WorldConfig, tick_count: u32) -> Self {
        Self { config, tick_count }
    }

    /// Run a single scenario and return its timing results.
    pub fn run_scene(&self, scene: &SceneConfig) -> Result<SceneResult, SessionError> {
        log::info!("Running scene '{}' ({:?})...", scene.name, scene.workload);

        let mut session = Session::new(self.config.clone());
        let radius = self.config.view_distance;
        self.warm_up(&mut session)?;

        let mut actors = Vec::new();
        if let Workload::MovingActors { actors: count } = scene.workload {
            for index in 0..count {
                let (position, velocity) = scenes::actor_spawn(index);
                actors.push(session.spawn_actor(position, velocity));
            }
        }

        let dt = self.config.tick_interval();
        let mut result = SceneResult {
            scene_name: scene.name.to_string(),
            chunk_count: 0,
            actor_count: actors.len() as u32,
            tick_count: self.tick_count,
            delta_count: 0,
            delta_bytes: 0,
            dropped_edits: 0,
            pick_hits: 0,
            remeshed_chunks: 0,
            timings: compute_timings(&[]),
        };
        let mut frame_times = Vec::with_capacity(self.tick_count as usize);

        for tick in 0..self.tick_count {
            let frame_start = Instant::now();

            if let Workload::EditStorm {
                edits_per_tick,
                picks_per_tick,
            } = scene.workload
            {
                self.apply_edits(&mut session, &mut result, tick, edits_per_tick)?;
                for index in 0..picks_per_tick {
                    let origin = scenes::pick_origin(index, tick, radius);
                    let reach = ((2 * radius + 2) * voxen_core::constants::CHUNK_SIZE as u32) as f32;
                    if session.world().pick(origin, Vec3::NEG_Y, reach)?.is_some() {
                        result.pick_hits += 1;
                    }
                }
            }

            match session.tick(dt) {
                Ok(report) => log::trace!("tick {}: {report:?}", report.tick),
                Err(SessionError::World(err)) => log::warn!("tick {tick} failed: {err}"),
                Err(err) => return Err(err),
            }

            if let Some(&leader) = actors.first() {
                let center = session
                    .registry()
                    .get::<&Transform>(leader)
                    .map(|t| t.position.chunk)
                    .unwrap_or(IVec3::ZERO);
                session.stream_around(center)?;
            }

            result.remeshed_chunks += session.take_dirty_chunks().len() as u64;
            for change in session.take_outgoing() {
                let packet = encode(&Payload::Delta(VoxelDelta::new(change.vpos, change.new)));
                result.delta_count += 1;
                result.delta_bytes += packet.len() as u64;
            }

            frame_times.push(frame_start.elapsed().as_secs_f64() * 1000.0);
        }

        result.chunk_count = session.world().loaded_count() as u32;
        result.timings = compute_timings(&frame_times);
        session.shutdown()?;

        log::info!(
            "  Done: mean={:.3}ms, p95={:.3}ms, {} chunks, {} deltas",
            result.timings.mean_ms,
            result.timings.p95_ms,
            result.chunk_count,
            result.delta_count
        );
        Ok(result)
    }

    /// Stream the full view cube around the origin and settle its events.
    fn warm_up(&self, session: &mut Session) -> Result<(), SessionError> {
        for _ in 0..MAX_WARMUP_PASSES {
            let report = session.stream_around(IVec3::ZERO)?;
            if report.pending == 0 || report.loaded == 0 {
                break;
            }
        }
        session.tick(0.0)?;
        session.take_dirty_chunks();
        session.take_outgoing();
        log::info!("  Streamed {} chunks", session.world().loaded_count());
        Ok(())
    }

    fn apply_edits(
        &self,
        session: &mut Session,
        result: &mut SceneResult,
        tick: u32,
        edits: u32,
    ) -> Result<(), SessionError> {
        let radius = self.config.view_distance;
        for index in 0..edits {
            let vpos = scenes::edit_position(index, tick, radius);
            let voxel = scenes::edit_voxel(index, tick);
            match session.world_mut().set_voxel(vpos, voxel) {
                Ok(_) => {}
                Err(WorldError::ChunkNotLoaded(coord)) => {
                    log::warn!("edit at {vpos} dropped: chunk {coord} not loaded");
                    result.dropped_edits += 1;
                }
                Err(WorldError::Dispatch(err)) => {
                    log::warn!("tick {tick}: {err}; skipping remaining edits");
                    break;
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }
}

/// Compute timing statistics from a list of frame times in milliseconds.
pub fn compute_timings(times: &[f64]) -> TimingSeries {
    if times.is_empty() {
        return TimingSeries {
            mean_ms: 0.0,
            median_ms: 0.0,
            p95_ms: 0.0,
            p99_ms: 0.0,
            min_ms: 0.0,
            max_ms: 0.0,
        };
    }

    let mut sorted = times.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let p95_idx = ((n as f64) * 0.95).ceil() as usize;
    let p99_idx = ((n as f64) * 0.99).ceil() as usize;

    TimingSeries {
        mean_ms: mean,
        median_ms: median,
        p95_ms: sorted[p95_idx.min(n - 1)],
        p99_ms: sorted[p99_idx.min(n - 1)],
        min_ms: sorted[0],
        max_ms: sorted[n - 1],
    }
}
