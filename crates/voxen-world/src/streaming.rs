use voxen_core::ChunkCoord;

use crate::config::{WorldConfig, MAX_VIEW_DISTANCE};
use crate::error::WorldError;
use crate::World;

/// Outcome of one [`StreamingPolicy::update`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamingReport {
    pub loaded: usize,
    pub removed: usize,
    /// Chunks inside the view distance still absent after this update.
    pub pending: usize,
}

/// Loads chunks around a center chunk and unloads distant ones.
///
/// Distances are Chebyshev (per-axis max) in chunk units. Chunks are loaded
/// within `view_distance`, nearest first and at most `load_budget` per
/// update, and unloaded once they are farther than `view_distance + 1`.
#[derive(Debug, Clone)]
pub struct StreamingPolicy {
    view_distance: i32,
    load_budget: usize,
    center: Option<ChunkCoord>,
}

impl StreamingPolicy {
    /// `view_distance` is clamped to [`MAX_VIEW_DISTANCE`].
    pub fn new(view_distance: u32, load_budget: u32) -> Self {
        if view_distance > MAX_VIEW_DISTANCE {
            log::warn!("view distance {view_distance} clamped to {MAX_VIEW_DISTANCE}");
        }
        let view_distance = i32::try_from(view_distance.min(MAX_VIEW_DISTANCE)).unwrap_or(0);
        Self {
            view_distance,
            load_budget: load_budget as usize,
            center: None,
        }
    }

    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(config.view_distance, config.load_budget)
    }

    /// Center used by the last update.
    pub fn center(&self) -> Option<ChunkCoord> {
        self.center
    }

    /// Bring the loaded set towards the view cube around `center`.
    /// Loads go through [`World::request_chunk`] and unloads through
    /// [`World::remove`], so subscribers see every change.
    pub fn update(
        &mut self,
        world: &mut World,
        center: ChunkCoord,
    ) -> Result<StreamingReport, WorldError> {
        self.center = Some(center);
        let mut report = StreamingReport::default();

        let unload_distance = self.view_distance + 1;
        let mut far: Vec<ChunkCoord> = world
            .chunk_map()
            .coords()
            .filter(|&coord| chebyshev(coord - center) > unload_distance)
            .collect();
        far.sort_by_key(|c| (c.x, c.y, c.z));
        for coord in far {
            if world.remove(coord)? {
                report.removed += 1;
            }
        }

        let mut missing = self.missing_chunks(world, center);
        missing.sort_by_key(|&c| {
            let d = c - center;
            (d.length_squared(), c.x, c.y, c.z)
        });

        for &coord in missing.iter().take(self.load_budget) {
            if world.request_chunk(coord)?.is_none() {
                // Generation is disabled or no generator is installed.
                break;
            }
            report.loaded += 1;
        }
        report.pending = missing.len() - report.loaded;

        if report.loaded > 0 || report.removed > 0 {
            log::debug!(
                "streaming around {center}: +{} -{} ({} pending)",
                report.loaded,
                report.removed,
                report.pending
            );
        }
        Ok(report)
    }

    fn missing_chunks(&self, world: &World, center: ChunkCoord) -> Vec<ChunkCoord> {
        let r = self.view_distance;
        let mut missing = Vec::new();
        for z in -r..=r {
            for y in -r..=r {
                for x in -r..=r {
                    let coord = center + ChunkCoord::new(x, y, z);
                    if !world.contains(coord) {
                        missing.push(coord);
                    }
                }
            }
        }
        missing
    }
}

fn chebyshev(d: ChunkCoord) -> i32 {
    d.abs().max_element()
}
