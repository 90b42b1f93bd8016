use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tuning for the water tick. Defaults reproduce the reference behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterConfig {
    /// Volume every voxel loses per tick, unconditionally.
    pub absorption_rate: f64,
    /// Voxels below this volume are removed.
    pub removal_threshold: f64,
    /// Share of the current volume pushed into a lower-volume water neighbor.
    pub lateral_transfer_rate: f64,
    /// Voxels below this volume do not spill into vacant cells.
    pub floor_seek_min_volume: f64,
    /// How many cells below the neighbor's level a floor-seek looks.
    pub floor_seek_depth: u32,
    /// Share pushed into water found by a floor-seek.
    pub pool_transfer_rate: f64,
    /// Share seeded into a voxel created on a solid floor.
    pub spawn_transfer_rate: f64,
    /// Lower bound on any floor-seek transfer.
    pub min_floor_transfer: f64,
    /// Delay between the end of one tick and the start of the next.
    pub tick_interval_ms: u64,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            absorption_rate: 0.00005,
            removal_threshold: 0.001,
            lateral_transfer_rate: 0.05,
            floor_seek_min_volume: 0.01,
            floor_seek_depth: 3,
            pool_transfer_rate: 0.10,
            spawn_transfer_rate: 0.02,
            min_floor_transfer: 0.005,
            tick_interval_ms: 50,
        }
    }
}

impl WaterConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
