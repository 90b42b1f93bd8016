use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldGenConfig {
    /// Edge length of the starting terrain cell.
    pub cell_size: u32,
    /// Minimum corner of the starting cell.
    pub cell_origin: [i32; 3],
    /// Number of dirt layers between the grass top and the stone below.
    pub dirt_depth: u32,
    /// Water placed on top of the cell at startup.
    pub water_sources: Vec<WaterSource>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterSource {
    pub x: i32,
    pub z: i32,
    pub volume: f64,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            cell_size: 8,
            cell_origin: [0, 0, 0],
            dirt_depth: 1,
            water_sources: vec![WaterSource {
                x: 4,
                z: 4,
                volume: 1.0,
            }],
        }
    }
}
