pub mod core;
pub mod water;
pub mod worldgen;

pub use self::core::{load_or_create_config, EngineConfig};
pub use water::WaterConfig;
pub use worldgen::{WaterSource, WorldGenConfig};
