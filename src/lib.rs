pub mod config;
pub mod engine;
pub mod world;

// Re-export commonly used types
pub use config::core::EngineConfig;
pub use config::water::WaterConfig;
pub use config::worldgen::WorldGenConfig;
pub use engine::{EngineStats, VoxelEngine};
pub use world::block::{Block, BlockType};
pub use world::block_coord::BlockCoord;
pub use world::block_error::WorldError;
pub use world::presentation::{BlockSnapshot, PresentationEvent};
pub use world::water::TickReport;
pub use world::{World, WorldIntent};
