pub mod block;
pub mod block_coord;
pub mod block_error;
pub mod block_flags;
pub mod core;
pub mod generator;
pub mod grid;
pub mod presentation;
pub mod visibility;
pub mod water;

// Re-export commonly used types
pub use block::{Block, BlockType, RenderState};
pub use block_coord::BlockCoord;
pub use block_error::WorldError;
pub use block_flags::BlockFlags;
pub use generator::generate_cell;
pub use grid::VoxelGrid;
pub use presentation::{BlockSnapshot, PresentationEvent};
pub use self::core::{World, WorldIntent};
pub use water::{TickReport, WaterRegistry};
