use crate::world::block_coord::BlockCoord;
use thiserror::Error;

/// Expected, recoverable outcomes of grid and water operations. None of
/// these abort the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum WorldError {
    #[error("Block already present at {0}")]
    AlreadyOccupied(BlockCoord),

    #[error("No block at {0}")]
    NotFound(BlockCoord),

    #[error("Water at {0} has no solid block beneath it")]
    NoSupport(BlockCoord),

    #[error("No floor found below {0} within the seek depth")]
    Unsupported(BlockCoord),

    #[error("Invalid water volume: {0}")]
    InvalidVolume(f64),
}
