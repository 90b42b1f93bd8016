//! Everything the rendering side gets to see of the world.
//!
//! The core never touches meshes or materials; it only hands out these plain
//! records whenever a block appears, disappears, or changes how it should look.

use crate::world::block::{Block, BlockType};
use crate::world::block_coord::BlockCoord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockSnapshot {
    pub coord: BlockCoord,
    pub block_type: BlockType,
    pub visible: bool,
    pub color_intensity: f32,
    pub opacity: f32,
    pub vertical_offset: f32,
    pub vertical_scale: f32,
}

impl BlockSnapshot {
    pub fn capture(coord: BlockCoord, block: &Block) -> Self {
        Self {
            coord,
            block_type: block.block_type,
            visible: block.visible,
            color_intensity: block.render.color_intensity,
            opacity: block.render.opacity,
            vertical_offset: block.render.vertical_offset,
            vertical_scale: block.render.vertical_scale,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PresentationEvent {
    Spawned(BlockSnapshot),
    Updated(BlockSnapshot),
    Despawned(BlockCoord),
}

impl PresentationEvent {
    pub fn coord(&self) -> BlockCoord {
        match self {
            PresentationEvent::Spawned(snapshot) | PresentationEvent::Updated(snapshot) => {
                snapshot.coord
            }
            PresentationEvent::Despawned(coord) => *coord,
        }
    }
}
