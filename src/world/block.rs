use crate::world::block_flags::BlockFlags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Volume of a freshly placed, full water block.
pub const FULL_WATER_VOLUME: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BlockType {
    Oak,
    Leaves,
    Grass,
    Dirt,
    Stone,
    Water,
}

impl BlockType {
    pub fn flags(self) -> BlockFlags {
        match self {
            BlockType::Water => BlockFlags::LIQUID,
            BlockType::Oak | BlockType::Leaves | BlockType::Grass | BlockType::Dirt | BlockType::Stone => {
                BlockFlags::SOLID
            }
        }
    }

    pub fn is_water(self) -> bool {
        self.flags().is_liquid()
    }

    pub fn name(self) -> &'static str {
        match self {
            BlockType::Oak => "oak",
            BlockType::Leaves => "leaves",
            BlockType::Grass => "grass",
            BlockType::Dirt => "dirt",
            BlockType::Stone => "stone",
            BlockType::Water => "water",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-block overrides read by the rendering side. Nothing here is shared
/// between blocks, so editing one block never touches another.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderState {
    pub color_intensity: f32,
    pub opacity: f32,
    pub vertical_offset: f32,
    pub vertical_scale: f32,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            color_intensity: 1.0,
            opacity: 1.0,
            vertical_offset: 0.0,
            vertical_scale: 1.0,
        }
    }
}

impl RenderState {
    /// Derive the shape of a water block from its fill level.
    pub fn apply_water_level(&mut self, volume: f64) {
        let level = volume.clamp(0.0, 1.0) as f32;
        self.vertical_scale = level;
        self.vertical_offset = -(1.0 - level) / 2.0;
        self.opacity = level;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub block_type: BlockType,
    pub visible: bool,
    pub render: RenderState,
    volume: Option<f64>,
}

impl Block {
    /// Water blocks created through here start full.
    pub fn new(block_type: BlockType) -> Self {
        let volume = block_type.is_water().then_some(FULL_WATER_VOLUME);
        Self {
            block_type,
            visible: true,
            render: RenderState::default(),
            volume,
        }
    }

    pub fn water(volume: f64) -> Self {
        let mut block = Self::new(BlockType::Water);
        block.volume = Some(volume);
        block.render.apply_water_level(volume);
        block
    }

    pub fn is_water(&self) -> bool {
        self.block_type.is_water()
    }

    /// Something water can rest on.
    pub fn is_solid(&self) -> bool {
        self.flags().supports_water()
    }

    pub fn flags(&self) -> BlockFlags {
        self.block_type.flags()
    }

    /// Fill level, `Some` exactly when this is a water block.
    pub fn volume(&self) -> Option<f64> {
        self.volume
    }

    pub(crate) fn set_volume(&mut self, volume: f64) {
        if self.is_water() {
            self.volume = Some(volume);
        }
    }

    /// Change the type in place, keeping the volume in step with it.
    pub(crate) fn retype(&mut self, block_type: BlockType) {
        if self.block_type == block_type {
            return;
        }
        self.block_type = block_type;
        if block_type.is_water() {
            self.volume = Some(FULL_WATER_VOLUME);
            self.render.apply_water_level(FULL_WATER_VOLUME);
        } else {
            self.volume = None;
            self.render.vertical_offset = 0.0;
            self.render.vertical_scale = 1.0;
        }
    }
}
