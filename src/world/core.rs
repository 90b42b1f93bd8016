use crate::config::WaterConfig;
use crate::world::block::{Block, BlockType};
use crate::world::block_coord::BlockCoord;
use crate::world::block_error::WorldError;
use crate::world::grid::VoxelGrid;
use crate::world::presentation::{BlockSnapshot, PresentationEvent};
use crate::world::visibility;
use crate::world::water::WaterRegistry;
use serde::{Deserialize, Serialize};

/// A mutation submitted from outside the simulation thread.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WorldIntent {
    AddBlock { coord: BlockCoord, block_type: BlockType },
    AddWater { coord: BlockCoord, volume: f64 },
    RemoveBlock { coord: BlockCoord },
    ReplaceBlock { coord: BlockCoord, block_type: BlockType },
    SetColorIntensity { coord: BlockCoord, intensity: f32 },
    SetOpacity { coord: BlockCoord, opacity: f32 },
}

/// Owns the grid, the water registry and the outgoing presentation events.
///
/// Every structural change goes through here so that a water block exists at
/// a coordinate exactly when the registry lists that coordinate.
#[derive(Debug, Default)]
pub struct World {
    pub(crate) grid: VoxelGrid,
    pub(crate) water: WaterRegistry,
    pub(crate) water_config: WaterConfig,
    pub(crate) events: Vec<PresentationEvent>,
}

impl World {
    pub fn new(water_config: WaterConfig) -> Self {
        Self {
            grid: VoxelGrid::new(),
            water: WaterRegistry::new(),
            water_config,
            events: Vec::new(),
        }
    }

    pub fn water_config(&self) -> &WaterConfig {
        &self.water_config
    }

    pub fn add_block(&mut self, coord: BlockCoord, block_type: BlockType) -> Result<Block, WorldError> {
        self.insert_block(coord, Block::new(block_type))
    }

    pub fn add_water(&mut self, coord: BlockCoord, volume: f64) -> Result<Block, WorldError> {
        if !volume.is_finite() || volume <= 0.0 {
            return Err(WorldError::InvalidVolume(volume));
        }
        self.insert_block(coord, Block::water(volume))
    }

    pub fn remove_block(&mut self, coord: BlockCoord) -> Result<Block, WorldError> {
        let block = self.grid.remove(coord)?;
        if block.is_water() {
            self.water.unregister(coord);
        }
        self.events.push(PresentationEvent::Despawned(coord));
        self.recompute_neighbors(coord);
        Ok(block)
    }

    /// Change the type of an existing block in place.
    pub fn replace_block(&mut self, coord: BlockCoord, block_type: BlockType) -> Result<(), WorldError> {
        let block = self.grid.get_mut(coord).ok_or(WorldError::NotFound(coord))?;
        let was_water = block.is_water();
        block.retype(block_type);

        match (was_water, block_type.is_water()) {
            (false, true) => {
                self.water.register(coord);
            }
            (true, false) => {
                self.water.unregister(coord);
            }
            _ => {}
        }
        self.emit_updated(coord);
        Ok(())
    }

    pub fn exists(&self, coord: BlockCoord) -> bool {
        self.grid.exists(coord)
    }

    pub fn exists_solid(&self, coord: BlockCoord) -> bool {
        self.grid.exists_solid(coord)
    }

    pub fn get_typed(&self, coord: BlockCoord, filter: Option<BlockType>) -> Option<&Block> {
        self.grid.get_typed(coord, filter)
    }

    pub fn get(&self, coord: BlockCoord) -> Option<&Block> {
        self.grid.get(coord)
    }

    pub fn set_color_intensity(&mut self, coord: BlockCoord, intensity: f32) -> Result<(), WorldError> {
        let block = self.grid.get_mut(coord).ok_or(WorldError::NotFound(coord))?;
        match unit_scalar(intensity) {
            Some(value) => block.render.color_intensity = value,
            None => {
                log::debug!("Ignoring color intensity {} at {}", intensity, coord);
                return Ok(());
            }
        }
        self.emit_updated(coord);
        Ok(())
    }

    pub fn set_opacity(&mut self, coord: BlockCoord, opacity: f32) -> Result<(), WorldError> {
        let block = self.grid.get_mut(coord).ok_or(WorldError::NotFound(coord))?;
        match unit_scalar(opacity) {
            Some(value) => block.render.opacity = value,
            None => {
                log::debug!("Ignoring opacity {} at {}", opacity, coord);
                return Ok(());
            }
        }
        self.emit_updated(coord);
        Ok(())
    }

    pub fn recompute_visibility(&mut self, coord: BlockCoord) {
        if visibility::recompute_visibility(&mut self.grid, coord) {
            self.emit_updated(coord);
        }
    }

    pub fn recompute_neighbors(&mut self, coord: BlockCoord) {
        for changed in visibility::recompute_neighbors(&mut self.grid, coord) {
            self.emit_updated(changed);
        }
    }

    /// Batch pass for after bulk generation.
    pub fn recompute_all(&mut self) {
        for changed in visibility::recompute_all(&mut self.grid) {
            self.emit_updated(changed);
        }
    }

    pub fn apply(&mut self, intent: WorldIntent) -> Result<(), WorldError> {
        match intent {
            WorldIntent::AddBlock { coord, block_type } => self.add_block(coord, block_type).map(drop),
            WorldIntent::AddWater { coord, volume } => self.add_water(coord, volume).map(drop),
            WorldIntent::RemoveBlock { coord } => self.remove_block(coord).map(drop),
            WorldIntent::ReplaceBlock { coord, block_type } => self.replace_block(coord, block_type),
            WorldIntent::SetColorIntensity { coord, intensity } => {
                self.set_color_intensity(coord, intensity)
            }
            WorldIntent::SetOpacity { coord, opacity } => self.set_opacity(coord, opacity),
        }
    }

    /// Hand over everything the renderer has not seen yet.
    pub fn take_events(&mut self) -> Vec<PresentationEvent> {
        std::mem::take(&mut self.events)
    }

    /// Current state of every block, for a renderer starting from scratch.
    pub fn snapshot(&self) -> Vec<BlockSnapshot> {
        self.grid
            .iter()
            .map(|(coord, block)| BlockSnapshot::capture(*coord, block))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    pub fn water_count(&self) -> usize {
        self.water.len()
    }

    pub fn water_coords(&self) -> impl Iterator<Item = &BlockCoord> {
        self.water.iter()
    }

    pub fn total_water_volume(&self) -> f64 {
        self.water
            .iter()
            .filter_map(|coord| self.grid.get(*coord).and_then(Block::volume))
            .sum()
    }

    pub(crate) fn insert_block(&mut self, coord: BlockCoord, block: Block) -> Result<Block, WorldError> {
        let is_water = block.is_water();
        self.grid.insert(coord, block)?;
        if is_water {
            self.water.register(coord);
        }

        visibility::recompute_visibility(&mut self.grid, coord);
        let placed = self.grid.get(coord).cloned().ok_or(WorldError::NotFound(coord))?;
        self.events
            .push(PresentationEvent::Spawned(BlockSnapshot::capture(coord, &placed)));
        self.recompute_neighbors(coord);
        Ok(placed)
    }

    pub(crate) fn emit_updated(&mut self, coord: BlockCoord) {
        if let Some(block) = self.grid.get(coord) {
            self.events
                .push(PresentationEvent::Updated(BlockSnapshot::capture(coord, block)));
        }
    }
}

fn unit_scalar(value: f32) -> Option<f32> {
    value.is_finite().then(|| value.clamp(0.0, 1.0))
}
