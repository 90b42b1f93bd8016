//! Discrete-time water diffusion.
//!
//! Each tick visits the active water voxels from fullest to emptiest. Every
//! voxel loses a little volume, disappears if it ran dry or lost its floor,
//! and otherwise pushes volume sideways: into shallower water next to it, or
//! down into the first occupied cell found below an empty neighbor. Flow only
//! ever moves volume between voxels, so the total drops by exactly what was
//! absorbed plus what vanished with removed voxels.

use crate::config::WaterConfig;
use crate::world::block::{Block, BlockType};
use crate::world::block_coord::BlockCoord;
use crate::world::block_error::WorldError;
use crate::world::core::World;
use crate::world::grid::VoxelGrid;
use crate::world::presentation::PresentationEvent;
use glam::IVec3;
use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Coordinates of every live water voxel.
///
/// The list keeps the tick order; `slots` maps each coordinate to its place in
/// the list so membership and removal stay constant time.
#[derive(Debug, Clone, Default)]
pub struct WaterRegistry {
    voxels: Vec<BlockCoord>,
    slots: HashMap<BlockCoord, usize>,
}

impl WaterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register(&mut self, coord: BlockCoord) -> bool {
        match self.slots.entry(coord) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(self.voxels.len());
                self.voxels.push(coord);
                true
            }
        }
    }

    /// Order is not preserved; the registry is re-sorted at the start of every tick.
    pub(crate) fn unregister(&mut self, coord: BlockCoord) -> bool {
        let Some(index) = self.slots.remove(&coord) else {
            return false;
        };
        self.voxels.swap_remove(index);
        if let Some(moved) = self.voxels.get(index) {
            self.slots.insert(*moved, index);
        }
        true
    }

    pub fn contains(&self, coord: BlockCoord) -> bool {
        self.slots.contains_key(&coord)
    }

    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockCoord> {
        self.voxels.iter()
    }

    /// Fullest first. Equal volumes fall back to coordinate order so a tick
    /// is reproducible.
    pub(crate) fn sort_by_volume(&mut self, grid: &VoxelGrid) {
        let volume = |coord: &BlockCoord| {
            grid.get(*coord)
                .and_then(Block::volume)
                .unwrap_or(f64::NEG_INFINITY)
        };
        self.voxels.sort_by(|a, b| {
            volume(b)
                .partial_cmp(&volume(a))
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.cmp(b))
        });
        for (index, coord) in self.voxels.iter().enumerate() {
            self.slots.insert(*coord, index);
        }
    }
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    /// Voxels visited this tick.
    pub processed: usize,
    /// Voxels removed for running dry or losing their floor.
    pub removed: usize,
    /// Voxels created on a floor found by a floor-seek.
    pub created: usize,
    /// Volume lost to absorption.
    pub absorbed: f64,
    /// Volume still held by voxels at the moment they were removed.
    pub discarded: f64,
    /// Volume moved between voxels, including seeds for new voxels.
    pub transferred: f64,
}

enum Floor {
    Water(BlockCoord),
    Solid(BlockCoord),
}

impl World {
    /// Advance the water by one tick. Runs to completion; nothing can observe
    /// the world halfway through.
    pub fn tick_water(&mut self) -> TickReport {
        let config = self.water_config;
        let mut report = TickReport::default();

        self.water.sort_by_volume(&self.grid);
        // Voxels spawned during this tick wait for the next one.
        let order: Vec<BlockCoord> = self.water.iter().copied().collect();

        for coord in order {
            let Some(volume) = self.water_volume(coord) else {
                continue;
            };
            report.processed += 1;

            let volume = volume - config.absorption_rate;
            report.absorbed += config.absorption_rate;
            self.set_water_volume(coord, volume);

            let support = self.check_support(coord);
            if volume < config.removal_threshold || support.is_err() {
                match support {
                    Err(reason) => log::trace!("Removing water: {}", reason),
                    Ok(()) => log::trace!("Removing water at {}: drained to {:.6}", coord, volume),
                }
                self.discard_water(coord);
                report.removed += 1;
                report.discarded += volume;
                continue;
            }

            for neighbor in coord.horizontal_neighbors() {
                self.flow_into(coord, neighbor, &config, &mut report);
            }
        }

        let remaining: Vec<BlockCoord> = self.water.iter().copied().collect();
        for coord in remaining {
            if let Some(block) = self.grid.get_mut(coord) {
                if let Some(volume) = block.volume() {
                    block.render.apply_water_level(volume);
                }
            }
            self.emit_updated(coord);
        }

        log::debug!(
            "Water tick: {} processed, {} removed, {} created, {} active",
            report.processed,
            report.removed,
            report.created,
            self.water.len()
        );
        report
    }

    fn water_volume(&self, coord: BlockCoord) -> Option<f64> {
        self.grid
            .get_typed(coord, Some(BlockType::Water))
            .and_then(Block::volume)
    }

    fn set_water_volume(&mut self, coord: BlockCoord, volume: f64) {
        if let Some(block) = self.grid.get_mut(coord) {
            block.set_volume(volume);
        }
    }

    fn shift_volume(&mut self, from: BlockCoord, to: BlockCoord, amount: f64) {
        if let (Some(source), Some(target)) = (self.water_volume(from), self.water_volume(to)) {
            self.set_water_volume(from, source - amount);
            self.set_water_volume(to, target + amount);
        }
    }

    fn check_support(&self, coord: BlockCoord) -> Result<(), WorldError> {
        match coord.below() {
            Some(below) if self.grid.exists_solid(below) => Ok(()),
            _ => Err(WorldError::NoSupport(coord)),
        }
    }

    fn discard_water(&mut self, coord: BlockCoord) {
        if self.grid.remove(coord).is_ok() {
            self.water.unregister(coord);
            self.events.push(PresentationEvent::Despawned(coord));
            self.recompute_neighbors(coord);
        }
    }

    /// First occupied cell from `start` down to `depth` cells below it.
    fn seek_floor(&self, start: BlockCoord, depth: u32) -> Result<Floor, WorldError> {
        for step in 0..=depth as i32 {
            let Some(cell) = start.offset(IVec3::new(0, -step, 0)) else {
                break;
            };
            match self.grid.get(cell) {
                Some(block) if block.is_water() => return Ok(Floor::Water(cell)),
                Some(_) => return Ok(Floor::Solid(cell)),
                None => {}
            }
        }
        Err(WorldError::Unsupported(start))
    }

    fn flow_into(
        &mut self,
        coord: BlockCoord,
        neighbor: BlockCoord,
        config: &WaterConfig,
        report: &mut TickReport,
    ) {
        let Some(current) = self.water_volume(coord) else {
            return;
        };

        if let Some(neighbor_volume) = self.water_volume(neighbor) {
            if neighbor_volume < current {
                let amount = current * config.lateral_transfer_rate;
                self.shift_volume(coord, neighbor, amount);
                report.transferred += amount;
            }
            return;
        }

        if self.grid.exists(neighbor) || current < config.floor_seek_min_volume {
            return;
        }

        match self.seek_floor(neighbor, config.floor_seek_depth) {
            Ok(Floor::Water(pool)) => {
                let amount = (current * config.pool_transfer_rate).max(config.min_floor_transfer);
                self.shift_volume(coord, pool, amount);
                report.transferred += amount;
            }
            Ok(Floor::Solid(floor)) => {
                let Some(target) = floor.above() else {
                    return;
                };
                let amount = (current * config.spawn_transfer_rate).max(config.min_floor_transfer);
                match self.insert_block(target, Block::water(amount)) {
                    Ok(_) => {
                        self.set_water_volume(coord, current - amount);
                        report.created += 1;
                        report.transferred += amount;
                    }
                    Err(err) => log::trace!("Skipping spill: {}", err),
                }
            }
            Err(err) => log::trace!("Deferring spill: {}", err),
        }
    }
}
