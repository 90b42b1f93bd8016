use crate::world::block::{Block, BlockType};
use crate::world::block_coord::BlockCoord;
use crate::world::block_error::WorldError;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Sparse coordinate → block store.
///
/// Keyed directly by the signed coordinate, so nothing has to be pre-sized
/// and negative positions behave like any other.
#[derive(Debug, Clone, Default)]
pub struct VoxelGrid {
    blocks: HashMap<BlockCoord, Block>,
}

impl VoxelGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `block` only if `coord` is vacant.
    pub fn insert(&mut self, coord: BlockCoord, block: Block) -> Result<&mut Block, WorldError> {
        match self.blocks.entry(coord) {
            Entry::Occupied(_) => Err(WorldError::AlreadyOccupied(coord)),
            Entry::Vacant(entry) => Ok(entry.insert(block)),
        }
    }

    pub fn remove(&mut self, coord: BlockCoord) -> Result<Block, WorldError> {
        self.blocks
            .remove(&coord)
            .ok_or(WorldError::NotFound(coord))
    }

    pub fn get(&self, coord: BlockCoord) -> Option<&Block> {
        self.blocks.get(&coord)
    }

    pub fn get_mut(&mut self, coord: BlockCoord) -> Option<&mut Block> {
        self.blocks.get_mut(&coord)
    }

    pub fn exists(&self, coord: BlockCoord) -> bool {
        self.blocks.contains_key(&coord)
    }

    /// Occupied by anything other than water.
    pub fn exists_solid(&self, coord: BlockCoord) -> bool {
        self.blocks.get(&coord).map_or(false, Block::is_solid)
    }

    /// The block at `coord`, but only when it matches `filter` (or no filter
    /// is given). `None` covers both "vacant" and "some other type".
    pub fn get_typed(&self, coord: BlockCoord, filter: Option<BlockType>) -> Option<&Block> {
        self.blocks
            .get(&coord)
            .filter(|block| filter.map_or(true, |wanted| block.block_type == wanted))
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BlockCoord, &Block)> {
        self.blocks.iter()
    }

    pub(crate) fn blocks(&self) -> &HashMap<BlockCoord, Block> {
        &self.blocks
    }
}
