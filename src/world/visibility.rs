//! Binary face-exposure culling: a block is visible when at least one of its
//! six neighbors is vacant.

use crate::world::block_coord::{BlockCoord, FACE_OFFSETS};
use crate::world::grid::VoxelGrid;
use rayon::prelude::*;

pub fn has_exposed_face(grid: &VoxelGrid, coord: BlockCoord) -> bool {
    FACE_OFFSETS
        .iter()
        .any(|delta| coord.offset(*delta).map_or(true, |n| !grid.exists(n)))
}

/// Returns true when the block at `coord` exists and its flag flipped.
pub fn recompute_visibility(grid: &mut VoxelGrid, coord: BlockCoord) -> bool {
    let exposed = has_exposed_face(grid, coord);
    match grid.get_mut(coord) {
        Some(block) if block.visible != exposed => {
            block.visible = exposed;
            true
        }
        _ => false,
    }
}

/// Recheck the six neighbors of `coord`, returning those whose flag flipped.
pub fn recompute_neighbors(grid: &mut VoxelGrid, coord: BlockCoord) -> Vec<BlockCoord> {
    coord
        .face_neighbors()
        .filter(|neighbor| recompute_visibility(grid, *neighbor))
        .collect()
}

/// Full pass over every populated coordinate. Meant for after bulk
/// generation, not for per-frame use.
pub fn recompute_all(grid: &mut VoxelGrid) -> Vec<BlockCoord> {
    let flips: Vec<(BlockCoord, bool)> = {
        let view = &*grid;
        view.blocks()
            .par_iter()
            .filter_map(|(coord, block)| {
                let exposed = has_exposed_face(view, *coord);
                (block.visible != exposed).then_some((*coord, exposed))
            })
            .collect()
    };

    for (coord, exposed) in &flips {
        if let Some(block) = grid.get_mut(*coord) {
            block.visible = *exposed;
        }
    }

    log::debug!("Visibility pass over {} blocks, {} changed", grid.len(), flips.len());
    flips.into_iter().map(|(coord, _)| coord).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::block::{Block, BlockType};

    fn dense_cube(size: i32) -> VoxelGrid {
        let mut grid = VoxelGrid::new();
        for x in 0..size {
            for y in 0..size {
                for z in 0..size {
                    grid.insert(BlockCoord::new(x, y, z), Block::new(BlockType::Stone))
                        .unwrap();
                }
            }
        }
        grid
    }

    #[test]
    fn test_dense_cube_interior_hidden() {
        let size = 4;
        let mut grid = dense_cube(size);
        recompute_all(&mut grid);

        for (coord, block) in grid.iter() {
            let on_surface = [coord.x(), coord.y(), coord.z()]
                .iter()
                .any(|v| *v == 0 || *v == size - 1);
            assert_eq!(block.visible, on_surface, "wrong visibility at {}", coord);
        }
        assert_eq!(grid.iter().filter(|(_, b)| !b.visible).count(), 8);
    }

    #[test]
    fn test_single_block_is_visible() {
        let mut grid = VoxelGrid::new();
        let coord = BlockCoord::new(-7, -7, -7);
        let mut block = Block::new(BlockType::Dirt);
        block.visible = false;
        grid.insert(coord, block).unwrap();

        assert!(recompute_visibility(&mut grid, coord));
        assert!(grid.get(coord).unwrap().visible);
        assert!(!recompute_visibility(&mut grid, coord));
    }

    #[test]
    fn test_neighbors_unhidden_after_removal() {
        let mut grid = dense_cube(3);
        recompute_all(&mut grid);
        let center = BlockCoord::new(1, 1, 1);
        assert!(!grid.get(center).unwrap().visible);

        // Carve out the top middle; the center now sees air above it.
        let top = BlockCoord::new(1, 2, 1);
        grid.remove(top).unwrap();
        let changed = recompute_neighbors(&mut grid, top);
        assert_eq!(changed, vec![center]);
        assert!(grid.get(center).unwrap().visible);
    }

    #[test]
    fn test_vacant_coordinate_is_noop() {
        let mut grid = VoxelGrid::new();
        assert!(!recompute_visibility(&mut grid, BlockCoord::new(0, 0, 0)));
        assert!(recompute_neighbors(&mut grid, BlockCoord::new(0, 0, 0)).is_empty());
    }
}
