use crate::config::WorldGenConfig;
use crate::world::block::BlockType;
use crate::world::block_coord::BlockCoord;
use crate::world::core::World;
use glam::IVec3;

/// Layer stack of the starting cell, top down: grass, `dirt_depth` layers of
/// dirt, then stone to the bottom.
pub fn layer_for(depth_from_top: u32, dirt_depth: u32) -> BlockType {
    if depth_from_top == 0 {
        BlockType::Grass
    } else if depth_from_top <= dirt_depth {
        BlockType::Dirt
    } else {
        BlockType::Stone
    }
}

/// Fill a solid cube of terrain, place the configured water sources on its
/// top face and run the batch visibility pass. Returns how many blocks were
/// placed; occupied coordinates are skipped.
pub fn generate_cell(world: &mut World, config: &WorldGenConfig) -> usize {
    let size = config.cell_size as i32;
    let origin = BlockCoord::from(config.cell_origin);
    let mut placed = 0;
    let mut out_of_range = 0;

    for y in 0..size {
        let block_type = layer_for((size - 1 - y) as u32, config.dirt_depth);
        for z in 0..size {
            for x in 0..size {
                let Some(coord) = origin.offset(IVec3::new(x, y, z)) else {
                    out_of_range += 1;
                    continue;
                };
                if world.exists(coord) {
                    continue;
                }
                if world.add_block(coord, block_type).is_ok() {
                    placed += 1;
                }
            }
        }
    }
    if out_of_range > 0 {
        log::warn!(
            "Skipped {} cells past the coordinate range at origin {}",
            out_of_range,
            origin
        );
    }

    for source in &config.water_sources {
        let Some(coord) = origin.offset(IVec3::new(source.x, size, source.z)) else {
            log::warn!("Skipping water source at {:?}: out of range", source);
            continue;
        };
        match world.add_water(coord, source.volume) {
            Ok(_) => placed += 1,
            Err(err) => log::warn!("Skipping water source: {}", err),
        }
    }

    world.recompute_all();
    log::info!(
        "Generated {}x{}x{} cell at {:?}: {} blocks, {} water",
        size,
        size,
        size,
        config.cell_origin,
        placed,
        world.water_count()
    );
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{WaterConfig, WaterSource};

    fn test_config() -> WorldGenConfig {
        WorldGenConfig {
            cell_size: 4,
            cell_origin: [-2, -4, -2],
            dirt_depth: 1,
            water_sources: vec![WaterSource {
                x: 1,
                z: 1,
                volume: 0.75,
            }],
        }
    }

    #[test]
    fn test_layers() {
        assert_eq!(layer_for(0, 2), BlockType::Grass);
        assert_eq!(layer_for(1, 2), BlockType::Dirt);
        assert_eq!(layer_for(2, 2), BlockType::Dirt);
        assert_eq!(layer_for(3, 2), BlockType::Stone);
    }

    #[test]
    fn test_generate_cell() {
        let mut world = World::new(WaterConfig::default());
        let placed = generate_cell(&mut world, &test_config());

        assert_eq!(placed, 4 * 4 * 4 + 1);
        assert_eq!(world.get(BlockCoord::new(-2, -1, -2)).unwrap().block_type, BlockType::Grass);
        assert_eq!(world.get(BlockCoord::new(-2, -2, -2)).unwrap().block_type, BlockType::Dirt);
        assert_eq!(world.get(BlockCoord::new(-2, -4, -2)).unwrap().block_type, BlockType::Stone);

        let water = BlockCoord::new(-1, 0, -1);
        assert_eq!(world.get(water).unwrap().volume(), Some(0.75));
        assert!(world.exists_solid(BlockCoord::new(-1, -1, -1)));

        assert!(!world.get(BlockCoord::new(-1, -3, -1)).unwrap().visible);
        assert!(world.get(BlockCoord::new(-2, -3, -1)).unwrap().visible);
    }

    #[test]
    fn test_generate_skips_occupied() {
        let mut world = World::new(WaterConfig::default());
        world.add_block(BlockCoord::new(-2, -4, -2), BlockType::Oak).unwrap();

        let placed = generate_cell(&mut world, &test_config());
        assert_eq!(placed, 4 * 4 * 4);
        assert_eq!(world.get(BlockCoord::new(-2, -4, -2)).unwrap().block_type, BlockType::Oak);
    }

    #[test]
    fn test_origin_at_range_edge() {
        let mut world = World::new(WaterConfig::default());
        let config = WorldGenConfig {
            cell_origin: [i32::MAX - 2, 0, 0],
            ..test_config()
        };

        // Only x = MAX-2..=MAX fits; the fourth column and nothing else is dropped.
        let placed = generate_cell(&mut world, &config);
        assert_eq!(placed, 3 * 4 * 4 + 1);
        assert!(world.exists(BlockCoord::new(i32::MAX, 0, 0)));
        assert!(world.get(BlockCoord::new(i32::MAX, 3, 3)).unwrap().visible);
    }

    #[test]
    fn test_water_source_past_range_is_skipped() {
        let mut world = World::new(WaterConfig::default());
        let config = WorldGenConfig {
            cell_origin: [0, i32::MAX - 3, 0],
            ..test_config()
        };

        let placed = generate_cell(&mut world, &config);
        assert_eq!(placed, 4 * 4 * 4);
        assert_eq!(world.water_count(), 0);
    }

    #[test]
    fn test_default_cell_layers() {
        let mut world = World::new(WaterConfig::default());
        generate_cell(&mut world, &WorldGenConfig::default());

        let column: Vec<_> = (4..8)
            .rev()
            .map(|y| world.get(BlockCoord::new(0, y, 0)).unwrap().block_type)
            .collect();
        assert_eq!(
            column,
            vec![BlockType::Grass, BlockType::Dirt, BlockType::Stone, BlockType::Stone]
        );
        assert_eq!(world.get(BlockCoord::new(4, 8, 4)).unwrap().volume(), Some(1.0));
    }
}
