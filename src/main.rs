use anyhow::Result;
use glam::IVec3;
use log::{debug, info, warn};
use simple_logger::SimpleLogger;
use std::{
    collections::HashSet,
    thread,
    time::{Duration, Instant},
};

use bloksel_water::{
    config::{core::load_or_create_config, EngineConfig},
    engine::VoxelEngine,
    world::{generate_cell, BlockCoord, PresentationEvent, World, WorldIntent},
};

const FRAME_TIME: Duration = Duration::from_millis(16);

fn main() -> Result<()> {
    let (config, config_error) = match load_or_create_config() {
        Ok(config) => (config, None),
        Err(e) => (EngineConfig::default(), Some(e)),
    };

    SimpleLogger::new()
        .with_level(config.log_level_filter())
        .init()?;
    if let Some(e) = config_error {
        warn!("Using default configuration: {:#}", e);
    }
    info!("Initializing water simulation...");

    let mut world = World::new(config.water);
    generate_cell(&mut world, &config.worldgen);
    info!(
        "World ready: {} blocks, {:.3} units of water",
        world.len(),
        world.total_water_volume()
    );

    let mut engine = VoxelEngine::start(world)?;
    let run_for = Duration::from_secs_f32(config.run_seconds.max(0.0).min(86_400.0));
    let started = Instant::now();
    let mut spawned = 0usize;
    let mut updated = 0usize;
    let mut despawned = 0usize;
    let mut touched = HashSet::new();

    // Knock a hole in the top of the cell halfway through so the water has
    // somewhere to go.
    let size = config.worldgen.cell_size as i32;
    let mut hole = BlockCoord::from(config.worldgen.cell_origin)
        .offset(IVec3::new(size / 2 + 1, size - 1, size / 2));

    while started.elapsed() < run_for {
        if started.elapsed() >= run_for / 2 {
            if let Some(coord) = hole.take() {
                engine.submit(WorldIntent::RemoveBlock { coord })?;
            }
        }

        for event in engine.poll_events() {
            touched.insert(event.coord());
            match event {
                PresentationEvent::Spawned(_) => spawned += 1,
                PresentationEvent::Updated(_) => updated += 1,
                PresentationEvent::Despawned(coord) => {
                    debug!("Despawned {}", coord);
                    despawned += 1;
                }
            }
        }
        thread::sleep(FRAME_TIME);
    }

    engine.shutdown()?;
    let stats = engine.get_stats();
    info!(
        "Ran {} ticks: {} blocks, {} water voxels holding {:.4}",
        stats.tick_count, stats.block_count, stats.water_count, stats.water_volume
    );
    info!(
        "Presentation events: {} spawned, {} updated, {} despawned over {} cells ({} dropped)",
        spawned,
        updated,
        despawned,
        touched.len(),
        stats.dropped_events
    );
    Ok(())
}
