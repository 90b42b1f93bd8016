use crate::config::WaterConfig;
use crate::world::{PresentationEvent, TickReport, World, WorldIntent};
use anyhow::{anyhow, Context, Result};
use crossbeam_channel::{at, bounded, select, unbounded, Receiver, Sender, TrySendError};
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

/// Presentation events buffered for the host before new ones are dropped.
pub const EVENT_QUEUE_CAPACITY: usize = 1 << 16;

/// Runs the water simulation on its own thread.
///
/// The simulation thread is the only writer: everything else submits
/// [`WorldIntent`]s and reads through [`VoxelEngine::read`]. A tick holds the
/// world lock until it finishes, and the next one starts a full tick interval
/// after that.
///
/// Every tick emits an update per water voxel. The host is expected to call
/// [`VoxelEngine::poll_events`] every frame; once the queue is full, further
/// events are dropped and counted in [`EngineStats::dropped_events`].
pub struct VoxelEngine {
    world: Arc<Mutex<World>>,
    intents: Sender<WorldIntent>,
    events: Receiver<PresentationEvent>,
    shutdown: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,

    running: Arc<AtomicBool>,
    tick_counter: Arc<AtomicU64>,
    dropped_events: Arc<AtomicU64>,
    last_report: Arc<Mutex<TickReport>>,
}

#[derive(Debug, Clone, Default)]
pub struct EngineStats {
    pub tick_count: u64,
    pub block_count: usize,
    pub water_count: usize,
    pub water_volume: f64,
    pub queued_intents: usize,
    pub queued_events: usize,
    pub dropped_events: u64,
    pub last_tick: TickReport,
}

impl VoxelEngine {
    /// Take ownership of a generated world and start ticking it.
    pub fn start(world: World) -> Result<Self> {
        Self::start_with_event_capacity(world, EVENT_QUEUE_CAPACITY)
    }

    pub fn start_with_event_capacity(world: World, event_capacity: usize) -> Result<Self> {
        let tick_interval = world.water_config().tick_interval();
        let world = Arc::new(Mutex::new(world));
        let (intent_sender, intent_receiver) = unbounded();
        let (event_sender, event_receiver) = bounded(event_capacity.max(1));
        let (shutdown_sender, shutdown_receiver) = unbounded();
        let running = Arc::new(AtomicBool::new(true));
        let tick_counter = Arc::new(AtomicU64::new(0));
        let dropped_events = Arc::new(AtomicU64::new(0));
        let last_report = Arc::new(Mutex::new(TickReport::default()));

        let worker = SimulationWorker {
            world: world.clone(),
            intents: intent_receiver,
            events: event_sender,
            shutdown: shutdown_receiver,
            running: running.clone(),
            tick_counter: tick_counter.clone(),
            dropped_events: dropped_events.clone(),
            last_report: last_report.clone(),
            tick_interval,
        };

        let handle = thread::Builder::new()
            .name("water-simulation".into())
            .spawn(move || worker.run())
            .with_context(|| "Failed to spawn simulation thread")?;

        info!("Simulation started, ticking every {:?}", tick_interval);

        Ok(Self {
            world,
            intents: intent_sender,
            events: event_receiver,
            shutdown: Some(shutdown_sender),
            handle: Some(handle),
            running,
            tick_counter,
            dropped_events,
            last_report,
        })
    }

    pub fn submit(&self, intent: WorldIntent) -> Result<()> {
        self.intents
            .send(intent)
            .map_err(|_| anyhow!("Simulation thread is no longer accepting intents"))
    }

    /// Short read-only look at the world. Holds the lock for the duration of `f`.
    pub fn read<R>(&self, f: impl FnOnce(&World) -> R) -> R {
        f(&self.world.lock())
    }

    /// Drain the presentation events published so far.
    pub fn poll_events(&self) -> Vec<PresentationEvent> {
        self.events.try_iter().collect()
    }

    pub fn water_config(&self) -> WaterConfig {
        *self.world.lock().water_config()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_counter.load(Ordering::Relaxed)
    }

    pub fn get_stats(&self) -> EngineStats {
        let world = self.world.lock();
        EngineStats {
            tick_count: self.tick_count(),
            block_count: world.len(),
            water_count: world.water_count(),
            water_volume: world.total_water_volume(),
            queued_intents: self.intents.len(),
            queued_events: self.events.len(),
            dropped_events: self.dropped_events.load(Ordering::Relaxed),
            last_tick: *self.last_report.lock(),
        }
    }

    /// Stop ticking and wait for the simulation thread. The in-flight tick,
    /// if any, always completes first.
    pub fn shutdown(&mut self) -> Result<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        if let Some(shutdown) = self.shutdown.take() {
            // A send error only means the thread is already gone.
            let _ = shutdown.send(());
        }
        handle
            .join()
            .map_err(|_| anyhow!("Simulation thread panicked"))?;
        info!("Simulation stopped after {} ticks", self.tick_count());
        Ok(())
    }
}

impl Drop for VoxelEngine {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            warn!("Failed to stop simulation cleanly: {}", e);
        }
    }
}

struct SimulationWorker {
    world: Arc<Mutex<World>>,
    intents: Receiver<WorldIntent>,
    events: Sender<PresentationEvent>,
    shutdown: Receiver<()>,
    running: Arc<AtomicBool>,
    tick_counter: Arc<AtomicU64>,
    dropped_events: Arc<AtomicU64>,
    last_report: Arc<Mutex<TickReport>>,
    tick_interval: Duration,
}

impl SimulationWorker {
    fn run(self) {
        let mut next_tick = Instant::now() + self.tick_interval;

        loop {
            select! {
                recv(self.shutdown) -> _ => break,
                recv(self.intents) -> msg => match msg {
                    Ok(intent) => self.apply(intent),
                    Err(_) => break,
                },
                recv(at(next_tick)) -> _ => {
                    self.tick();
                    next_tick = Instant::now() + self.tick_interval;
                }
            }
        }

        self.running.store(false, Ordering::Release);
    }

    fn apply(&self, intent: WorldIntent) {
        let mut world = self.world.lock();
        if let Err(e) = world.apply(intent) {
            debug!("Dropped intent {:?}: {}", intent, e);
        }
        self.publish(&mut world);
    }

    fn tick(&self) {
        let mut world = self.world.lock();
        let report = world.tick_water();
        self.publish(&mut world);
        drop(world);

        *self.last_report.lock() = report;
        self.tick_counter.fetch_add(1, Ordering::Relaxed);
    }

    fn publish(&self, world: &mut World) {
        let mut dropped = 0u64;
        for event in world.take_events() {
            match self.events.try_send(event) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => dropped += 1,
                // The engine handle is gone; nobody is listening anymore.
                Err(TrySendError::Disconnected(_)) => return,
            }
        }
        if dropped > 0 {
            let total = self.dropped_events.fetch_add(dropped, Ordering::Relaxed) + dropped;
            if total == dropped {
                warn!("Presentation queue full, dropping events until it is drained");
            }
            debug!("Dropped {} presentation events ({} total)", dropped, total);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{BlockCoord, BlockType};

    fn fast_world() -> World {
        let config = WaterConfig {
            tick_interval_ms: 5,
            ..WaterConfig::default()
        };
        let mut world = World::new(config);
        world.add_block(BlockCoord::new(0, 0, 0), BlockType::Stone).unwrap();
        world.add_water(BlockCoord::new(0, 1, 0), 1.0).unwrap();
        world
    }

    fn wait_for(engine: &VoxelEngine, mut done: impl FnMut(&VoxelEngine) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !done(engine) {
            assert!(Instant::now() < deadline, "timed out waiting on the simulation");
            thread::sleep(Duration::from_millis(2));
        }
    }

    #[test]
    fn test_ticks_advance() {
        let mut engine = VoxelEngine::start(fast_world()).unwrap();
        wait_for(&engine, |e| e.tick_count() >= 3);

        let volume = engine.read(|world| {
            world
                .get(BlockCoord::new(0, 1, 0))
                .and_then(|block| block.volume())
                .unwrap()
        });
        assert!(volume < 1.0);
        engine.shutdown().unwrap();
        assert!(!engine.is_running());
    }

    #[test]
    fn test_intents_are_applied() {
        let mut engine = VoxelEngine::start(fast_world()).unwrap();
        let coord = BlockCoord::new(-4, 7, 2);
        engine
            .submit(WorldIntent::AddBlock {
                coord,
                block_type: BlockType::Leaves,
            })
            .unwrap();
        wait_for(&engine, |e| e.read(|world| world.exists(coord)));

        // Pull the floor out from under the water; the next tick drops it.
        engine
            .submit(WorldIntent::RemoveBlock {
                coord: BlockCoord::new(0, 0, 0),
            })
            .unwrap();
        wait_for(&engine, |e| e.read(|world| world.water_count() == 0));

        let events = engine.poll_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, PresentationEvent::Spawned(s) if s.coord == coord)));
        assert!(events
            .iter()
            .any(|e| *e == PresentationEvent::Despawned(BlockCoord::new(0, 1, 0))));
        engine.shutdown().unwrap();
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let mut engine = VoxelEngine::start(fast_world()).unwrap();
        engine.shutdown().unwrap();
        engine.shutdown().unwrap();
        assert!(engine.submit(WorldIntent::RemoveBlock {
            coord: BlockCoord::new(0, 0, 0),
        })
        .is_err());
    }

    #[test]
    fn test_stats() {
        let engine = VoxelEngine::start(fast_world()).unwrap();
        wait_for(&engine, |e| e.tick_count() >= 1);
        let stats = engine.get_stats();
        assert_eq!(stats.block_count, 2);
        assert_eq!(stats.water_count, 1);
        assert!(stats.tick_count >= 1);
        assert_eq!(engine.water_config().tick_interval_ms, 5);
    }

    #[test]
    fn test_full_event_queue_drops_and_counts() {
        let mut engine = VoxelEngine::start_with_event_capacity(fast_world(), 4).unwrap();
        wait_for(&engine, |e| e.get_stats().dropped_events > 0);

        let stats = engine.get_stats();
        assert_eq!(stats.queued_events, 4);
        assert_eq!(engine.poll_events().len(), 4);
        engine.shutdown().unwrap();
    }

    #[test]
    fn test_next_tick_waits_for_previous_to_finish() {
        let config = WaterConfig {
            tick_interval_ms: 40,
            ..WaterConfig::default()
        };
        let mut world = World::new(config);
        world.add_block(BlockCoord::new(0, 0, 0), BlockType::Stone).unwrap();
        let mut engine = VoxelEngine::start(world).unwrap();
        wait_for(&engine, |e| e.tick_count() >= 1);

        // Hold the lock across several intervals; the blocked tick must not be
        // followed by a burst of catch-up ticks once it is released.
        let before = engine.read(|_| {
            thread::sleep(Duration::from_millis(200));
            engine.tick_count()
        });
        thread::sleep(Duration::from_millis(10));
        assert!(
            engine.tick_count() <= before + 1,
            "ticks ran back to back: {} -> {}",
            before,
            engine.tick_count()
        );
        engine.shutdown().unwrap();
    }
}
