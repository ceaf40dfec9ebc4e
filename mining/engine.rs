//! The mining engine and its control surface
//!
//! One engine owns one background search worker. Control operations are
//! fire-and-forget signals (atomic cells the worker reads at its next check
//! point); the worker is the only writer of the run record, so `status()`
//! readers always see a consistent whole-record snapshot. The engine also
//! owns the persistence handle and seeds its in-memory mirrors from it at
//! construction.

use crate::policy::{DifficultyPolicy, MIN_DIFFICULTY};
use crate::state::{MinerStatus, RunState, StatusSnapshot};
use crate::store::{PersistedStats, StatsStore};
use crate::worker;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Tunables for the engine and its search loop.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Leading zero characters required at startup.
    pub initial_difficulty: u32,
    /// Per-block payout at startup.
    pub initial_reward: f64,
    /// Upper bound (inclusive) of the random starting nonce.
    pub nonce_range: u64,
    /// Throughput cap applied after each unsuccessful attempt.
    pub attempt_delay: Duration,
    /// How often a paused worker re-checks its control flags.
    pub pause_poll: Duration,
    /// How long a find stays reported before the next search begins.
    pub report_interval: Duration,
    /// Thresholds for the per-find difficulty adjustment.
    pub policy: DifficultyPolicy,
    /// Additional attempts when a stats write fails.
    pub save_retries: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_difficulty: 5,
            initial_reward: 6.25,
            nonce_range: 1_000_000_000,
            attempt_delay: Duration::from_millis(1),
            pause_poll: Duration::from_secs(1),
            report_interval: Duration::from_secs(2),
            policy: DifficultyPolicy::default(),
            save_retries: 3,
        }
    }
}

/// State shared between the engine handle and the worker thread.
pub(crate) struct EngineShared {
    /// Run flag; cleared by `stop()`, observed at worker check points.
    pub(crate) running: AtomicBool,
    /// Pause flag; flipped by `toggle_pause()`.
    pub(crate) paused: AtomicBool,
    /// Live difficulty cell, read per attempt and adjusted per find.
    pub(crate) difficulty: AtomicU32,
    /// True while a worker owns the search loop. Guards double spawns.
    pub(crate) loop_active: AtomicBool,
    /// The run record. Worker-written; see `MiningEngine::start` for the one
    /// exception.
    pub(crate) state: Mutex<RunState>,
    /// Sum of every search duration ever booked, seconds. Seeded from the
    /// persisted mean at construction; worker-only after that.
    pub(crate) total_time: Mutex<f64>,
    pub(crate) store: Arc<dyn StatsStore>,
    pub(crate) config: EngineConfig,
}

impl EngineShared {
    pub(crate) fn lock_state(&self) -> MutexGuard<'_, RunState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Handle to the mining engine.
///
/// All methods take `&self`; the handle is shared freely behind an `Arc`
/// between control callers and status readers.
pub struct MiningEngine {
    shared: Arc<EngineShared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl MiningEngine {
    /// Creates an engine over a stats store.
    ///
    /// The persisted totals are mirrored into the run record so status reads
    /// show them before the first find, and the running time sum is seeded
    /// as `average_time * blocks_mined`. A store that cannot be read yet
    /// yields zero mirrors rather than a construction failure.
    pub fn new(config: EngineConfig, store: Arc<dyn StatsStore>) -> Self {
        let persisted = match store.load() {
            Ok(stats) => stats,
            Err(err) => {
                warn!("stats store unreadable at startup, starting from zeros: {err}");
                PersistedStats::default()
            }
        };

        let mut state = RunState::new(config.initial_reward);
        state.balance = persisted.balance;
        state.blocks_mined = persisted.blocks_mined;
        state.average_time = persisted.average_time;
        let total_time = persisted.average_time * persisted.blocks_mined as f64;

        let shared = Arc::new(EngineShared {
            running: AtomicBool::new(false),
            paused: AtomicBool::new(false),
            difficulty: AtomicU32::new(config.initial_difficulty.max(MIN_DIFFICULTY)),
            loop_active: AtomicBool::new(false),
            state: Mutex::new(state),
            total_time: Mutex::new(total_time),
            store,
            config,
        });

        Self {
            shared,
            worker: Mutex::new(None),
        }
    }

    /// Starts the search loop.
    ///
    /// Returns false (and does nothing) when the engine is already running.
    /// A worker still draining from an earlier `stop()` is either revived in
    /// place or replaced; a second loop is never spawned.
    pub fn start(&self) -> bool {
        if self.shared.running.swap(true, Ordering::SeqCst) {
            debug!("start ignored, engine already running");
            return false;
        }

        // The one label write the worker does not own. A worker still
        // draining republishes its own label; the transition rules keep
        // either order consistent.
        self.shared.lock_state().transition(MinerStatus::Mining);

        if self
            .shared
            .loop_active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            let shared = Arc::clone(&self.shared);
            let handle = thread::spawn(move || worker::run(shared));
            let mut slot = self.worker.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(old) = slot.replace(handle) {
                // Predecessor already released the loop, so this is brief.
                let _ = old.join();
            }
            info!(
                difficulty = self.shared.difficulty.load(Ordering::SeqCst),
                "mining started"
            );
        }
        true
    }

    /// Clears the run flag. The worker observes it at its next check point;
    /// callers poll `status()` to confirm the loop has exited.
    pub fn stop(&self) {
        self.shared.running.store(false, Ordering::SeqCst);
        debug!("stop requested");
    }

    /// Flips the pause flag.
    ///
    /// Returns the new paused value, or `None` when the engine is not
    /// running and the toggle is ignored.
    pub fn toggle_pause(&self) -> Option<bool> {
        if !self.shared.running.load(Ordering::SeqCst) {
            debug!("pause toggle ignored, engine not running");
            return None;
        }
        let now_paused = !self.shared.paused.fetch_xor(true, Ordering::SeqCst);
        Some(now_paused)
    }

    /// Raises the difficulty by one. Takes effect on the next attempt.
    pub fn increase_difficulty(&self) -> u32 {
        let new = self.shared.difficulty.fetch_add(1, Ordering::SeqCst) + 1;
        info!(difficulty = new, "difficulty increased");
        new
    }

    /// Lowers the difficulty by one, floored at [`MIN_DIFFICULTY`]. A call
    /// at the floor is a no-op, not an error.
    pub fn decrease_difficulty(&self) -> u32 {
        let result = self
            .shared
            .difficulty
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |d| {
                (d > MIN_DIFFICULTY).then(|| d - 1)
            });
        match result {
            Ok(prev) => {
                info!(difficulty = prev - 1, "difficulty decreased");
                prev - 1
            }
            Err(at_floor) => at_floor,
        }
    }

    /// Returns a consistent snapshot of the run record with the live
    /// difficulty merged in.
    pub fn status(&self) -> StatusSnapshot {
        let state = self.shared.lock_state();
        StatusSnapshot::from_state(&state, self.shared.difficulty.load(Ordering::SeqCst))
    }

    /// Whether the run flag is set. The loop may lag this by one check point.
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// Stops the engine and waits for the worker to exit.
    pub fn shutdown(&self) {
        self.stop();
        let handle = self
            .worker
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(handle) = handle {
            let _ = handle.join();
        }
        let snapshot = self.status();
        info!(
            blocks_mined = snapshot.blocks_mined,
            balance = snapshot.balance,
            "mining engine shut down"
        );
    }
}

impl Drop for MiningEngine {
    fn drop(&mut self) {
        if self.shared.running.load(Ordering::SeqCst) {
            self.shutdown();
        }
    }
}
