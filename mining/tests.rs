//! Comprehensive tests for the mining engine
//!
//! End-to-end tests driving a real worker thread against an in-memory
//! stats store: search and settlement, control signals, policy effects,
//! persistence failure recovery, and restart behavior.

#[cfg(test)]
mod tests {
    use crate::engine::{EngineConfig, MiningEngine};
    use crate::policy::DifficultyPolicy;
    use crate::pow;
    use crate::state::MinerStatus;
    use crate::store::{
        MemoryStatsStore, PersistedStats, StatsStore, StatsUpdate, StoreError, StoreResult,
    };
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    /// Config tuned for tests: difficulty 1 finds in microseconds, short
    /// sleeps, and a policy whose thresholds can never fire so difficulty
    /// stays put across many finds.
    fn fast_config() -> EngineConfig {
        EngineConfig {
            initial_difficulty: 1,
            attempt_delay: Duration::ZERO,
            pause_poll: Duration::from_millis(5),
            report_interval: Duration::from_millis(5),
            policy: DifficultyPolicy {
                raise_below_secs: 0.0,
                lower_above_secs: f64::INFINITY,
            },
            ..Default::default()
        }
    }

    fn wait_for(condition: impl Fn() -> bool, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(2));
        }
        condition()
    }

    /// Store whose failures can be switched on and off mid-run.
    struct FlakyStore {
        inner: MemoryStatsStore,
        failing: AtomicBool,
    }

    impl FlakyStore {
        fn new(failing: bool) -> Self {
            Self {
                inner: MemoryStatsStore::new(),
                failing: AtomicBool::new(failing),
            }
        }

        fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }
    }

    impl StatsStore for FlakyStore {
        fn load(&self) -> StoreResult<PersistedStats> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("injected failure".into()));
            }
            self.inner.load()
        }

        fn save(&self, update: StatsUpdate) -> StoreResult<()> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("injected failure".into()));
            }
            self.inner.save(update)
        }
    }

    // ==================== Search and Settlement Tests ====================

    #[test]
    fn test_engine_mines_blocks_and_books_rewards() {
        let store = Arc::new(MemoryStatsStore::new());
        let engine = MiningEngine::new(fast_config(), store.clone());
        assert!(engine.start());

        assert!(wait_for(
            || engine.status().blocks_mined >= 3,
            Duration::from_secs(10)
        ));

        let snap = engine.status();
        assert!(snap.blocks_mined >= 3);
        assert!(pow::meets_difficulty(&snap.hash, 1));
        assert_eq!(snap.hash, pow::hash_nonce(snap.nonce));
        assert!(snap.balance > 0.0);

        // Every value in one snapshot comes from the same settlement.
        if snap.blocks_mined < 10 {
            assert_eq!(snap.balance, 6.25 * snap.blocks_mined as f64);
            assert_eq!(snap.reward, 6.25);
        }

        engine.shutdown();

        // The durable record matches the final snapshot.
        let persisted = store.load().unwrap();
        let last = engine.status();
        assert_eq!(persisted.blocks_mined, last.blocks_mined);
        assert_eq!(persisted.balance, last.balance);
        assert_eq!(persisted.average_time, last.average_time);
    }

    #[test]
    fn test_first_find_books_exact_stats() {
        let config = EngineConfig {
            report_interval: Duration::from_millis(300),
            ..fast_config()
        };
        let engine = MiningEngine::new(config, Arc::new(MemoryStatsStore::new()));
        engine.start();

        assert!(wait_for(
            || engine.status().blocks_mined == 1,
            Duration::from_secs(10)
        ));

        let snap = engine.status();
        assert_eq!(snap.status, MinerStatus::BlockMined);
        assert_eq!(snap.balance, 6.25);
        assert_eq!(snap.blocks_mined, 1);
        // With no prior history the mean is exactly this find's duration.
        assert_eq!(snap.average_time, snap.time_taken);

        engine.shutdown();
    }

    #[test]
    fn test_reward_halves_after_ten_blocks() {
        let engine = MiningEngine::new(fast_config(), Arc::new(MemoryStatsStore::new()));
        engine.start();

        assert!(wait_for(
            || engine.status().blocks_mined >= 10,
            Duration::from_secs(20)
        ));

        let snap = engine.status();
        assert!(snap.blocks_mined >= 10 && snap.blocks_mined < 20);
        assert_eq!(snap.reward, 3.125);
        let expected = 6.25 * 10.0 + 3.125 * (snap.blocks_mined - 10) as f64;
        assert_eq!(snap.balance, expected);

        engine.shutdown();
    }

    #[test]
    fn test_average_time_continues_from_persisted_history() {
        let store = Arc::new(MemoryStatsStore::new());
        store
            .save(StatsUpdate::full(PersistedStats {
                balance: 10.0,
                blocks_mined: 4,
                average_time: 2.0,
            }))
            .unwrap();

        let config = EngineConfig {
            report_interval: Duration::from_millis(300),
            ..fast_config()
        };
        let engine = MiningEngine::new(config, store);
        engine.start();

        assert!(wait_for(
            || engine.status().blocks_mined == 5,
            Duration::from_secs(10)
        ));

        let snap = engine.status();
        assert_eq!(snap.balance, 16.25);
        assert_eq!(snap.blocks_mined, 5);
        // Time sum restarts from average * count = 8.0, not from the bare
        // average; the fifth find folds into that total.
        let expected = ((8.0 + snap.time_taken) / 5.0 * 100.0).round() / 100.0;
        assert_eq!(snap.average_time, expected);

        engine.shutdown();
    }

    // ==================== Control Surface Tests ====================

    #[test]
    fn test_stop_settles_within_a_report_interval() {
        let engine = MiningEngine::new(fast_config(), Arc::new(MemoryStatsStore::new()));
        engine.start();
        assert!(wait_for(
            || engine.status().blocks_mined >= 1,
            Duration::from_secs(10)
        ));

        engine.stop();
        assert!(wait_for(
            || engine.status().status == MinerStatus::Stopped,
            Duration::from_secs(5)
        ));

        let before = engine.status();
        thread::sleep(Duration::from_millis(50));
        let after = engine.status();
        assert_eq!(after.status, MinerStatus::Stopped);
        assert_eq!(after.status.to_string(), "Mining stopped.");
        assert_eq!(before.nonce, after.nonce);
        assert_eq!(before.hash, after.hash);
        assert_eq!(before.blocks_mined, after.blocks_mined);

        engine.shutdown();
    }

    #[test]
    fn test_pause_freezes_the_snapshot_until_resume() {
        let engine = MiningEngine::new(fast_config(), Arc::new(MemoryStatsStore::new()));
        engine.start();
        assert!(wait_for(
            || engine.status().blocks_mined >= 1,
            Duration::from_secs(10)
        ));

        assert_eq!(engine.toggle_pause(), Some(true));
        assert!(wait_for(
            || engine.status().status == MinerStatus::Paused,
            Duration::from_secs(5)
        ));

        let frozen = engine.status();
        thread::sleep(Duration::from_millis(40));
        let still = engine.status();
        assert_eq!(still.status, MinerStatus::Paused);
        assert_eq!(frozen.nonce, still.nonce);
        assert_eq!(frozen.hash, still.hash);
        assert_eq!(frozen.difficulty, still.difficulty);
        assert_eq!(frozen.blocks_mined, still.blocks_mined);

        assert_eq!(engine.toggle_pause(), Some(false));
        assert!(wait_for(
            || engine.status().blocks_mined > frozen.blocks_mined,
            Duration::from_secs(10)
        ));

        engine.shutdown();
    }

    #[test]
    fn test_restart_after_stop_mines_again() {
        let engine = MiningEngine::new(fast_config(), Arc::new(MemoryStatsStore::new()));
        engine.start();
        assert!(wait_for(
            || engine.status().blocks_mined >= 1,
            Duration::from_secs(10)
        ));

        engine.stop();
        assert!(wait_for(
            || engine.status().status == MinerStatus::Stopped,
            Duration::from_secs(5)
        ));
        let stopped_at = engine.status().blocks_mined;

        assert!(engine.start());
        assert!(wait_for(
            || engine.status().blocks_mined > stopped_at,
            Duration::from_secs(10)
        ));

        engine.shutdown();
        assert_eq!(engine.status().status, MinerStatus::Stopped);
    }

    #[test]
    fn test_difficulty_changes_apply_while_mining() {
        let engine = MiningEngine::new(fast_config(), Arc::new(MemoryStatsStore::new()));
        engine.start();
        assert!(wait_for(
            || engine.status().blocks_mined >= 1,
            Duration::from_secs(10)
        ));

        // Push the difficulty out of reach; the running search observes the
        // cell on its next attempt and block production halts.
        for _ in 0..63 {
            engine.increase_difficulty();
        }
        assert_eq!(engine.status().difficulty, 64);
        thread::sleep(Duration::from_millis(30));
        let high = engine.status().blocks_mined;
        thread::sleep(Duration::from_millis(60));
        assert_eq!(engine.status().blocks_mined, high);

        // Bring it back down; production resumes.
        for _ in 0..63 {
            engine.decrease_difficulty();
        }
        assert_eq!(engine.status().difficulty, 1);
        assert!(wait_for(
            || engine.status().blocks_mined > high,
            Duration::from_secs(10)
        ));

        engine.shutdown();
    }

    // ==================== Persistence Failure Tests ====================

    #[test]
    fn test_store_failures_never_drop_a_find() {
        let store = Arc::new(FlakyStore::new(true));
        let mut config = fast_config();
        config.save_retries = 1;
        let engine = MiningEngine::new(config, store.clone());
        engine.start();

        // Finds keep accumulating in memory while every write fails.
        assert!(wait_for(
            || engine.status().blocks_mined >= 2,
            Duration::from_secs(10)
        ));
        assert_eq!(store.inner.load().unwrap(), PersistedStats::default());
        let snap = engine.status();
        assert_eq!(snap.balance, 6.25 * snap.blocks_mined as f64);

        // Once the store heals, the next settlement writes through.
        store.set_failing(false);
        let healed_at = snap.blocks_mined;
        assert!(wait_for(
            || store.inner.load().unwrap().blocks_mined > healed_at,
            Duration::from_secs(10)
        ));

        engine.shutdown();
    }

    // ==================== Concurrency Tests ====================

    #[test]
    fn test_concurrent_control_callers() {
        let engine = Arc::new(MiningEngine::new(
            fast_config(),
            Arc::new(MemoryStatsStore::new()),
        ));
        engine.start();

        let mut handles = vec![];
        for i in 0..4 {
            let engine = Arc::clone(&engine);
            handles.push(thread::spawn(move || {
                for _ in 0..50 {
                    match i {
                        0 => {
                            engine.increase_difficulty();
                        }
                        1 => {
                            engine.decrease_difficulty();
                        }
                        2 => {
                            let _ = engine.status();
                        }
                        _ => {
                            engine.start();
                        }
                    }
                    thread::sleep(Duration::from_micros(200));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let snap = engine.status();
        assert!(snap.difficulty >= 1);
        assert!(engine.is_running());

        engine.shutdown();
        assert_eq!(engine.status().status, MinerStatus::Stopped);
    }
}
