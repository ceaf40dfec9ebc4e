//! The background search loop
//!
//! One worker thread runs search episodes until the run flag is cleared.
//! Each episode starts from a fresh random nonce and hashes sequentially
//! from there, re-reading the control cells every attempt so stop, pause
//! and difficulty changes take effect mid-search. All run-record writes
//! happen here, one whole record at a time.

use crate::engine::EngineShared;
use crate::policy;
use crate::pow;
use crate::state::MinerStatus;
use crate::store::{PersistedStats, StatsUpdate};
use rand::Rng;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{error, info, warn};

/// Entry point of the worker thread.
pub(crate) fn run(shared: Arc<EngineShared>) {
    loop {
        search_loop(&shared);

        shared.lock_state().transition(MinerStatus::Stopped);
        info!("mining stopped");
        shared.loop_active.store(false, Ordering::SeqCst);

        // A start() that arrived mid-drain saw loop_active still set and
        // spawned nothing; revive in place rather than leaving the engine
        // flagged running with no loop.
        if shared.running.load(Ordering::SeqCst)
            && shared
                .loop_active
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
        {
            continue;
        }
        break;
    }
}

/// Runs search episodes until the run flag is cleared.
fn search_loop(shared: &EngineShared) {
    let config = &shared.config;

    while shared.running.load(Ordering::SeqCst) {
        if shared.paused.load(Ordering::SeqCst) {
            if shared.lock_state().transition(MinerStatus::Paused) {
                info!("mining paused");
            }
            thread::sleep(config.pause_poll);
            continue;
        }

        {
            let mut state = shared.lock_state();
            if state.status == MinerStatus::Paused {
                info!("mining resumed");
            }
            state.transition(MinerStatus::Mining);
        }

        let mut nonce = rand::thread_rng().gen_range(0..=config.nonce_range);
        let started = Instant::now();

        while shared.running.load(Ordering::SeqCst) && !shared.paused.load(Ordering::SeqCst) {
            let digest = pow::hash_nonce(nonce);
            if pow::meets_difficulty(&digest, shared.difficulty.load(Ordering::SeqCst)) {
                settle_find(shared, nonce, digest, started.elapsed().as_secs_f64());
                thread::sleep(config.report_interval);
                break;
            }
            nonce = nonce.wrapping_add(1);
            if !config.attempt_delay.is_zero() {
                thread::sleep(config.attempt_delay);
            }
        }
    }
}

/// Books one successful find.
///
/// Reads the durable totals, folds in this find, persists them, applies the
/// halving and difficulty policies, and publishes the whole run record in a
/// single update. A find is never dropped: when the store cannot be read
/// the in-memory mirrors stand in, and when it cannot be written the new
/// totals still reach the run record.
fn settle_find(shared: &EngineShared, nonce: u64, digest: String, elapsed_secs: f64) {
    let time_taken = policy::round2(elapsed_secs);
    let reward_paid = shared.lock_state().reward;

    let current = match shared.store.load() {
        Ok(stats) => stats,
        Err(err) => {
            warn!("stats load failed, using in-memory mirrors: {err}");
            let state = shared.lock_state();
            PersistedStats {
                balance: state.balance,
                blocks_mined: state.blocks_mined,
                average_time: state.average_time,
            }
        }
    };

    let balance = current.balance + reward_paid;
    let blocks_mined = current.blocks_mined + 1;

    let average_time = {
        let mut total_time = shared.total_time.lock().unwrap_or_else(|e| e.into_inner());
        let average = policy::running_average(*total_time, time_taken, blocks_mined);
        *total_time += time_taken;
        average
    };

    persist_with_retry(
        shared,
        StatsUpdate::full(PersistedStats {
            balance,
            blocks_mined,
            average_time,
        }),
    );

    let reward = policy::halve_reward_if_due(reward_paid, blocks_mined);
    let _ = shared
        .difficulty
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |d| {
            Some(shared.config.policy.next_difficulty(d, time_taken))
        });

    info!(
        nonce,
        hash = %digest,
        time_taken,
        blocks_mined,
        difficulty = shared.difficulty.load(Ordering::SeqCst),
        "block mined"
    );

    let mut state = shared.lock_state();
    state.transition(MinerStatus::BlockMined);
    state.nonce = nonce;
    state.hash = digest;
    state.time_taken = time_taken;
    state.reward = reward;
    state.balance = balance;
    state.blocks_mined = blocks_mined;
    state.average_time = average_time;
}

/// Writes the new totals, retrying a bounded number of times. On final
/// failure the totals are kept in memory and the loop carries on.
fn persist_with_retry(shared: &EngineShared, update: StatsUpdate) {
    let mut attempts = 0;
    loop {
        match shared.store.save(update) {
            Ok(()) => return,
            Err(err) if attempts < shared.config.save_retries => {
                attempts += 1;
                warn!("stats save failed (attempt {attempts}): {err}");
            }
            Err(err) => {
                error!("stats save abandoned, keeping in-memory totals: {err}");
                return;
            }
        }
    }
}
