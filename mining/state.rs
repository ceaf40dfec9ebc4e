//! Engine status labels and the worker-owned run record
//!
//! Status labels form a proper enum with an explicit transition set rather
//! than free-form strings, and the whole run record is published as one unit
//! so readers never observe a torn mix of old and new fields.

use serde::{Serialize, Serializer};
use std::fmt;

/// Lifecycle label of the mining engine.
///
/// `BlockMined` is transient: the worker holds it for one reporting interval
/// after a successful find, then returns to `Mining` (or exits to `Stopped`
/// or idles in `Paused` if a control signal arrived in the meantime).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MinerStatus {
    Idle,
    Mining,
    Paused,
    Stopped,
    BlockMined,
}

impl MinerStatus {
    /// Display label, kept byte-for-byte compatible with the status strings
    /// the simulator has always reported.
    pub fn label(&self) -> &'static str {
        match self {
            MinerStatus::Idle => "Idle",
            MinerStatus::Mining => "Mining started...",
            MinerStatus::Paused => "Mining paused.",
            MinerStatus::Stopped => "Mining stopped.",
            MinerStatus::BlockMined => "Block Mined!",
        }
    }

    /// Whether moving from `self` to `next` is a defined transition.
    ///
    /// Anything not listed here is ignored by [`RunState::transition`]
    /// rather than treated as an error; control signals are fire-and-forget
    /// and may arrive in states where they have no effect.
    pub fn can_become(&self, next: MinerStatus) -> bool {
        use MinerStatus::*;
        matches!(
            (*self, next),
            (Idle, Mining)
                | (Stopped, Mining)
                | (Mining, Paused)
                | (Paused, Mining)
                | (Mining, Stopped)
                | (Paused, Stopped)
                | (Mining, BlockMined)
                | (BlockMined, Mining)
                | (BlockMined, Paused)
                | (BlockMined, Stopped)
        )
    }
}

impl fmt::Display for MinerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for MinerStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

/// The worker-owned run record.
///
/// Written only by the background worker (plus the one `Idle/Stopped ->
/// Mining` transition performed by `start()` before the worker exists) and
/// handed out to readers as a whole-record clone. The live difficulty is a
/// separate control cell and is merged in at snapshot time.
#[derive(Clone, Debug)]
pub struct RunState {
    pub status: MinerStatus,
    /// Last nonce tried or found.
    pub nonce: u64,
    /// Hex digest of the last attempt.
    pub hash: String,
    /// Current per-block payout.
    pub reward: f64,
    /// Duration of the last successful search, seconds.
    pub time_taken: f64,
    /// Mirror of the persisted balance, for display.
    pub balance: f64,
    /// Mirror of the persisted block count, for display.
    pub blocks_mined: u64,
    /// Mirror of the persisted mean search time, for display.
    pub average_time: f64,
}

impl RunState {
    pub fn new(initial_reward: f64) -> Self {
        Self {
            status: MinerStatus::Idle,
            nonce: 0,
            hash: String::new(),
            reward: initial_reward,
            time_taken: 0.0,
            balance: 0.0,
            blocks_mined: 0,
            average_time: 0.0,
        }
    }

    /// Applies a status transition if it is defined, ignoring it otherwise.
    ///
    /// Returns true when the transition was applied.
    pub fn transition(&mut self, next: MinerStatus) -> bool {
        if self.status.can_become(next) {
            self.status = next;
            true
        } else {
            false
        }
    }
}

/// Immutable view of the engine returned by `status()`.
///
/// A flat record: every field is cloned out of the same `RunState` update,
/// with the live difficulty cell merged in.
#[derive(Clone, Debug, Serialize)]
pub struct StatusSnapshot {
    pub status: MinerStatus,
    pub difficulty: u32,
    pub nonce: u64,
    pub hash: String,
    pub reward: f64,
    pub time_taken: f64,
    pub balance: f64,
    pub blocks_mined: u64,
    pub average_time: f64,
}

impl StatusSnapshot {
    /// Builds a snapshot from one run-record clone and the difficulty cell.
    pub fn from_state(state: &RunState, difficulty: u32) -> Self {
        Self {
            status: state.status,
            difficulty,
            nonce: state.nonce,
            hash: state.hash.clone(),
            reward: state.reward,
            time_taken: state.time_taken,
            balance: state.balance,
            blocks_mined: state.blocks_mined,
            average_time: state.average_time,
        }
    }
}
