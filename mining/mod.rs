//! Mining engine for the proof-of-work simulator
//!
//! This crate implements the simulator core: a background worker searching
//! for nonces whose SHA256 digest carries a configurable number of leading
//! zero characters, a fire-and-forget control surface, a self-tuning
//! difficulty policy with reward halving, and a persistence seam for the
//! cumulative statistics that survive restarts.
//!
//! ## Module Organization
//!
//! - [`pow`]: nonce hashing and the leading-zeros difficulty predicate
//! - [`state`]: status labels, the run record, and the status snapshot
//! - [`policy`]: difficulty adjustment, reward halving, rounding rules
//! - [`store`]: the `StatsStore` trait and the in-memory implementation
//! - [`engine`]: the engine handle and its control operations
//! - [`worker`]: the background search loop

pub mod engine;
pub mod policy;
pub mod pow;
pub mod state;
pub mod store;
mod worker;

#[cfg(test)]
pub mod tests;

// Re-export main types for easier access
pub use engine::{EngineConfig, MiningEngine};
pub use policy::{DifficultyPolicy, HALVING_INTERVAL, MIN_DIFFICULTY};
pub use state::{MinerStatus, RunState, StatusSnapshot};
pub use store::{MemoryStatsStore, PersistedStats, StatsStore, StatsUpdate, StoreError, StoreResult};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::engine::{EngineConfig, MiningEngine};
    pub use crate::policy::{DifficultyPolicy, HALVING_INTERVAL, MIN_DIFFICULTY};
    pub use crate::state::{MinerStatus, StatusSnapshot};
    pub use crate::store::{MemoryStatsStore, PersistedStats, StatsStore, StatsUpdate};
}
