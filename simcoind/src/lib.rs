//! simcoind - Proof-of-Work Mining Simulator Daemon
//!
//! This crate wires the mining engine and its stats store into a runnable
//! process: CLI parsing, TOML configuration, an HTTP control surface with an
//! embedded dashboard, and graceful shutdown handling.

pub mod cli;
pub mod config;
pub mod daemon;
pub mod http_server;
pub mod ui;

pub use cli::Args;
pub use config::Config;
pub use daemon::Daemon;
