use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "simcoind")]
#[command(about = "Proof-of-work mining simulator daemon", long_about = None)]
pub struct Args {
    /// Path to configuration file (optional, uses defaults if not provided)
    #[arg(short, long)]
    pub config_path: Option<PathBuf>,

    /// Data directory for the stats store
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// HTTP server port
    #[arg(long)]
    pub http_port: Option<u16>,

    /// HTTP bind address
    #[arg(long)]
    pub bind_address: Option<String>,

    /// Initial difficulty (leading zero characters)
    #[arg(long)]
    pub difficulty: Option<u32>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Disable the HTTP server
    #[arg(long)]
    pub no_http: bool,

    /// Keep stats in memory only, persisting nothing
    #[arg(long)]
    pub ephemeral: bool,

    /// Do not start mining at launch; wait for POST /start
    #[arg(long)]
    pub no_auto_start: bool,
}

pub fn parse_args() -> Args {
    Args::parse()
}
