//! User interface utilities for better console output

use mining::state::StatusSnapshot;
use std::fmt;
use std::time::Duration;

/// ANSI color codes for terminal output
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";

    pub const BRIGHT_RED: &str = "\x1b[91m";
    pub const BRIGHT_GREEN: &str = "\x1b[92m";
    pub const BRIGHT_YELLOW: &str = "\x1b[93m";
    pub const BRIGHT_CYAN: &str = "\x1b[96m";
    pub const BRIGHT_WHITE: &str = "\x1b[97m";
}

/// Print startup banner
pub fn print_banner(version: &str) {
    println!();
    println!("{}╔══════════════════════════════════════════════════════════════╗{}", colors::BRIGHT_CYAN, colors::RESET);
    println!("{}║{}                                                              {}║{}", colors::BRIGHT_CYAN, colors::RESET, colors::BRIGHT_CYAN, colors::RESET);
    println!("{}║{}           {}SIMCOIN MINING SIMULATOR - SIMCOIND v{}{}           {}║{}",
        colors::BRIGHT_CYAN, colors::RESET, colors::BOLD, version, colors::RESET, colors::BRIGHT_CYAN, colors::RESET);
    println!("{}║{}                                                              {}║{}", colors::BRIGHT_CYAN, colors::RESET, colors::BRIGHT_CYAN, colors::RESET);
    println!("{}╚══════════════════════════════════════════════════════════════╝{}", colors::BRIGHT_CYAN, colors::RESET);
    println!();
}

/// Print status line with icon and color
pub fn print_status(icon: &str, message: &str, status: StatusType) {
    println!("{}", format_status(icon, message, status));
}

fn format_status(icon: &str, message: &str, status: StatusType) -> String {
    let color = match status {
        StatusType::Success => colors::BRIGHT_GREEN,
        StatusType::Info => colors::BRIGHT_CYAN,
        StatusType::Warning => colors::BRIGHT_YELLOW,
        StatusType::Error => colors::BRIGHT_RED,
    };

    format!(
        "{}[{}]{} {}{}{}",
        color,
        icon,
        colors::RESET,
        color,
        message,
        colors::RESET
    )
}

/// Status types for colored output
#[derive(Debug, Clone, Copy)]
pub enum StatusType {
    Success,
    Info,
    Warning,
    Error,
}

/// Print a section header
pub fn print_section(title: &str) {
    println!();
    println!("{}━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━{}", colors::DIM, colors::RESET);
    println!("{}  {}{}", colors::BRIGHT_CYAN, colors::BOLD, title);
    println!("{}━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━{}", colors::DIM, colors::RESET);
    println!();
}

/// Print key-value pair in a formatted way
pub fn print_kv(key: &str, value: &str) {
    println!("  {}{}:{}{} {}{}{}",
        colors::BRIGHT_WHITE, key, colors::RESET, colors::DIM,
        colors::BRIGHT_CYAN, value, colors::RESET);
}

/// Print configuration summary
pub fn print_config_summary(config: &crate::config::Config) {
    print_section("Configuration");

    if config.storage.ephemeral {
        print_kv("Stats Store", "In-memory (ephemeral)");
    } else {
        print_kv("Data Directory", config.storage.data_dir.to_str().unwrap_or("N/A"));
    }
    let http_status = if config.http.enabled {
        format!("{}:{}", config.http.bind_address, config.http.port)
    } else {
        "Disabled".to_string()
    };
    print_kv("HTTP Server", &http_status);
    print_kv("Initial Difficulty", &config.mining.initial_difficulty.to_string());
    print_kv("Initial Reward", &format!("{} SIM", config.mining.initial_reward));
    print_kv("Auto-start Mining", if config.mining.auto_start {
        "Enabled"
    } else {
        "Disabled"
    });
}

/// Print component status
pub fn print_component_status(component: &str, status: ComponentStatus) {
    let (icon, color, text) = match status {
        ComponentStatus::Starting => ("⏳", colors::BRIGHT_YELLOW, "Starting"),
        ComponentStatus::Running => ("✓", colors::BRIGHT_GREEN, "Running"),
        ComponentStatus::Stopped => ("✗", colors::BRIGHT_RED, "Stopped"),
    };

    println!("  {}[{}]{} {:<20} {}", color, icon, colors::RESET, component, text);
}

#[derive(Debug, Clone, Copy)]
pub enum ComponentStatus {
    Starting,
    Running,
    Stopped,
}

/// Format duration as human-readable string
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        let hours = secs / 3600;
        let minutes = (secs % 3600) / 60;
        let seconds = secs % 60;
        format!("{}h {}m {}s", hours, minutes, seconds)
    }
}

/// Miner status summary printed periodically by the daemon
pub struct MinerSummary {
    pub uptime: Duration,
    pub snapshot: StatusSnapshot,
}

impl fmt::Display for MinerSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━{}", colors::DIM, colors::RESET)?;
        writeln!(f, "{}  Miner Status Summary{}", colors::BRIGHT_CYAN, colors::RESET)?;
        writeln!(f, "{}━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━{}", colors::DIM, colors::RESET)?;
        writeln!(f)?;
        writeln!(f, "  {}Uptime:{}           {}", colors::BRIGHT_WHITE, colors::RESET, format_duration(self.uptime))?;
        writeln!(f, "  {}Status:{}           {}", colors::BRIGHT_WHITE, colors::RESET, self.snapshot.status)?;
        writeln!(f, "  {}Blocks Mined:{}     {}", colors::BRIGHT_WHITE, colors::RESET, self.snapshot.blocks_mined)?;
        writeln!(f, "  {}Balance:{}          {:.8} SIM", colors::BRIGHT_WHITE, colors::RESET, self.snapshot.balance)?;
        writeln!(f, "  {}Difficulty:{}       {}", colors::BRIGHT_WHITE, colors::RESET, self.snapshot.difficulty)?;
        writeln!(f, "  {}Average Time:{}     {:.2}s", colors::BRIGHT_WHITE, colors::RESET, self.snapshot.average_time)?;
        writeln!(f)
    }
}
