use mining::engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    pub http: HttpConfig,
    pub mining: MiningConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    /// Keep stats in memory only; nothing survives the process.
    pub ephemeral: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub enabled: bool,
    pub bind_address: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiningConfig {
    /// Begin mining as soon as the daemon is up.
    pub auto_start: bool,
    pub initial_difficulty: u32,
    pub initial_reward: f64,
}

impl Config {
    /// Load configuration from file if it exists, otherwise use defaults
    pub fn load(path: &Path) -> Result<Self, String> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| format!("Failed to read config file: {}", e))?;

            let config: Config = toml::from_str(&content)
                .map_err(|e| format!("Failed to parse config: {}", e))?;

            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Override config with CLI arguments
    pub fn apply_cli_overrides(&mut self, args: &crate::cli::Args) {
        if let Some(data_dir) = &args.data_dir {
            self.storage.data_dir = data_dir.clone();
        }

        if let Some(port) = args.http_port {
            self.http.port = port;
        }

        if let Some(bind_address) = &args.bind_address {
            self.http.bind_address = bind_address.clone();
        }

        if let Some(difficulty) = args.difficulty {
            self.mining.initial_difficulty = difficulty;
        }

        if args.no_http {
            self.http.enabled = false;
        }

        if args.ephemeral {
            self.storage.ephemeral = true;
        }

        if args.no_auto_start {
            self.mining.auto_start = false;
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            ephemeral: false,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_address: "127.0.0.1".to_string(),
            port: 8177,
        }
    }
}

impl Default for MiningConfig {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Self {
            auto_start: true,
            initial_difficulty: engine.initial_difficulty,
            initial_reward: engine.initial_reward,
        }
    }
}

impl MiningConfig {
    /// Builds the engine tunables from this section, leaving the loop pacing
    /// constants at their defaults.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            initial_difficulty: self.initial_difficulty,
            initial_reward: self.initial_reward,
            ..Default::default()
        }
    }
}
