use crate::config::Config;
use crate::http_server::HttpServer;
use crate::ui;
use database::MiningStatsStore;
use mining::engine::MiningEngine;
use mining::store::{MemoryStatsStore, StatsStore};
use std::sync::Arc;
use std::time::Instant;
use tokio::signal;
use tokio::sync::broadcast;
use tokio::time::{interval, Duration};
use tracing::info;

pub struct Daemon {
    config: Config,
    engine: Arc<MiningEngine>,
    http_server: Option<Arc<HttpServer>>,
    shutdown_tx: broadcast::Sender<()>,
}

impl Daemon {
    /// Create new daemon instance
    pub async fn new(config: Config) -> Result<Self, String> {
        ui::print_section("Initializing Components");

        // Create shutdown channel
        let (shutdown_tx, _) = broadcast::channel(1);

        // Initialize the stats store
        ui::print_component_status("Stats Store", ui::ComponentStatus::Starting);
        let store: Arc<dyn StatsStore> = if config.storage.ephemeral {
            info!("Using in-memory stats store; nothing will be persisted");
            Arc::new(MemoryStatsStore::new())
        } else {
            info!("Opening stats store at {:?}", config.storage.data_dir);
            Arc::new(
                MiningStatsStore::open(&config.storage.data_dir)
                    .map_err(|e| format!("Failed to open stats store: {}", e))?,
            )
        };
        ui::print_component_status("Stats Store", ui::ComponentStatus::Running);

        // Initialize the mining engine
        ui::print_component_status("Mining Engine", ui::ComponentStatus::Starting);
        info!("Initializing mining engine");
        let engine = Arc::new(MiningEngine::new(config.mining.engine_config(), store));
        ui::print_component_status("Mining Engine", ui::ComponentStatus::Running);

        // Initialize HTTP server (optional)
        let http_server = if config.http.enabled {
            Some(Arc::new(HttpServer::new(
                config.http.clone(),
                engine.clone(),
            )))
        } else {
            None
        };

        ui::print_status("✓", "All components initialized successfully", ui::StatusType::Success);
        Ok(Self {
            config,
            engine,
            http_server,
            shutdown_tx,
        })
    }

    /// Handle to the engine, for tests and embedding
    pub fn engine(&self) -> Arc<MiningEngine> {
        self.engine.clone()
    }

    /// Sender that makes `run()` shut down as if Ctrl+C had arrived
    pub fn shutdown_sender(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Run the daemon
    pub async fn run(self) -> Result<(), String> {
        ui::print_section("Starting Services");
        info!("Starting simcoind daemon");

        let shutdown_rx = self.shutdown_tx.subscribe();
        let start_time = Instant::now();

        // Start HTTP server
        if let Some(http) = &self.http_server {
            ui::print_component_status("HTTP Server", ui::ComponentStatus::Starting);
            http.start().await?;
            ui::print_component_status("HTTP Server", ui::ComponentStatus::Running);
        } else {
            ui::print_status("ℹ", "HTTP server disabled", ui::StatusType::Info);
        }

        // Start mining
        if self.config.mining.auto_start {
            ui::print_component_status("Mining", ui::ComponentStatus::Starting);
            info!("Starting mining");
            self.engine.start();
            ui::print_component_status("Mining", ui::ComponentStatus::Running);
        } else {
            ui::print_status("ℹ", "Mining not auto-started; POST /start to begin", ui::StatusType::Info);
        }

        ui::print_status("✓", "simcoind is now running", ui::StatusType::Success);
        ui::print_status("ℹ", "Press Ctrl+C to stop the daemon", ui::StatusType::Info);
        println!();

        // Start status update task
        let status_handle = {
            let engine = self.engine.clone();
            tokio::spawn(async move {
                let mut interval = interval(Duration::from_secs(30));
                // The first tick fires immediately; skip it so the summary
                // starts after one full interval.
                interval.tick().await;
                loop {
                    interval.tick().await;
                    let summary = ui::MinerSummary {
                        uptime: start_time.elapsed(),
                        snapshot: engine.status(),
                    };
                    print!("{}", summary);
                }
            })
        };

        // Wait for shutdown signal
        self.wait_for_shutdown(shutdown_rx).await;

        // Cancel status updates
        status_handle.abort();

        // Stop components
        if let Some(http) = &self.http_server {
            http.stop().await?;
        }
        info!("Stopping mining engine");
        // shutdown() joins the worker thread; keep that off the runtime.
        let engine = self.engine.clone();
        tokio::task::spawn_blocking(move || engine.shutdown())
            .await
            .map_err(|e| format!("Engine shutdown task failed: {}", e))?;
        info!("All components stopped");

        Ok(())
    }

    async fn wait_for_shutdown(&self, mut shutdown_rx: broadcast::Receiver<()>) {
        tokio::select! {
            _ = signal::ctrl_c() => {
                ui::print_status("ℹ", "Received Ctrl+C, shutting down gracefully...", ui::StatusType::Warning);
                info!("Received Ctrl+C, shutting down");
            }
            _ = shutdown_rx.recv() => {
                ui::print_status("ℹ", "Received shutdown signal", ui::StatusType::Info);
                info!("Received shutdown signal");
            }
        }

        // Broadcast shutdown to all components
        let _ = self.shutdown_tx.send(());
    }
}
