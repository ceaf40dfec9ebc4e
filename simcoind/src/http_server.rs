//! HTTP control surface and dashboard
//!
//! A thin axum layer over the engine: every control route is fire-and-forget
//! (the worker observes the signal at its next check point) and replies with
//! the engine's current view, so clients confirm effects by polling
//! `GET /status`.

use crate::config::HttpConfig;
use axum::{
    extract::State,
    http::Method,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use mining::engine::MiningEngine;
use mining::state::StatusSnapshot;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

static DASHBOARD_HTML: &str = include_str!("../assets/dashboard.html");

/// HTTP server that exposes the mining control routes and the dashboard
pub struct HttpServer {
    config: HttpConfig,
    engine: Arc<MiningEngine>,
    server_handle: Mutex<Option<JoinHandle<Result<(), String>>>>,
}

impl HttpServer {
    pub fn new(config: HttpConfig, engine: Arc<MiningEngine>) -> Self {
        Self {
            config,
            engine,
            server_handle: Mutex::new(None),
        }
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any);

        Router::new()
            .route("/", get(dashboard))
            .route("/status", get(get_status))
            .route("/start", post(start_mining))
            .route("/stop", post(stop_mining))
            .route("/pause", post(pause_mining))
            .route("/difficulty/increase", post(increase_difficulty))
            .route("/difficulty/decrease", post(decrease_difficulty))
            .with_state(self.engine.clone())
            .layer(cors)
    }

    /// Start the HTTP server in a background task
    pub async fn start(&self) -> Result<(), String> {
        let addr = format!("{}:{}", self.config.bind_address, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| format!("Failed to bind {}: {}", addr, e))?;

        info!("HTTP server listening on {}", addr);

        let app = self.router();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .map_err(|e| format!("HTTP server error: {}", e))
        });

        let mut guard = self.server_handle.lock().unwrap();
        *guard = Some(handle);

        Ok(())
    }

    /// Stop the HTTP server
    pub async fn stop(&self) -> Result<(), String> {
        let mut handle = self.server_handle.lock().unwrap();
        if let Some(h) = handle.take() {
            h.abort();
            info!("HTTP server stopped");
        }
        Ok(())
    }
}

async fn dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

async fn get_status(State(engine): State<Arc<MiningEngine>>) -> Json<StatusSnapshot> {
    Json(engine.status())
}

async fn start_mining(State(engine): State<Arc<MiningEngine>>) -> Json<Value> {
    let message = if engine.start() {
        "Mining started!"
    } else {
        "Mining already running!"
    };
    Json(json!({ "message": message }))
}

async fn stop_mining(State(engine): State<Arc<MiningEngine>>) -> Json<Value> {
    engine.stop();
    Json(json!({ "message": "Mining stopped!" }))
}

async fn pause_mining(State(engine): State<Arc<MiningEngine>>) -> Json<Value> {
    let message = match engine.toggle_pause() {
        Some(true) => "Mining paused!",
        Some(false) => "Mining resumed!",
        None => "Miner is not running!",
    };
    Json(json!({ "message": message }))
}

async fn increase_difficulty(State(engine): State<Arc<MiningEngine>>) -> Json<Value> {
    Json(json!({ "difficulty": engine.increase_difficulty() }))
}

async fn decrease_difficulty(State(engine): State<Arc<MiningEngine>>) -> Json<Value> {
    Json(json!({ "difficulty": engine.decrease_difficulty() }))
}
