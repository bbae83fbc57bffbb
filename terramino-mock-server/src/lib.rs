use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use terramino_common::NEW_GAME_PATH;
use tracing::info;

/// How the mock answers `GET /api/new-game`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    /// 200 with `{"game_id": <n>}`, `n` incrementing per request.
    Ok,
    /// Empty response with the given status code.
    Status(u16),
    /// 200 with a plain-text body.
    NotJson,
    /// 200 with a JSON object lacking every identifier key.
    MissingId,
}

impl MockBehavior {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ok" => Some(MockBehavior::Ok),
            "not-json" => Some(MockBehavior::NotJson),
            "missing-id" => Some(MockBehavior::MissingId),
            other => other
                .strip_prefix("status-")
                .and_then(|code| code.parse::<u16>().ok())
                .filter(|code| StatusCode::from_u16(*code).is_ok())
                .map(MockBehavior::Status),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub behavior: MockBehavior,
    pub delay: Option<Duration>,
    served: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(behavior: MockBehavior, delay: Option<Duration>) -> Self {
        Self { behavior, delay, served: Arc::new(AtomicU64::new(0)) }
    }

    /// Number of new-game requests answered so far.
    pub fn requests_served(&self) -> u64 {
        self.served.load(Ordering::Relaxed)
    }
}

/// Mock server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub address: SocketAddr,
    pub behavior: MockBehavior,
    /// Artificial latency added before every response.
    pub delay: Option<Duration>,
}

/// Stand-in for the Terramino backend's new-game endpoint.
pub struct Server {
    config: ServerConfig,
    state: AppState,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        let state = AppState::new(config.behavior, config.delay);
        Self { config, state }
    }

    /// Handle to the shared state; stays valid after [`Server::run`] takes ownership.
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    pub fn create_router(state: AppState) -> Router {
        Router::new().route(NEW_GAME_PATH, get(handle_new_game)).with_state(state)
    }

    /// Run the server, signalling `ready_tx` with the bound address once accepting connections
    pub async fn run(
        self,
        ready_tx: tokio::sync::oneshot::Sender<SocketAddr>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let app = Self::create_router(self.state);
        let listener = tokio::net::TcpListener::bind(self.config.address).await?;
        let local_addr = listener.local_addr()?;
        info!(%local_addr, behavior = ?self.config.behavior, "mock server listening");
        ready_tx.send(local_addr).ok();
        axum::serve(listener, app).await?;
        Ok(())
    }
}

/// Handler for GET /api/new-game
pub async fn handle_new_game(State(state): State<AppState>) -> Response {
    let n = state.served.fetch_add(1, Ordering::Relaxed) + 1;

    if let Some(delay) = state.delay {
        tokio::time::sleep(delay).await;
    }

    match state.behavior {
        MockBehavior::Ok => (StatusCode::OK, Json(json!({ "game_id": n }))).into_response(),
        MockBehavior::Status(code) => {
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR).into_response()
        }
        MockBehavior::NotJson => (StatusCode::OK, "game created").into_response(),
        MockBehavior::MissingId => (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response(),
    }
}
