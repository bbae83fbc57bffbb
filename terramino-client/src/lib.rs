use serde_json::Value;
use std::time::{Duration, Instant};
use terramino_common::{
    BenchError, Classification, Result, GAME_ID_KEYS, NEW_GAME_PATH, REQUEST_TIMEOUT,
};
use tracing::debug;

/// Benchmark client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend, e.g. `http://localhost:8081`.
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Configuration for `base_url` with the standard per-request timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), timeout: REQUEST_TIMEOUT }
    }
}

/// Outcome of one timed request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub elapsed_ms: f64,
    pub classification: Classification,
}

/// Client for the Terramino new-game endpoint.
///
/// Cheap to share: the inner `reqwest::Client` pools connections, so one
/// instance is meant to serve every worker of a run.
pub struct Client {
    pub config: ClientConfig,
    http_client: reqwest::Client,
}

impl Client {
    /// Build a client; fails only if the underlying HTTP stack cannot be initialised.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BenchError::HttpClientUnavailable(e.to_string()))?;
        Ok(Self { config, http_client })
    }

    /// Full URL of the new-game endpoint. Trailing slashes on the base are ignored.
    pub fn new_game_url(&self) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), NEW_GAME_PATH)
    }

    /// Request a new game and return the parsed response body.
    ///
    /// Succeeds only on HTTP 200 with a JSON object carrying a game identifier.
    pub async fn new_game(&self) -> Result<Value> {
        let response = self
            .http_client
            .get(self.new_game_url())
            .send()
            .await
            .map_err(|e| BenchError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(BenchError::HttpStatus(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| BenchError::NetworkError(e.to_string()))?;

        let body: Value =
            serde_json::from_slice(&bytes).map_err(|e| BenchError::InvalidBody(e.to_string()))?;

        if !has_game_id(&body) {
            return Err(BenchError::MissingGameId);
        }
        Ok(body)
    }

    /// Issue one new-game request and time it end to end, body parsing included.
    /// Never fails: every error becomes [`Classification::Error`].
    pub async fn execute(&self) -> Sample {
        let start = Instant::now();
        let result = self.new_game().await;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        if let Err(e) = &result {
            debug!(error = %e, elapsed_ms, "new-game request failed");
        }

        Sample { elapsed_ms, classification: Classification::from_result(&result) }
    }
}

/// Returns `true` if `body` is a JSON object containing any of [`GAME_ID_KEYS`].
pub fn has_game_id(body: &Value) -> bool {
    body.as_object()
        .map(|obj| GAME_ID_KEYS.iter().any(|k| obj.contains_key(*k)))
        .unwrap_or(false)
}
