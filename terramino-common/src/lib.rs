use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Per-request timeout applied by the benchmark client.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Path exercised by the benchmark, appended to the target base URL.
pub const NEW_GAME_PATH: &str = "/api/new-game";

/// Literal written to the `endpoint` column of the results CSV.
pub const NEW_GAME_ENDPOINT: &str = "new-game";

/// A new-game response counts as valid if its JSON object carries any of these keys.
pub const GAME_ID_KEYS: [&str; 3] = ["game_id", "id", "gameId"];

/// Error types for benchmark operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BenchError {
    #[error("HTTP client unavailable: {0}")]
    HttpClientUnavailable(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Unexpected HTTP status {0}")]
    HttpStatus(u16),

    #[error("Response body is not valid JSON: {0}")]
    InvalidBody(String),

    #[error("Response body has no game identifier")]
    MissingGameId,

    #[error("Failed to write results to {path}: {message}")]
    ReportWrite { path: String, message: String },
}

/// Result type for benchmark operations
pub type Result<T> = std::result::Result<T, BenchError>;

/// Outcome of a single benchmark request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    Success,
    Error,
}

impl Classification {
    /// Every error, whatever its cause, collapses to [`Classification::Error`].
    pub fn from_result<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Classification::Success,
            Err(_) => Classification::Error,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Classification::Success)
    }
}
