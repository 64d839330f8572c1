use std::fmt;

use async_trait::async_trait;

use super::types::{HealthStatus, PredictionResult, TraitInsight};

/// Errors from talking to the prediction backend.
///
/// The controller treats every variant the same way (notice + back to idle);
/// the variants exist for logging.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Client could not be built (bad base URL, TLS init failure).
    Config(String),
    /// Network-level failure (DNS, connection refused, timeout).
    Network(String),
    /// Backend answered with a non-2xx status.
    Status { status: u16, message: String },
    /// Body was not the JSON we expected.
    Parse(String),
    /// Body parsed but carried `success: false`.
    Rejected,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Config(msg) => write!(f, "config error: {msg}"),
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Status { status, message } => {
                write!(f, "HTTP error (status {status}): {message}")
            }
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
            ApiError::Rejected => write!(f, "analysis failed"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Everything the controller needs from the backend.
#[async_trait]
pub trait PredictionService: Send + Sync {
    /// Base address requests are sent to, for display in notices.
    fn base_url(&self) -> &str;

    /// Submits comments for analysis. A body with `success: false` is an
    /// error, so `Ok` always holds a successful result.
    async fn predict(&self, comments: &[String]) -> Result<PredictionResult, ApiError>;

    /// Probes the backend root endpoint.
    async fn health(&self) -> Result<HealthStatus, ApiError>;

    /// Asks for a longer write-up of one trait score.
    async fn trait_insight(&self, trait_name: &str, score: f64) -> Result<TraitInsight, ApiError>;
}
