//! HTTP implementation of [`PredictionService`] on top of `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;

use super::service::{ApiError, PredictionService};
use super::types::{HealthStatus, PredictRequest, PredictionResult, TraitInsight};

/// Backend address used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

pub struct HttpPredictionClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpPredictionClient {
    /// Builds a client for `base_url`. `timeout` of `None` means requests wait
    /// indefinitely.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;
        Ok(Self { base_url, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Checks the status and decodes the body. Reads the body as text first so
/// malformed JSON surfaces as `Parse` rather than a transport error.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    debug!("Backend response status: {}", status);

    let body = response
        .text()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !status.is_success() {
        warn!("Backend error: {} - {}", status.as_u16(), body);
        return Err(ApiError::Status {
            status: status.as_u16(),
            message: body,
        });
    }

    serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
}

#[async_trait]
impl PredictionService for HttpPredictionClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn predict(&self, comments: &[String]) -> Result<PredictionResult, ApiError> {
        let request = PredictRequest::new(comments.to_vec());
        info!(
            "POST {}/predict: {} comments, {} chars",
            self.base_url,
            request.comments.len(),
            request.comments.iter().map(|c| c.chars().count()).sum::<usize>()
        );

        let response = self
            .client
            .post(self.url("/predict"))
            .json(&request)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let result: PredictionResult = decode(response).await?;
        if !result.success {
            warn!("Backend reported success=false");
            return Err(ApiError::Rejected);
        }

        info!("Prediction received: {} traits", result.scores.len());
        Ok(result)
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        let response = self
            .client
            .get(self.url("/"))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        decode(response).await
    }

    async fn trait_insight(&self, trait_name: &str, score: f64) -> Result<TraitInsight, ApiError> {
        info!("POST {}/trait-insight: {} ({})", self.base_url, trait_name, score);
        let response = self
            .client
            .post(self.url("/trait-insight"))
            .query(&[("trait", trait_name.to_string()), ("score", score.to_string())])
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        decode(response).await
    }
}
