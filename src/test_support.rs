//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::Arc;

use crate::api::{
    ApiError, HealthStatus, PredictionResult, PredictionService, Summary, Trait, TraitInsight,
    TraitScore,
};

/// A canned service for tests that don't need real API calls.
pub struct MockService;

#[async_trait]
impl PredictionService for MockService {
    fn base_url(&self) -> &str {
        "http://mock.test"
    }

    async fn predict(&self, _comments: &[String]) -> Result<PredictionResult, ApiError> {
        Ok(sample_result())
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        Ok(HealthStatus {
            message: "mock".to_string(),
            status: "running".to_string(),
        })
    }

    async fn trait_insight(&self, trait_name: &str, score: f64) -> Result<TraitInsight, ApiError> {
        Ok(TraitInsight {
            trait_name: trait_name.to_string(),
            score,
            insight: format!("Insight for {trait_name}"),
        })
    }
}

/// Creates a test App with a MockService.
pub fn test_app() -> crate::core::state::App {
    crate::core::state::App::new(Arc::new(MockService))
}

/// Five traits in canonical order with interpretations and a full summary only.
pub fn sample_result() -> PredictionResult {
    let mut scores = IndexMap::new();
    let mut interpretations = IndexMap::new();
    for (i, t) in Trait::ALL.iter().enumerate() {
        let score = 4.0 + i as f64;
        scores.insert(
            t.name().to_string(),
            TraitScore {
                score,
                percentage: score * 10.0,
            },
        );
        interpretations.insert(t.name().to_string(), format!("{} reading", t.name()));
    }
    PredictionResult {
        success: true,
        scores,
        interpretations,
        summary: Some(Summary {
            full_summary: Some("You are **curious** and steady.".to_string()),
            ..Default::default()
        }),
    }
}
