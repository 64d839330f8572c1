pub mod client;
pub mod service;
pub mod types;

pub use client::{DEFAULT_API_URL, HttpPredictionClient};
pub use service::{ApiError, PredictionService};
pub use types::{
    HealthStatus, PredictRequest, PredictionResult, Summary, SummarySection, Trait, TraitInsight,
    TraitScore,
};
