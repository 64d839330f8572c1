//! Wire types for the prediction backend.
//!
//! Field names follow the backend's JSON exactly. Maps keyed by trait name use
//! `IndexMap` so traits render in the order the backend sent them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The five Big Five personality dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trait {
    Openness,
    Conscientiousness,
    Extraversion,
    Agreeableness,
    Neuroticism,
}

impl Trait {
    pub const ALL: [Trait; 5] = [
        Trait::Openness,
        Trait::Conscientiousness,
        Trait::Extraversion,
        Trait::Agreeableness,
        Trait::Neuroticism,
    ];

    /// Name as used by the backend for map keys.
    pub fn name(self) -> &'static str {
        match self {
            Trait::Openness => "Openness",
            Trait::Conscientiousness => "Conscientiousness",
            Trait::Extraversion => "Extraversion",
            Trait::Agreeableness => "Agreeableness",
            Trait::Neuroticism => "Neuroticism",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Trait::Openness => "Imagination, creativity, and openness to new experiences",
            Trait::Conscientiousness => "Organization, dependability, and goal-oriented behavior",
            Trait::Extraversion => "Sociability, energy, and positive emotions",
            Trait::Agreeableness => "Compassion, cooperation, and trust in others",
            Trait::Neuroticism => "Emotional sensitivity and tendency toward negative emotions",
        }
    }

    /// Exact-name lookup. Backend keys that aren't Big Five names yield `None`.
    pub fn from_name(name: &str) -> Option<Trait> {
        Trait::ALL.into_iter().find(|t| t.name() == name)
    }
}

/// Request body for `POST /predict`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PredictRequest {
    pub comments: Vec<String>,
    pub include_summary: bool,
}

impl PredictRequest {
    pub fn new(comments: Vec<String>) -> Self {
        Self {
            comments,
            include_summary: true,
        }
    }
}

/// Score for a single trait. Both values are computed by the backend and
/// displayed verbatim.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct TraitScore {
    /// 0–10 rating
    pub score: f64,
    /// 0–100 share used to size the chart segment
    pub percentage: f64,
}

/// Narrative summary. Every field is optional; the backend may also send
/// keys we don't know about, which are ignored.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Summary {
    #[serde(default)]
    pub full_summary: Option<String>,
    #[serde(default)]
    pub strengths: Option<String>,
    #[serde(default)]
    pub growth_areas: Option<String>,
    #[serde(default)]
    pub career_suggestions: Option<String>,
    #[serde(default)]
    pub short_summary: Option<String>,
    #[serde(default)]
    pub generated_at: Option<String>,
}

/// One labeled narrative section of the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummarySection<'a> {
    pub label: &'static str,
    pub text: &'a str,
}

impl Summary {
    /// Populated narrative sections in display order. Absent and blank fields
    /// are skipped.
    pub fn sections(&self) -> Vec<SummarySection<'_>> {
        [
            ("Overview", &self.full_summary),
            ("Your Strengths", &self.strengths),
            ("Areas for Growth", &self.growth_areas),
            ("Career Suggestions", &self.career_suggestions),
        ]
        .into_iter()
        .filter_map(|(label, field)| {
            field
                .as_deref()
                .filter(|text| !text.trim().is_empty())
                .map(|text| SummarySection { label, text })
        })
        .collect()
    }

    /// Provenance line ("AI-generated", "Rule-based (AI unavailable)"), if any.
    pub fn provenance(&self) -> Option<&str> {
        self.generated_at
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Response body of `POST /predict`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PredictionResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub scores: IndexMap<String, TraitScore>,
    #[serde(default)]
    pub interpretations: IndexMap<String, String>,
    #[serde(default)]
    pub summary: Option<Summary>,
}

impl PredictionResult {
    /// Interpretation text for a trait, matched by exact name.
    pub fn interpretation(&self, trait_name: &str) -> Option<&str> {
        self.interpretations.get(trait_name).map(String::as_str)
    }
}

/// Response body of `GET /`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HealthStatus {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

impl HealthStatus {
    pub fn is_running(&self) -> bool {
        self.status == "running"
    }
}

/// Response body of `POST /trait-insight`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TraitInsight {
    #[serde(rename = "trait")]
    pub trait_name: String,
    pub score: f64,
    pub insight: String,
}
