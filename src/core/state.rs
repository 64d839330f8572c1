//! # Application State
//!
//! Core business state for Persona. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── service: Arc<dyn PredictionService>  // backend client
//! ├── api_url: String               // shown in notices + title bar
//! ├── route: Route                  // which screen is active
//! ├── phase: Phase                  // Idle → Submitting → Shown
//! ├── collector: Collector          // comments being written
//! ├── handoff: HandoffStore         // results waiting for the results route
//! ├── notice: Option<Notice>        // transient toast
//! └── backend_status: BackendStatus // last health probe outcome
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use chrono::{DateTime, Local};
use indexmap::IndexMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::api::{PredictionResult, PredictionService};
use crate::core::collector::Collector;
use crate::core::handoff::{HandoffStore, HandoffToken};

/// How long a notice stays in the title bar.
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

/// Tags each outgoing request so late completions can be recognised.
pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Landing,
    Analyze,
    Results(HandoffToken),
}

#[derive(Debug)]
pub enum Phase {
    /// Collector is editable.
    Idle,
    /// One prediction request is in flight.
    Submitting(RequestId),
    /// Results screen is showing a claimed payload.
    Shown(Box<ShownResults>),
}

#[derive(Debug)]
pub struct ShownResults {
    pub result: PredictionResult,
    pub received_at: DateTime<Local>,
    /// Per-trait insight requests, keyed by trait name.
    pub insights: IndexMap<String, InsightState>,
}

impl ShownResults {
    pub fn new(result: PredictionResult) -> Self {
        Self {
            result,
            received_at: Local::now(),
            insights: IndexMap::new(),
        }
    }

    pub fn insight(&self, trait_name: &str) -> Option<&InsightState> {
        self.insights.get(trait_name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InsightState {
    Loading(RequestId),
    Ready(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
    pub created: Instant,
}

impl Notice {
    pub fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
            created: Instant::now(),
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created) >= NOTICE_TTL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendStatus {
    Unknown,
    Checking,
    Online,
    Offline,
}

impl BackendStatus {
    pub fn label(self) -> &'static str {
        match self {
            BackendStatus::Unknown => "unknown",
            BackendStatus::Checking => "checking",
            BackendStatus::Online => "online",
            BackendStatus::Offline => "offline",
        }
    }
}

pub struct App {
    pub service: Arc<dyn PredictionService>,
    pub api_url: String,
    pub route: Route,
    pub phase: Phase,
    pub collector: Collector,
    pub handoff: HandoffStore,
    pub notice: Option<Notice>,
    pub backend_status: BackendStatus,
    last_request_id: RequestId,
}

impl App {
    pub fn new(service: Arc<dyn PredictionService>) -> Self {
        let api_url = service.base_url().to_string();
        Self {
            service,
            api_url,
            route: Route::Landing,
            phase: Phase::Idle,
            collector: Collector::new(),
            handoff: HandoffStore::new(),
            notice: None,
            backend_status: BackendStatus::Unknown,
            last_request_id: 0,
        }
    }

    /// Hands out the next id. Ids are never reused within a run.
    pub fn next_request_id(&mut self) -> RequestId {
        self.last_request_id += 1;
        self.last_request_id
    }

    pub fn notify(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notice = Some(Notice::new(level, text));
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, Phase::Submitting(_))
    }

    pub fn shown(&self) -> Option<&ShownResults> {
        match &self.phase {
            Phase::Shown(shown) => Some(shown),
            _ => None,
        }
    }

    pub fn shown_mut(&mut self) -> Option<&mut ShownResults> {
        match &mut self.phase {
            Phase::Shown(shown) => Some(shown),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert_eq!(app.route, Route::Landing);
        assert!(matches!(app.phase, Phase::Idle));
        assert_eq!(app.api_url, "http://mock.test");
        assert_eq!(app.collector.len(), 1);
        assert!(app.notice.is_none());
        assert_eq!(app.backend_status, BackendStatus::Unknown);
    }

    #[test]
    fn test_request_ids_increase() {
        let mut app = test_app();
        let a = app.next_request_id();
        let b = app.next_request_id();
        assert!(b > a);
    }

    #[test]
    fn test_notice_expiry() {
        let notice = Notice::new(NoticeLevel::Info, "hello");
        assert!(!notice.is_expired(notice.created));
        assert!(notice.is_expired(notice.created + NOTICE_TTL));
    }
}
