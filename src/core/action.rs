//! # Actions
//!
//! Everything that can happen in Persona becomes an `Action`.
//! User presses Ctrl+S? That's `Action::Submit`.
//! Backend responds? That's `Action::PredictionSucceeded { .. }`.
//!
//! The `update()` function takes the current state and an action, mutates the
//! state, and returns an `Effect` describing any I/O the adapter should start.
//! No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Completions carry the `RequestId` they were issued with. A completion whose
//! id no longer matches what the state is waiting for is dropped, which is how
//! abandoned requests (Esc mid-flight, reset before an insight lands) become
//! no-ops without cancelling anything.

use log::{debug, error, info, warn};

use crate::api::{ApiError, HealthStatus, PredictionResult};
use crate::core::collector::{Collector, CollectorError};
use crate::core::state::{
    App, BackendStatus, InsightState, NoticeLevel, Phase, RequestId, Route, ShownResults,
};

pub const ANALYSIS_COMPLETE: &str = "Personality analysis complete!";

#[derive(Debug, Clone)]
pub enum Action {
    /// Landing → Analyze.
    Start,
    /// Esc: Analyze → Landing, Results → Analyze (reset).
    Back,
    AddComment,
    RemoveComment(usize),
    UpdateComment { index: usize, text: String },
    Submit,
    PredictionSucceeded {
        request_id: RequestId,
        result: PredictionResult,
    },
    PredictionFailed {
        request_id: RequestId,
        error: ApiError,
    },
    Navigate(Route),
    /// "Take Test Again".
    Reset,
    RequestInsight(String),
    InsightReady {
        request_id: RequestId,
        trait_name: String,
        insight: String,
    },
    InsightFailed {
        request_id: RequestId,
        trait_name: String,
        error: ApiError,
    },
    CheckHealth,
    HealthChecked(Result<HealthStatus, ApiError>),
    /// Drops the notice once it has outlived `NOTICE_TTL`.
    Tick,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    SpawnPrediction {
        request_id: RequestId,
        comments: Vec<String>,
    },
    SpawnInsight {
        request_id: RequestId,
        trait_name: String,
        score: f64,
    },
    SpawnHealthCheck,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Start => {
            if app.route == Route::Landing {
                app.route = Route::Analyze;
            }
            Effect::None
        }
        Action::Back => {
            match app.route {
                Route::Landing => {}
                Route::Analyze => {
                    if let Phase::Submitting(id) = app.phase {
                        info!("Abandoning in-flight prediction request {}", id);
                        app.phase = Phase::Idle;
                        app.collector.finish_loading();
                    }
                    app.route = Route::Landing;
                }
                Route::Results(_) => reset(app),
            }
            Effect::None
        }
        Action::AddComment => {
            if let Err(e) = app.collector.add() {
                refuse(app, e);
            }
            Effect::None
        }
        Action::RemoveComment(index) => {
            if let Err(e) = app.collector.remove(index) {
                refuse(app, e);
            }
            Effect::None
        }
        Action::UpdateComment { index, text } => {
            if let Err(e) = app.collector.update(index, text) {
                refuse(app, e);
            }
            Effect::None
        }
        Action::Submit => {
            if app.route != Route::Analyze || !matches!(app.phase, Phase::Idle) {
                debug!("Submit ignored: route={:?}, phase busy", app.route);
                return Effect::None;
            }
            match app.collector.submit() {
                Ok(comments) => {
                    let request_id = app.next_request_id();
                    info!(
                        "Submitting {} comments (request {})",
                        comments.len(),
                        request_id
                    );
                    app.phase = Phase::Submitting(request_id);
                    Effect::SpawnPrediction {
                        request_id,
                        comments,
                    }
                }
                Err(e) => {
                    refuse(app, e);
                    Effect::None
                }
            }
        }
        Action::PredictionSucceeded { request_id, result } => {
            if !awaiting(app, request_id) {
                debug!("Dropping stale prediction result {}", request_id);
                return Effect::None;
            }
            app.collector.finish_loading();
            app.phase = Phase::Idle;
            let token = app.handoff.deposit(result);
            navigate(app, Route::Results(token));
            app.notify(NoticeLevel::Success, ANALYSIS_COMPLETE);
            Effect::None
        }
        Action::PredictionFailed { request_id, error } => {
            if !awaiting(app, request_id) {
                debug!("Dropping stale prediction failure {}: {}", request_id, error);
                return Effect::None;
            }
            error!("Prediction request {} failed: {}", request_id, error);
            app.collector.finish_loading();
            app.phase = Phase::Idle;
            let text = format!(
                "Failed to analyze personality. Make sure the backend is running on {}",
                app.api_url
            );
            app.notify(NoticeLevel::Error, text);
            Effect::None
        }
        Action::Navigate(route) => {
            navigate(app, route);
            Effect::None
        }
        Action::Reset => {
            reset(app);
            Effect::None
        }
        Action::RequestInsight(trait_name) => {
            let Some(score) = app
                .shown()
                .and_then(|s| s.result.scores.get(&trait_name))
                .map(|s| s.score)
            else {
                return Effect::None;
            };
            if app
                .shown()
                .is_some_and(|s| s.insight(&trait_name).is_some())
            {
                debug!("Insight for {} already requested", trait_name);
                return Effect::None;
            }
            let request_id = app.next_request_id();
            if let Some(shown) = app.shown_mut() {
                shown
                    .insights
                    .insert(trait_name.clone(), InsightState::Loading(request_id));
            }
            Effect::SpawnInsight {
                request_id,
                trait_name,
                score,
            }
        }
        Action::InsightReady {
            request_id,
            trait_name,
            insight,
        } => {
            if !insight_pending(app, &trait_name, request_id) {
                debug!("Dropping stale insight {} for {}", request_id, trait_name);
                return Effect::None;
            }
            if let Some(shown) = app.shown_mut() {
                shown
                    .insights
                    .insert(trait_name, InsightState::Ready(insight));
            }
            Effect::None
        }
        Action::InsightFailed {
            request_id,
            trait_name,
            error,
        } => {
            if !insight_pending(app, &trait_name, request_id) {
                debug!("Dropping stale insight failure {}: {}", request_id, error);
                return Effect::None;
            }
            warn!("Insight request for {} failed: {}", trait_name, error);
            if let Some(shown) = app.shown_mut() {
                shown.insights.shift_remove(&trait_name);
            }
            app.notify(
                NoticeLevel::Error,
                format!("Could not load insight for {trait_name}"),
            );
            Effect::None
        }
        Action::CheckHealth => {
            app.backend_status = BackendStatus::Checking;
            Effect::SpawnHealthCheck
        }
        Action::HealthChecked(outcome) => {
            app.backend_status = match outcome {
                Ok(status) if status.is_running() => BackendStatus::Online,
                Ok(status) => {
                    warn!("Backend answered with status {:?}", status.status);
                    BackendStatus::Offline
                }
                Err(e) => {
                    warn!("Health check failed: {}", e);
                    BackendStatus::Offline
                }
            };
            info!("Backend is {}", app.backend_status.label());
            Effect::None
        }
        Action::Tick => {
            let now = std::time::Instant::now();
            if app.notice.as_ref().is_some_and(|n| n.is_expired(now)) {
                app.notice = None;
            }
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn awaiting(app: &App, request_id: RequestId) -> bool {
    matches!(app.phase, Phase::Submitting(id) if id == request_id)
}

fn insight_pending(app: &App, trait_name: &str, request_id: RequestId) -> bool {
    matches!(
        app.shown().and_then(|s| s.insight(trait_name)),
        Some(InsightState::Loading(id)) if *id == request_id
    )
}

/// Surfaces a collector refusal. Silent refusals are only logged.
fn refuse(app: &mut App, e: CollectorError) {
    if e.is_user_facing() {
        app.notify(NoticeLevel::Error, e.to_string());
    } else {
        debug!("Collector refused: {}", e);
    }
}

/// Entering Results claims the hand-off payload. Without one the user lands
/// on Analyze instead, with no notice.
fn navigate(app: &mut App, route: Route) {
    match route {
        Route::Results(token) => match app.handoff.claim(&token) {
            Some(result) => {
                info!("Showing results for {} traits", result.scores.len());
                app.phase = Phase::Shown(Box::new(ShownResults::new(result)));
                app.route = Route::Results(token);
            }
            None => {
                debug!("No payload for token {}, redirecting to analyze", token);
                if matches!(app.phase, Phase::Shown(_)) {
                    app.phase = Phase::Idle;
                }
                app.route = Route::Analyze;
            }
        },
        // Leaving Results by any route drops the payload
        other if matches!(app.route, Route::Results(_)) => {
            reset(app);
            app.route = other;
        }
        other => app.route = other,
    }
}

fn reset(app: &mut App) {
    info!("Resetting to a fresh analysis");
    app.phase = Phase::Idle;
    app.handoff.clear();
    app.collector = Collector::new();
    app.route = Route::Analyze;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::handoff::HandoffToken;
    use crate::test_support::{sample_result, test_app};

    const VALID_A: &str = "I love meeting new people at parties.";
    const VALID_B: &str = "I keep a detailed planner for every week.";

    fn analyze_app(texts: &[&str]) -> App {
        let mut app = test_app();
        update(&mut app, Action::Start);
        for _ in 1..texts.len() {
            update(&mut app, Action::AddComment);
        }
        for (index, text) in texts.iter().enumerate() {
            update(
                &mut app,
                Action::UpdateComment {
                    index,
                    text: text.to_string(),
                },
            );
        }
        app
    }

    fn submit(app: &mut App) -> RequestId {
        match update(app, Action::Submit) {
            Effect::SpawnPrediction { request_id, .. } => request_id,
            other => panic!("expected SpawnPrediction, got {:?}", other),
        }
    }

    #[test]
    fn test_start_moves_to_analyze() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Start), Effect::None);
        assert_eq!(app.route, Route::Analyze);
    }

    #[test]
    fn test_quit_returns_quit_effect() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }

    #[test]
    fn test_submit_emits_valid_subset() {
        let mut app = analyze_app(&[VALID_A, "", VALID_B]);
        let effect = update(&mut app, Action::Submit);
        assert_eq!(
            effect,
            Effect::SpawnPrediction {
                request_id: 1,
                comments: vec![VALID_A.to_string(), VALID_B.to_string()],
            }
        );
        assert!(app.is_submitting());
        assert!(app.collector.is_loading());
    }

    #[test]
    fn test_submit_validation_error_sets_notice() {
        let mut app = analyze_app(&["  ", ""]);
        assert_eq!(update(&mut app, Action::Submit), Effect::None);
        assert!(matches!(app.phase, Phase::Idle));
        let notice = app.notice.as_ref().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.text, "Please enter at least one comment");
    }

    #[test]
    fn test_submit_is_single_flight() {
        let mut app = analyze_app(&[VALID_A]);
        submit(&mut app);
        assert_eq!(update(&mut app, Action::Submit), Effect::None);
        update(&mut app, Action::AddComment);
        assert_eq!(app.collector.len(), 1);
    }

    #[test]
    fn test_success_shows_exact_payload() {
        let mut app = analyze_app(&[VALID_A, VALID_B]);
        let id = submit(&mut app);
        let result = sample_result();
        update(
            &mut app,
            Action::PredictionSucceeded {
                request_id: id,
                result: result.clone(),
            },
        );

        assert!(matches!(app.route, Route::Results(_)));
        assert_eq!(app.shown().unwrap().result, result);
        assert!(app.handoff.is_empty());
        assert!(!app.collector.is_loading());
        assert_eq!(app.notice.as_ref().unwrap().text, ANALYSIS_COMPLETE);
        assert_eq!(app.notice.as_ref().unwrap().level, NoticeLevel::Success);
    }

    #[test]
    fn test_failure_returns_to_idle_with_text_intact() {
        let mut app = analyze_app(&[VALID_A, VALID_B]);
        let id = submit(&mut app);
        update(
            &mut app,
            Action::PredictionFailed {
                request_id: id,
                error: ApiError::Rejected,
            },
        );

        assert!(matches!(app.phase, Phase::Idle));
        assert_eq!(app.route, Route::Analyze);
        assert!(app.handoff.is_empty());
        assert!(!app.collector.is_loading());
        assert_eq!(app.collector.comments(), &[VALID_A.to_string(), VALID_B.to_string()]);
        assert_eq!(
            app.notice.as_ref().unwrap().text,
            "Failed to analyze personality. Make sure the backend is running on http://mock.test"
        );
        // Editable again
        update(&mut app, Action::AddComment);
        assert_eq!(app.collector.len(), 3);
    }

    #[test]
    fn test_stale_completion_after_back_is_ignored() {
        let mut app = analyze_app(&[VALID_A]);
        let id = submit(&mut app);
        update(&mut app, Action::Back);
        assert_eq!(app.route, Route::Landing);
        assert!(!app.collector.is_loading());

        update(
            &mut app,
            Action::PredictionSucceeded {
                request_id: id,
                result: sample_result(),
            },
        );
        assert_eq!(app.route, Route::Landing);
        assert!(matches!(app.phase, Phase::Idle));
        assert!(app.handoff.is_empty());
        assert!(app.notice.is_none());
    }

    #[test]
    fn test_old_request_does_not_complete_newer_one() {
        let mut app = analyze_app(&[VALID_A]);
        let first = submit(&mut app);
        update(&mut app, Action::Back);
        update(&mut app, Action::Start);
        let second = submit(&mut app);
        assert_ne!(first, second);

        update(
            &mut app,
            Action::PredictionFailed {
                request_id: first,
                error: ApiError::Network("refused".into()),
            },
        );
        assert!(app.is_submitting());
        assert!(app.notice.is_none());
    }

    #[test]
    fn test_unknown_token_redirects_to_analyze() {
        let mut app = test_app();
        update(
            &mut app,
            Action::Navigate(Route::Results(HandoffToken::from_raw("bogus"))),
        );
        assert_eq!(app.route, Route::Analyze);
        assert!(app.notice.is_none());
    }

    #[test]
    fn test_consumed_token_redirects_to_analyze() {
        let mut app = analyze_app(&[VALID_A]);
        let id = submit(&mut app);
        update(
            &mut app,
            Action::PredictionSucceeded {
                request_id: id,
                result: sample_result(),
            },
        );
        let Route::Results(token) = app.route.clone() else {
            panic!("expected results route");
        };
        update(&mut app, Action::Navigate(Route::Results(token)));
        assert_eq!(app.route, Route::Analyze);
        assert!(app.shown().is_none());
    }

    #[test]
    fn test_reset_discards_payload_and_comments() {
        let mut app = analyze_app(&[VALID_A]);
        let id = submit(&mut app);
        update(
            &mut app,
            Action::PredictionSucceeded {
                request_id: id,
                result: sample_result(),
            },
        );
        update(&mut app, Action::Reset);
        assert_eq!(app.route, Route::Analyze);
        assert!(matches!(app.phase, Phase::Idle));
        assert_eq!(app.collector.comments(), &[String::new()]);
    }

    #[test]
    fn test_back_from_results_resets() {
        let mut app = analyze_app(&[VALID_A]);
        let id = submit(&mut app);
        update(
            &mut app,
            Action::PredictionSucceeded {
                request_id: id,
                result: sample_result(),
            },
        );
        update(&mut app, Action::Back);
        assert_eq!(app.route, Route::Analyze);
        assert!(app.shown().is_none());
    }

    #[test]
    fn test_navigating_away_from_results_drops_payload() {
        let mut app = analyze_app(&[VALID_A]);
        let id = submit(&mut app);
        update(
            &mut app,
            Action::PredictionSucceeded {
                request_id: id,
                result: sample_result(),
            },
        );
        update(&mut app, Action::Navigate(Route::Landing));
        assert_eq!(app.route, Route::Landing);
        assert!(app.shown().is_none());
        assert!(app.handoff.is_empty());

        // A new submission goes through afterwards
        update(&mut app, Action::Start);
        update(
            &mut app,
            Action::UpdateComment {
                index: 0,
                text: VALID_A.to_string(),
            },
        );
        assert!(matches!(
            update(&mut app, Action::Submit),
            Effect::SpawnPrediction { .. }
        ));
    }

    #[test]
    fn test_capacity_error_notice() {
        let mut app = analyze_app(&[""; 10]);
        update(&mut app, Action::AddComment);
        assert_eq!(app.collector.len(), 10);
        assert_eq!(
            app.notice.as_ref().unwrap().text,
            "Maximum 10 comments allowed"
        );
    }

    #[test]
    fn test_remove_last_entry_is_silent() {
        let mut app = analyze_app(&[VALID_A]);
        update(&mut app, Action::RemoveComment(0));
        assert_eq!(app.collector.len(), 1);
        assert!(app.notice.is_none());
    }

    fn shown_app() -> App {
        let mut app = analyze_app(&[VALID_A]);
        let id = submit(&mut app);
        update(
            &mut app,
            Action::PredictionSucceeded {
                request_id: id,
                result: sample_result(),
            },
        );
        app.notice = None;
        app
    }

    #[test]
    fn test_insight_request_and_completion() {
        let mut app = shown_app();
        let effect = update(&mut app, Action::RequestInsight("Openness".into()));
        let Effect::SpawnInsight {
            request_id,
            trait_name,
            score,
        } = effect
        else {
            panic!("expected SpawnInsight");
        };
        assert_eq!(trait_name, "Openness");
        assert_eq!(score, 4.0);

        // Single-flight per trait
        assert_eq!(
            update(&mut app, Action::RequestInsight("Openness".into())),
            Effect::None
        );

        update(
            &mut app,
            Action::InsightReady {
                request_id,
                trait_name: "Openness".into(),
                insight: "Curious mind.".into(),
            },
        );
        assert_eq!(
            app.shown().unwrap().insight("Openness"),
            Some(&InsightState::Ready("Curious mind.".into()))
        );
    }

    #[test]
    fn test_insight_for_unknown_trait_is_ignored() {
        let mut app = shown_app();
        assert_eq!(
            update(&mut app, Action::RequestInsight("Honesty".into())),
            Effect::None
        );
    }

    #[test]
    fn test_insight_after_reset_is_ignored() {
        let mut app = shown_app();
        let Effect::SpawnInsight { request_id, .. } =
            update(&mut app, Action::RequestInsight("Openness".into()))
        else {
            panic!("expected SpawnInsight");
        };
        update(&mut app, Action::Reset);
        update(
            &mut app,
            Action::InsightFailed {
                request_id,
                trait_name: "Openness".into(),
                error: ApiError::Network("down".into()),
            },
        );
        assert!(app.notice.is_none());
        assert!(app.shown().is_none());
    }

    #[test]
    fn test_insight_failure_clears_pending_and_notifies() {
        let mut app = shown_app();
        let Effect::SpawnInsight { request_id, .. } =
            update(&mut app, Action::RequestInsight("Extraversion".into()))
        else {
            panic!("expected SpawnInsight");
        };
        update(
            &mut app,
            Action::InsightFailed {
                request_id,
                trait_name: "Extraversion".into(),
                error: ApiError::Status {
                    status: 500,
                    message: "boom".into(),
                },
            },
        );
        assert!(app.shown().unwrap().insight("Extraversion").is_none());
        assert_eq!(app.notice.as_ref().unwrap().level, NoticeLevel::Error);
    }

    #[test]
    fn test_health_check_outcomes() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::CheckHealth), Effect::SpawnHealthCheck);
        assert_eq!(app.backend_status, BackendStatus::Checking);

        update(
            &mut app,
            Action::HealthChecked(Ok(HealthStatus {
                message: "ok".into(),
                status: "running".into(),
            })),
        );
        assert_eq!(app.backend_status, BackendStatus::Online);

        update(
            &mut app,
            Action::HealthChecked(Err(ApiError::Network("refused".into()))),
        );
        assert_eq!(app.backend_status, BackendStatus::Offline);
    }
}
