use persona::api::{ApiError, HttpPredictionClient, PredictionService};
use serde_json::json;
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path, query_param},
};

// ============================================================================
// Helper Functions
// ============================================================================

fn comments() -> Vec<String> {
    vec![
        "I love meeting new people at parties".to_string(),
        "I always plan my week ahead".to_string(),
    ]
}

fn success_body() -> serde_json::Value {
    json!({
        "success": true,
        "scores": {
            "Openness": {"score": 7.0, "percentage": 70.0},
            "Conscientiousness": {"score": 8.5, "percentage": 85.0},
            "Extraversion": {"score": 6.0, "percentage": 60.0},
            "Agreeableness": {"score": 5.5, "percentage": 55.0},
            "Neuroticism": {"score": 3.0, "percentage": 30.0}
        },
        "interpretations": {
            "Openness": "You enjoy new ideas.",
            "Neuroticism": "You stay calm under pressure."
        },
        "summary": {
            "full_summary": "You are **organized** and sociable.",
            "generated_at": "AI-generated",
            "extra_field": "ignored"
        }
    })
}

async fn client_for(server: &MockServer) -> HttpPredictionClient {
    HttpPredictionClient::new(server.uri(), None).unwrap()
}

// ============================================================================
// POST /predict
// ============================================================================

#[tokio::test]
async fn test_predict_success_keeps_trait_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_json(json!({
            "comments": comments(),
            "include_summary": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server)
        .await
        .predict(&comments())
        .await
        .unwrap();

    assert!(result.success);
    let names: Vec<&str> = result.scores.keys().map(String::as_str).collect();
    assert_eq!(
        names,
        vec![
            "Openness",
            "Conscientiousness",
            "Extraversion",
            "Agreeableness",
            "Neuroticism"
        ]
    );
    assert_eq!(result.scores["Conscientiousness"].score, 8.5);
    assert_eq!(result.interpretation("Openness"), Some("You enjoy new ideas."));
    assert_eq!(result.interpretation("Extraversion"), None);

    let summary = result.summary.unwrap();
    let labels: Vec<&str> = summary.sections().iter().map(|s| s.label).collect();
    assert_eq!(labels, vec!["Overview"]);
    assert_eq!(summary.provenance(), Some("AI-generated"));
}

#[tokio::test]
async fn test_predict_null_summary() {
    let mock_server = MockServer::start().await;

    let mut body = success_body();
    body["summary"] = serde_json::Value::Null;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server)
        .await
        .predict(&comments())
        .await
        .unwrap();
    assert!(result.summary.is_none());
    assert_eq!(result.scores.len(), 5);
}

#[tokio::test]
async fn test_predict_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .await
        .predict(&comments())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::Status {
            status: 500,
            message: "Internal Server Error".to_string()
        }
    );
}

#[tokio::test]
async fn test_predict_success_false_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "scores": {},
            "interpretations": {},
            "summary": null
        })))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .await
        .predict(&comments())
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Rejected);
}

#[tokio::test]
async fn test_predict_malformed_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .await
        .predict(&comments())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn test_predict_unreachable_backend() {
    // Nothing listens on the discard port
    let client = HttpPredictionClient::new("http://127.0.0.1:9", None).unwrap();
    let err = client.predict(&comments()).await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn test_predict_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(success_body())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let client =
        HttpPredictionClient::new(mock_server.uri(), Some(Duration::from_millis(100))).unwrap();
    let err = client.predict(&comments()).await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)), "got {err:?}");
}

// ============================================================================
// GET / and POST /trait-insight
// ============================================================================

#[tokio::test]
async fn test_health_running() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Personality Prediction API",
            "status": "running"
        })))
        .mount(&mock_server)
        .await;

    let status = client_for(&mock_server).await.health().await.unwrap();
    assert!(status.is_running());
}

#[tokio::test]
async fn test_trait_insight_sends_query_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/trait-insight"))
        .and(query_param("trait", "Openness"))
        .and(query_param("score", "7.5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "trait": "Openness",
            "score": 7.5,
            "insight": "You thrive on novelty."
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let insight = client_for(&mock_server)
        .await
        .trait_insight("Openness", 7.5)
        .await
        .unwrap();
    assert_eq!(insight.trait_name, "Openness");
    assert_eq!(insight.insight, "You thrive on novelty.");
}
