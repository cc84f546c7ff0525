mod common;

use common::harness::{ModelMode, TestServerConfig, find_available_port, spawn_test_server};
use common::http_client::TestClient;
use evaluator::evaluation::EvaluationRequest;
use evaluator::gateway::check_health;
use serde_json::json;

fn paris() -> EvaluationRequest {
    EvaluationRequest::new(
        Some("What is the capital of France?"),
        "Paris is the capital of France.",
        "The capital city of France is Paris.",
    )
}

#[tokio::test]
async fn test_health_and_models_report_ready() {
    let server = spawn_test_server(TestServerConfig::default()).await.unwrap();
    let client = TestClient::new(server.url());

    let health = client.health().await.unwrap();
    assert_eq!(health.status, "ok");
    assert!(health.embeddings_model_ready);
    assert!(health.llm_model_ready);

    let models = client.models().await.unwrap();
    assert!(models.embeddings_ready);
    assert!(models.llm_ready);
    assert_eq!(models.embeddings_model, "sentence-transformers/all-MiniLM-L6-v2");
    assert_eq!(models.llm_model, "google/flan-t5-base");

    server.shutdown().await;
}

#[tokio::test]
async fn test_status_endpoints_are_ok_without_models() {
    let server = spawn_test_server(TestServerConfig::with_models(ModelMode::Unavailable))
        .await
        .unwrap();
    let client = TestClient::new(server.url());

    let health = client.health().await.unwrap();
    assert_eq!(health.status, "ok");
    assert!(!health.embeddings_model_ready);
    assert!(!health.llm_model_ready);

    let models = client.models().await.unwrap();
    assert!(!models.embeddings_ready);
    assert!(!models.llm_ready);
}

#[tokio::test]
async fn test_evaluate_paris_example() {
    let server = spawn_test_server(TestServerConfig::default()).await.unwrap();
    let client = TestClient::new(server.url());

    let resp = client.evaluate(&paris()).await.unwrap();
    assert_eq!(resp.status, 200);
    assert_eq!(resp.evaluator_status, "generated");

    let body = resp.body;
    assert_eq!(body["success"], true);

    let similarity = body["similarity"].as_f64().unwrap();
    let score = body["score"].as_f64().unwrap();
    let percentage = body["similarity_percentage"].as_f64().unwrap();

    assert!(similarity > 0.8, "similarity {similarity}");
    assert!((score - similarity * 5.0).abs() < 0.01);
    assert!((percentage - similarity * 100.0).abs() < 0.06);
    assert!(!body["feedback"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_identical_answers_score_full_marks() {
    let server = spawn_test_server(TestServerConfig::default()).await.unwrap();
    let client = TestClient::new(server.url());

    let answer = "Photosynthesis converts light energy into chemical energy.";
    let resp = client
        .evaluate(&EvaluationRequest::new(None, answer, answer))
        .await
        .unwrap();

    assert_eq!(resp.status, 200);
    assert!(resp.body["similarity"].as_f64().unwrap() > 0.999);
    assert!(resp.body["score"].as_f64().unwrap() > 4.99);
}

#[tokio::test]
async fn test_evaluate_rejects_short_answers() {
    let server = spawn_test_server(TestServerConfig::default()).await.unwrap();
    let client = TestClient::new(server.url());

    let resp = client
        .post_json("/api/evaluate", &json!({"modelAnswer": "x", "studentAnswer": "y"}))
        .await
        .unwrap();

    assert_eq!(resp.status, 400);
    assert_eq!(
        resp.body,
        json!({"error": "Answers must be at least 5-10 characters long"})
    );
}

#[tokio::test]
async fn test_evaluate_rejects_missing_fields_and_bad_json() {
    let server = spawn_test_server(TestServerConfig::default()).await.unwrap();
    let client = TestClient::new(server.url());

    let missing = client
        .post_json("/api/evaluate", &json!({"question": "Only a question"}))
        .await
        .unwrap();
    assert_eq!(missing.status, 400);
    assert_eq!(
        missing.body["error"],
        "Missing required fields: modelAnswer and studentAnswer"
    );

    let broken = client.post_raw("/api/evaluate", "{not json").await.unwrap();
    assert_eq!(broken.status, 400);
    assert_eq!(broken.body["error"], "No JSON data provided");
}

#[tokio::test]
async fn test_evaluate_without_embedder_returns_500() {
    let server = spawn_test_server(TestServerConfig::with_models(ModelMode::Unavailable))
        .await
        .unwrap();
    let client = TestClient::new(server.url());

    let resp = client.evaluate(&paris()).await.unwrap();
    assert_eq!(resp.status, 500);
    assert_eq!(resp.body["success"], false);
    assert_eq!(resp.body["error"], "Failed to process evaluation");
    assert!(resp.body["details"].is_string());
}

#[tokio::test]
async fn test_evaluate_without_feedback_model_uses_band_feedback() {
    let server = spawn_test_server(TestServerConfig::with_models(ModelMode::NoFeedbackModel))
        .await
        .unwrap();
    let client = TestClient::new(server.url());

    let resp = client.evaluate(&paris()).await.unwrap();
    assert_eq!(resp.status, 200);
    assert_eq!(resp.evaluator_status, "fallback");

    let similarity = resp.body["similarity"].as_f64().unwrap();
    assert_eq!(
        resp.body["feedback"],
        evaluator::fallback_feedback(similarity)
    );
}

#[tokio::test]
async fn test_evaluate_with_empty_generation_uses_band_feedback() {
    let server = spawn_test_server(TestServerConfig::with_models(ModelMode::EmptyFeedback))
        .await
        .unwrap();
    let client = TestClient::new(server.url());

    let models = client.models().await.unwrap();
    assert!(models.llm_ready);

    let resp = client.evaluate(&paris()).await.unwrap();
    assert_eq!(resp.status, 200);
    assert_eq!(resp.evaluator_status, "fallback");

    let similarity = resp.body["similarity"].as_f64().unwrap();
    assert_eq!(
        resp.body["feedback"],
        evaluator::fallback_feedback(similarity)
    );
}

#[tokio::test]
async fn test_batch_isolates_broken_item() {
    let server = spawn_test_server(TestServerConfig::default()).await.unwrap();
    let client = TestClient::new(server.url());

    let requests = [
        paris(),
        EvaluationRequest::new(None, "Mitochondria produce ATP for the cell.", ""),
        EvaluationRequest::new(
            Some("At what temperature does water boil?"),
            "Water boils at 100 degrees Celsius at sea level.",
            "It boils at 100 degrees Celsius.",
        ),
    ];

    let resp = client.batch_evaluate(&requests).await.unwrap();
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body["success"], true);
    assert_eq!(resp.body["total"], 3);

    let results = resp.body["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["success"], true);
    assert_eq!(results[1]["success"], false);
    assert!(results[1]["error"].is_string());
    assert_eq!(results[2]["success"], true);
}

#[tokio::test]
async fn test_batch_rejects_bad_envelopes() {
    let server = spawn_test_server(TestServerConfig::default()).await.unwrap();
    let client = TestClient::new(server.url());

    let missing = client
        .post_json("/api/batch-evaluate", &json!({"items": []}))
        .await
        .unwrap();
    assert_eq!(missing.status, 400);
    assert_eq!(missing.body["error"], "Missing evaluations array");

    let not_array = client
        .post_json("/api/batch-evaluate", &json!({"evaluations": 7}))
        .await
        .unwrap();
    assert_eq!(not_array.status, 400);
    assert_eq!(not_array.body["error"], "evaluations must be an array");
}

#[tokio::test]
async fn test_unknown_endpoint_returns_json_404() {
    let server = spawn_test_server(TestServerConfig::default()).await.unwrap();
    let client = TestClient::new(server.url());

    let resp = client.get("/api/does-not-exist").await.unwrap();
    assert_eq!(resp.status, 404);
    assert_eq!(resp.body, json!({"error": "Endpoint not found"}));
}

#[tokio::test]
async fn test_concurrent_evaluations() {
    let server = spawn_test_server(TestServerConfig::default()).await.unwrap();
    let url = server.url();

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let url = url.clone();
            tokio::spawn(async move {
                let client = TestClient::new(url);
                client.evaluate(&paris()).await.unwrap()
            })
        })
        .collect();

    let mut similarities = Vec::new();
    for task in tasks {
        let resp = task.await.unwrap();
        assert_eq!(resp.status, 200);
        similarities.push(resp.body["similarity"].as_f64().unwrap());
    }

    assert!(similarities.windows(2).all(|w| w[0] == w[1]));
}

#[tokio::test]
async fn test_health_check_against_running_server() {
    let server = spawn_test_server(TestServerConfig::default()).await.unwrap();
    assert!(check_health(server.addr.port()).await);

    let idle_port = find_available_port().await.unwrap();
    assert!(!check_health(idle_port).await);
}
