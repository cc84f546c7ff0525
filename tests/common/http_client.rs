//! HTTP client helpers for tests.

use evaluator::evaluation::EvaluationRequest;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

/// Status, `X-Evaluator-Status` header and JSON body of a response.
#[derive(Debug)]
pub struct JsonResponse {
    pub status: u16,
    pub evaluator_status: String,
    pub body: Value,
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    async fn into_json(resp: reqwest::Response) -> Result<JsonResponse, TestClientError> {
        let status = resp.status().as_u16();
        let evaluator_status = resp
            .headers()
            .get("x-evaluator-status")
            .and_then(|h| h.to_str().ok())
            .unwrap_or("unknown")
            .to_string();
        let body = resp.json().await?;

        Ok(JsonResponse {
            status,
            evaluator_status,
            body,
        })
    }

    pub async fn get(&self, path: &str) -> Result<JsonResponse, TestClientError> {
        let resp = self.client.get(self.url(path)).send().await?;
        Self::into_json(resp).await
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> Result<JsonResponse, TestClientError> {
        let resp = self
            .client
            .post(self.url(path))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;
        Self::into_json(resp).await
    }

    pub async fn post_raw(&self, path: &str, body: &'static str) -> Result<JsonResponse, TestClientError> {
        let resp = self
            .client
            .post(self.url(path))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;
        Self::into_json(resp).await
    }

    pub async fn health(&self) -> Result<HealthResponse, TestClientError> {
        let resp = self.get("/health").await?;
        Self::expect_ok(resp)
    }

    pub async fn models(&self) -> Result<ModelsResponse, TestClientError> {
        let resp = self.get("/api/models").await?;
        Self::expect_ok(resp)
    }

    pub async fn evaluate(&self, request: &EvaluationRequest) -> Result<JsonResponse, TestClientError> {
        let body = serde_json::to_value(request)?;
        self.post_json("/api/evaluate", &body).await
    }

    pub async fn batch_evaluate(
        &self,
        requests: &[EvaluationRequest],
    ) -> Result<JsonResponse, TestClientError> {
        let body = json!({ "evaluations": requests });
        self.post_json("/api/batch-evaluate", &body).await
    }

    fn expect_ok<T: serde::de::DeserializeOwned>(resp: JsonResponse) -> Result<T, TestClientError> {
        if resp.status == 200 {
            Ok(serde_json::from_value(resp.body)?)
        } else {
            Err(TestClientError::UnexpectedStatus(
                resp.status,
                resp.body.to_string(),
            ))
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub embeddings_model_ready: bool,
    pub llm_model_ready: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelsResponse {
    pub embeddings_ready: bool,
    pub llm_ready: bool,
    pub embeddings_model: String,
    pub llm_model: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TestClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Unexpected HTTP status: {0} - Body: {1}")]
    UnexpectedStatus(u16, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_url_building() {
        let client = TestClient::new("http://localhost:5000");
        assert_eq!(client.url("/health"), "http://localhost:5000/health");
        assert_eq!(client.url("health"), "http://localhost:5000/health");
    }
}
