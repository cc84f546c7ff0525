use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::evaluation::EvaluationError;
use crate::gateway::status::{
    EVALUATOR_STATUS_HEADER, STATUS_EVALUATION_ERROR, STATUS_INTERNAL_ERROR,
    STATUS_INVALID_REQUEST, STATUS_NOT_FOUND,
};

pub const EVALUATION_FAILED_MESSAGE: &str = "Failed to process evaluation";
pub const BATCH_FAILED_MESSAGE: &str = "Failed to process batch evaluation";
pub const NOT_FOUND_MESSAGE: &str = "Endpoint not found";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("batch evaluation failed: {0}")]
    BatchFailed(String),

    #[error("endpoint not found")]
    NotFound,

    #[error("internal error: {0}")]
    InternalError(String),
}

impl GatewayError {
    /// Request problems become 400s; everything else is a failed evaluation.
    pub fn from_evaluation(err: EvaluationError) -> Self {
        if err.is_client_error() {
            GatewayError::InvalidRequest(err.to_string())
        } else {
            GatewayError::EvaluationFailed(err.to_string())
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotFound => StatusCode::NOT_FOUND,
            GatewayError::EvaluationFailed(_)
            | GatewayError::BatchFailed(_)
            | GatewayError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (body, evaluator_status) = match &self {
            GatewayError::InvalidRequest(message) => {
                (json!({ "error": message }), STATUS_INVALID_REQUEST)
            }
            GatewayError::EvaluationFailed(details) => (
                json!({
                    "success": false,
                    "error": EVALUATION_FAILED_MESSAGE,
                    "details": details,
                }),
                STATUS_EVALUATION_ERROR,
            ),
            GatewayError::BatchFailed(details) => (
                json!({
                    "success": false,
                    "error": BATCH_FAILED_MESSAGE,
                    "details": details,
                }),
                STATUS_EVALUATION_ERROR,
            ),
            GatewayError::NotFound => (json!({ "error": NOT_FOUND_MESSAGE }), STATUS_NOT_FOUND),
            GatewayError::InternalError(_) => (
                json!({ "error": INTERNAL_ERROR_MESSAGE }),
                STATUS_INTERNAL_ERROR,
            ),
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            EVALUATOR_STATUS_HEADER,
            HeaderValue::from_static(evaluator_status),
        );

        (status, headers, Json(body)).into_response()
    }
}
