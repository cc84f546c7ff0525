use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::{debug, error, instrument};
use uuid::Uuid;

use crate::evaluation::{parse_batch, parse_single};
use crate::gateway::error::GatewayError;
use crate::gateway::state::HandlerState;
use crate::gateway::status::{
    EVALUATOR_STATUS_HEADER, STATUS_BATCH, STATUS_FALLBACK, STATUS_GENERATED,
};

/// Parses a request body. Anything that is not valid JSON reads as `null`.
pub(crate) fn parse_body(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap_or_else(|e| {
        debug!(error = %e, "Request body is not valid JSON");
        Value::Null
    })
}

fn status_headers(status: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(EVALUATOR_STATUS_HEADER, HeaderValue::from_static(status));
    headers
}

#[instrument(skip(state, body), fields(request_id = %Uuid::new_v4(), body_len = body.len()))]
pub async fn evaluate_handler(
    State(state): State<HandlerState>,
    body: Bytes,
) -> Result<Response, GatewayError> {
    let request = parse_single(&parse_body(&body)).map_err(GatewayError::from_evaluation)?;

    let evaluator = state.evaluator.clone();
    let result = tokio::task::spawn_blocking(move || evaluator.evaluate(&request))
        .await
        .map_err(|e| {
            error!(error = %e, "Evaluation task failed");
            GatewayError::EvaluationFailed(e.to_string())
        })?
        .map_err(|e| {
            if !e.is_client_error() {
                error!(error = %e, "Error in /api/evaluate");
            }
            GatewayError::from_evaluation(e)
        })?;

    let source = if result.used_fallback {
        STATUS_FALLBACK
    } else {
        STATUS_GENERATED
    };

    Ok((StatusCode::OK, status_headers(source), Json(result)).into_response())
}

#[instrument(skip(state, body), fields(request_id = %Uuid::new_v4(), body_len = body.len()))]
pub async fn batch_evaluate_handler(
    State(state): State<HandlerState>,
    body: Bytes,
) -> Result<Response, GatewayError> {
    let value = parse_body(&body);
    let items = parse_batch(&value)
        .map_err(GatewayError::from_evaluation)?
        .to_vec();

    let evaluator = state.evaluator.clone();
    let response = tokio::task::spawn_blocking(move || evaluator.evaluate_batch(&items))
        .await
        .map_err(|e| {
            error!(error = %e, "Error in /api/batch-evaluate");
            GatewayError::BatchFailed(e.to_string())
        })?;

    Ok((StatusCode::OK, status_headers(STATUS_BATCH), Json(response)).into_response())
}
