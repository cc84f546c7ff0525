//! HTTP gateway (Axum) for answer evaluation.

pub mod error;
pub mod handler;
pub mod health;
pub mod state;
pub mod status;


use std::any::Any;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::error;

pub use error::GatewayError;
pub use handler::{batch_evaluate_handler, evaluate_handler};
pub use health::{check_health, health_check_port};
pub use state::HandlerState;

use crate::constants::{EMBEDDINGS_MODEL_ID, LLM_MODEL_ID};
use status::{EVALUATOR_STATUS_HEADER, STATUS_HEALTHY};

pub fn create_router_with_state(state: HandlerState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/models", get(models_handler))
        .route("/api/evaluate", post(evaluate_handler))
        .route("/api/batch-evaluate", post(batch_evaluate_handler))
        .fallback(not_found_handler)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub embeddings_model_ready: bool,
    pub llm_model_ready: bool,
}

#[derive(serde::Serialize)]
pub struct ModelsResponse {
    pub embeddings_ready: bool,
    pub llm_ready: bool,
    pub embeddings_model: &'static str,
    pub llm_model: &'static str,
}

/// Always 200; readiness is reported in the body.
#[tracing::instrument(skip(state))]
pub async fn health_handler(State(state): State<HandlerState>) -> Response {
    let status = state.evaluator.status();

    let mut headers = HeaderMap::new();
    headers.insert(
        EVALUATOR_STATUS_HEADER,
        HeaderValue::from_static(STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse {
            status: "ok",
            embeddings_model_ready: status.embeddings_ready,
            llm_model_ready: status.llm_ready,
        }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn models_handler(State(state): State<HandlerState>) -> Response {
    let status = state.evaluator.status();

    (
        StatusCode::OK,
        Json(ModelsResponse {
            embeddings_ready: status.embeddings_ready,
            llm_ready: status.llm_ready,
            embeddings_model: EMBEDDINGS_MODEL_ID,
            llm_model: LLM_MODEL_ID,
        }),
    )
        .into_response()
}

pub async fn not_found_handler() -> GatewayError {
    GatewayError::NotFound
}

pub(crate) fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    error!(panic = %details, "Request handler panicked");
    GatewayError::InternalError(details).into_response()
}
