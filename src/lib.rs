//! Answer evaluator library crate (used by the server binary and integration tests).
//!
//! # Public API Surface
//!
//! ## Evaluation
//! - [`Evaluator`] - owns both models; validates and evaluates requests
//! - [`EvaluationRequest`], [`EvaluationResult`], [`BatchResponse`] - request/response types
//!
//! ## Similarity
//! - [`SentenceEmbedder`], [`SentenceConfig`] - sentence embeddings (BERT, mean pooling)
//! - [`SimilarityScorer`], [`EvaluationMetrics`] - cosine similarity and derived scores
//!
//! ## Feedback
//! - [`FeedbackGenerator`], [`FeedbackConfig`] - T5 feedback generation
//! - [`Feedback`] - generated or fallback feedback
//! - [`fallback_feedback`] - score-band messages
//!
//! ## HTTP
//! - [`gateway::create_router_with_state`], [`HandlerState`] - Axum router
//!
//! ## Test Support
//! Every model has a stub backend (`SentenceConfig::stub`, `FeedbackConfig::stub`,
//! [`Evaluator::stub`]) that needs no model files.

pub mod config;
pub mod constants;
pub mod embedding;
pub mod evaluation;
pub mod feedback;
pub mod gateway;
pub mod similarity;

pub use config::{Config, ConfigError};
pub use embedding::{EmbeddingError, ModelSource, SentenceConfig, SentenceEmbedder};
pub use evaluation::{
    BatchItem, BatchResponse, EvaluationError, EvaluationRequest, EvaluationResult, Evaluator,
    ModelStatus,
};
pub use feedback::{
    Feedback, FeedbackConfig, FeedbackError, FeedbackGenerator, GenerationParams,
    fallback_feedback,
};
pub use gateway::{GatewayError, HandlerState};
pub use similarity::{EvaluationMetrics, SimilarityScorer, cosine_similarity};
