//! Request validation and evaluation orchestration.
//!
//! [`Evaluator`] is the application context: it owns the similarity scorer and the feedback
//! generator, and is shared (behind an `Arc`) by every request handler.

mod error;
mod service;
mod types;


pub use error::EvaluationError;
pub use service::{Evaluator, parse_batch, parse_single};
pub use types::{
    BatchItem, BatchResponse, EvaluationRequest, EvaluationResult, ItemFailure, ModelStatus,
};
