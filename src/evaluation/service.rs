use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::embedding::{SentenceConfig, SentenceEmbedder};
use crate::evaluation::error::EvaluationError;
use crate::evaluation::types::{
    BatchItem, BatchResponse, EvaluationRequest, EvaluationResult, ItemFailure, ModelStatus,
};
use crate::feedback::{FeedbackConfig, FeedbackGenerator};
use crate::similarity::SimilarityScorer;

/// Owns both models and runs evaluations against them.
///
/// All methods are blocking; async callers should run them on the blocking pool.
#[derive(Debug)]
pub struct Evaluator {
    scorer: SimilarityScorer,
    feedback: FeedbackGenerator,
}

impl Evaluator {
    pub fn new(scorer: SimilarityScorer, feedback: FeedbackGenerator) -> Self {
        Self { scorer, feedback }
    }

    /// Loads both models as configured. Blocks while downloading and loading weights.
    pub fn from_config(config: &Config) -> Self {
        let scorer = SimilarityScorer::new(SentenceEmbedder::load(SentenceConfig::new(
            config.embedding_source(),
        )));
        let feedback = FeedbackGenerator::load(FeedbackConfig::new(config.feedback_source()));

        let evaluator = Self::new(scorer, feedback);
        let status = evaluator.status();
        info!(
            embeddings_ready = status.embeddings_ready,
            llm_ready = status.llm_ready,
            "Models initialized"
        );
        evaluator
    }

    /// Both models in stub mode (no model files).
    pub fn stub() -> Self {
        Self::new(
            SimilarityScorer::new(SentenceEmbedder::load(SentenceConfig::stub())),
            FeedbackGenerator::load(FeedbackConfig::stub()),
        )
    }

    /// Neither model loaded.
    pub fn unavailable(reason: &str) -> Self {
        Self::new(
            SimilarityScorer::new(SentenceEmbedder::unavailable(
                SentenceConfig::unavailable(),
                reason,
            )),
            FeedbackGenerator::unavailable(FeedbackConfig::unavailable(), reason),
        )
    }

    pub fn status(&self) -> ModelStatus {
        ModelStatus {
            embeddings_ready: self.scorer.is_ready(),
            llm_ready: self.feedback.is_ready(),
        }
    }

    /// Validates and evaluates one request.
    pub fn evaluate(&self, request: &EvaluationRequest) -> Result<EvaluationResult, EvaluationError> {
        debug!(
            question_len = request.question().map_or(0, |q| q.chars().count()),
            model_len = request.model_answer.chars().count(),
            student_len = request.student_answer.chars().count(),
            "Processing evaluation request"
        );

        request.validate()?;

        let model_answer = request.model_answer.trim();
        let student_answer = request.student_answer.trim();

        let (similarity, metrics) = self.scorer.compute_similarity(model_answer, student_answer)?;

        let feedback = self.feedback.generate_feedback(
            request.question(),
            model_answer,
            student_answer,
            similarity,
        );

        info!(
            score = metrics.score,
            similarity = metrics.semantic_similarity,
            fallback = feedback.is_fallback(),
            "Evaluation complete"
        );

        Ok(EvaluationResult::new(metrics, feedback))
    }

    /// Evaluates a raw JSON item (field extraction, validation, evaluation).
    pub fn evaluate_json(&self, item: &Value) -> Result<EvaluationResult, EvaluationError> {
        let request = EvaluationRequest::from_json(item)?;
        self.evaluate(&request)
    }

    /// Evaluates items in order. A failing item yields a failure slot and does not stop the batch.
    pub fn evaluate_batch(&self, items: &[Value]) -> BatchResponse {
        debug!(total = items.len(), "Starting batch evaluation");

        let results: Vec<BatchItem> = items
            .iter()
            .enumerate()
            .map(|(index, item)| match self.evaluate_json(item) {
                Ok(result) => BatchItem::Evaluated(result),
                Err(e) => {
                    if e.is_client_error() {
                        debug!(index, error = %e, "Rejected batch item");
                    } else {
                        warn!(index, error = %e, "Error evaluating batch item");
                    }
                    BatchItem::Failed(ItemFailure::new(e.item_message()))
                }
            })
            .collect();

        let succeeded = results.iter().filter(|r| r.is_success()).count();
        info!(total = items.len(), succeeded, "Batch evaluation complete");

        BatchResponse {
            success: true,
            total: items.len(),
            results,
        }
    }
}

/// Extracts the single-evaluation request from a request body.
pub fn parse_single(body: &Value) -> Result<EvaluationRequest, EvaluationError> {
    match body {
        Value::Object(map) if !map.is_empty() => EvaluationRequest::from_json(body),
        _ => Err(EvaluationError::NoData),
    }
}

/// Extracts the `evaluations` array from a batch request body.
pub fn parse_batch(body: &Value) -> Result<&[Value], EvaluationError> {
    let evaluations = body
        .as_object()
        .and_then(|map| map.get("evaluations"))
        .ok_or(EvaluationError::MissingEvaluations)?;

    evaluations
        .as_array()
        .map(Vec::as_slice)
        .ok_or(EvaluationError::EvaluationsNotArray)
}
