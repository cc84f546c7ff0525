use serde::Serialize;
use serde_json::{Map, Value};

use crate::constants::{MIN_MODEL_ANSWER_CHARS, MIN_STUDENT_ANSWER_CHARS};
use crate::evaluation::error::EvaluationError;
use crate::feedback::Feedback;
use crate::similarity::EvaluationMetrics;

/// One answer to grade. Answers and question are stored trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    pub model_answer: String,
    pub student_answer: String,
}

impl EvaluationRequest {
    pub fn new(
        question: Option<&str>,
        model_answer: impl Into<String>,
        student_answer: impl Into<String>,
    ) -> Self {
        Self {
            question: question.map(str::to_string),
            model_answer: model_answer.into(),
            student_answer: student_answer.into(),
        }
    }

    /// Reads the request fields from a JSON object. Absent or `null` fields read as empty.
    pub fn from_json(value: &Value) -> Result<Self, EvaluationError> {
        let Value::Object(map) = value else {
            return Err(EvaluationError::NotAnObject);
        };

        let question = string_field(map, "question")?;
        Ok(Self {
            question: (!question.is_empty()).then_some(question),
            model_answer: string_field(map, "modelAnswer")?,
            student_answer: string_field(map, "studentAnswer")?,
        })
    }

    /// Checks presence first, then minimum lengths (counted in characters).
    pub fn validate(&self) -> Result<(), EvaluationError> {
        let model_answer = self.model_answer.trim();
        let student_answer = self.student_answer.trim();

        if model_answer.is_empty() || student_answer.is_empty() {
            return Err(EvaluationError::MissingFields);
        }

        if model_answer.chars().count() < MIN_MODEL_ANSWER_CHARS
            || student_answer.chars().count() < MIN_STUDENT_ANSWER_CHARS
        {
            return Err(EvaluationError::AnswerTooShort);
        }

        Ok(())
    }

    pub fn question(&self) -> Option<&str> {
        self.question.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

fn string_field(map: &Map<String, Value>, field: &'static str) -> Result<String, EvaluationError> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(_) => Err(EvaluationError::InvalidField { field }),
    }
}

/// Successful evaluation, serialised as the public response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationResult {
    pub success: bool,
    pub score: f64,
    pub similarity: f64,
    pub similarity_percentage: f64,
    pub feedback: String,
    #[serde(skip)]
    pub used_fallback: bool,
}

impl EvaluationResult {
    pub fn new(metrics: EvaluationMetrics, feedback: Feedback) -> Self {
        Self {
            success: true,
            score: metrics.score,
            similarity: metrics.semantic_similarity,
            similarity_percentage: metrics.percentage,
            used_fallback: feedback.is_fallback(),
            feedback: feedback.into_text(),
        }
    }
}

/// Failed batch item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    pub success: bool,
    pub error: String,
}

impl ItemFailure {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BatchItem {
    Evaluated(EvaluationResult),
    Failed(ItemFailure),
}

impl BatchItem {
    pub fn is_success(&self) -> bool {
        matches!(self, BatchItem::Evaluated(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResponse {
    pub success: bool,
    pub total: usize,
    pub results: Vec<BatchItem>,
}

/// Readiness of both models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelStatus {
    pub embeddings_ready: bool,
    pub llm_ready: bool,
}
