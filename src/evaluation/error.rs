use thiserror::Error;

use crate::embedding::EmbeddingError;

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("No JSON data provided")]
    NoData,

    #[error("Missing required fields: modelAnswer and studentAnswer")]
    MissingFields,

    #[error("Answers must be at least 5-10 characters long")]
    AnswerTooShort,

    #[error("{field} must be a string")]
    InvalidField { field: &'static str },

    #[error("evaluation item must be a JSON object")]
    NotAnObject,

    #[error("Missing evaluations array")]
    MissingEvaluations,

    #[error("evaluations must be an array")]
    EvaluationsNotArray,

    #[error(transparent)]
    Similarity(#[from] EmbeddingError),
}

impl EvaluationError {
    /// `true` for errors caused by the request rather than the service.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, EvaluationError::Similarity(_))
    }

    /// Message reported for a failed batch item.
    pub fn item_message(&self) -> String {
        match self {
            EvaluationError::MissingFields => "Missing required fields".to_string(),
            other => other.to_string(),
        }
    }
}
