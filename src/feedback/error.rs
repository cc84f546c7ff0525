use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("failed to load feedback model: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("feedback model not loaded: {reason}")]
    ModelNotLoaded { reason: String },

    #[error("tokenization failed: {reason}")]
    TokenizationFailed { reason: String },

    #[error("feedback generation failed: {reason}")]
    GenerationFailed { reason: String },

    #[error("feedback model produced no text")]
    EmptyOutput,
}

impl From<candle_core::Error> for FeedbackError {
    fn from(err: candle_core::Error) -> Self {
        FeedbackError::GenerationFailed {
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for FeedbackError {
    fn from(err: std::io::Error) -> Self {
        FeedbackError::ModelLoadFailed {
            reason: err.to_string(),
        }
    }
}
