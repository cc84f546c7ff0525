//! Natural-language feedback for student answers.
//!
//! [`FeedbackGenerator`] runs an instruction-tuned T5 model with sampled beam search. When
//! the model is unavailable or generation fails, [`FeedbackGenerator::generate_feedback`]
//! returns the score-band text from [`fallback`] instead, so callers always get feedback.

/// Beam search decoding.
pub mod beam;
/// Generator configuration.
pub mod config;
mod error;
/// Score-band fallback messages.
pub mod fallback;
mod generator;
/// Prompt construction.
pub mod prompt;
mod t5;


pub use beam::GenerationParams;
pub use config::FeedbackConfig;
pub use error::FeedbackError;
pub use fallback::fallback_feedback;
pub use generator::{Feedback, FeedbackGenerator, finish_feedback};
pub use prompt::build_prompt;
