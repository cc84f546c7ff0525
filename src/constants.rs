//! Cross-cutting, shared constants.
//!
//! Model identifiers, validation thresholds and generation parameters are fixed for the
//! service; only bind address, port, debug mode and model locations come from the environment.

/// Hugging Face id of the sentence-embedding model.
pub const EMBEDDINGS_MODEL_ID: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Hugging Face id of the feedback generation model.
pub const LLM_MODEL_ID: &str = "google/flan-t5-base";

/// Output dimension of all-MiniLM-L6-v2.
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Max tokens fed to the sentence encoder (`max_seq_length` of all-MiniLM-L6-v2).
pub const EMBEDDING_MAX_SEQ_LEN: usize = 256;

/// Max prompt tokens fed to the T5 encoder.
pub const GENERATION_MAX_INPUT_LEN: usize = 512;

/// Minimum trimmed length (characters) of a model answer.
pub const MIN_MODEL_ANSWER_CHARS: usize = 10;

/// Minimum trimmed length (characters) of a student answer.
pub const MIN_STUDENT_ANSWER_CHARS: usize = 5;

/// Upper bound of the 0–N score scale.
pub const SCORE_SCALE: f64 = 5.0;

/// Generated feedback longer than this (in characters) is cut and suffixed with `...`.
pub const MAX_FEEDBACK_CHARS: usize = 500;

pub const DEFAULT_NUM_BEAMS: usize = 4;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MIN_NEW_TOKENS: usize = 50;
pub const DEFAULT_MAX_NEW_TOKENS: usize = 200;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 5000;

/// Rounds `value` to `decimals` places, ties away from zero.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
