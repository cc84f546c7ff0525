//! Embedding + model utilities.
//!
//! - [`sentence`] provides sentence embeddings used by [`crate::similarity`].
//! - [`utils`] resolves model files (local directory or Hugging Face Hub) and tokenizers,
//!   and is shared with [`crate::feedback`].

/// BERT encoder with mean pooling.
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
/// Sentence embedder.
pub mod sentence;
/// Tokenizer/model loading helpers.
pub mod utils;

pub use error::EmbeddingError;
pub use sentence::{SentenceConfig, SentenceEmbedder};
pub use utils::{ModelFiles, ModelSource};
