//! Semantic similarity between a reference answer and a student answer.
//!
//! [`SimilarityScorer`] embeds both texts with a [`SentenceEmbedder`](crate::embedding::SentenceEmbedder),
//! takes their cosine similarity, clamps it to `[0, 1]` and derives the presentation
//! values in [`EvaluationMetrics`].

pub mod scorer;
pub mod types;


pub use scorer::{SimilarityScorer, cosine_similarity};
pub use types::EvaluationMetrics;
