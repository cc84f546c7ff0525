use tracing::debug;

use crate::embedding::{EmbeddingError, SentenceEmbedder};

use super::types::{EvaluationMetrics, clamp_similarity};

/// Cosine similarity of two vectors. Zero-norm inputs give `0.0`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, EmbeddingError> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|y| y * y).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot / (norm_a * norm_b))
}

pub struct SimilarityScorer {
    embedder: SentenceEmbedder,
}

impl std::fmt::Debug for SimilarityScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimilarityScorer")
            .field("embedder", &self.embedder)
            .finish()
    }
}

impl SimilarityScorer {
    pub fn new(embedder: SentenceEmbedder) -> Self {
        Self { embedder }
    }

    pub fn is_ready(&self) -> bool {
        self.embedder.is_ready()
    }

    /// Returns the clamped (unrounded) similarity and its derived metrics.
    ///
    /// Fails with [`EmbeddingError::ModelNotLoaded`] when the embedder is unavailable.
    pub fn compute_similarity(
        &self,
        text1: &str,
        text2: &str,
    ) -> Result<(f64, EvaluationMetrics), EmbeddingError> {
        let embeddings = self.embedder.embed_batch(&[text1, text2])?;
        let raw = cosine_similarity(&embeddings[0], &embeddings[1])?;

        let similarity = clamp_similarity(f64::from(raw));
        let metrics = EvaluationMetrics::from_similarity(similarity);

        debug!(
            raw = raw,
            similarity = metrics.semantic_similarity,
            score = metrics.score,
            "Computed semantic similarity"
        );

        Ok((similarity, metrics))
    }
}
