use serde::Serialize;

use crate::constants::{SCORE_SCALE, round_to};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
/// Presentation values derived from a clamped similarity.
pub struct EvaluationMetrics {
    /// Similarity in `[0, 1]`, 4 decimals.
    pub semantic_similarity: f64,
    /// Similarity on the 0–5 scale, 2 decimals.
    pub score: f64,
    /// Similarity as a percentage, 1 decimal.
    pub percentage: f64,
}

impl EvaluationMetrics {
    /// Clamps `similarity` to `[0, 1]` and derives all three values from it.
    ///
    /// `NaN` is treated as zero similarity.
    pub fn from_similarity(similarity: f64) -> Self {
        let similarity = clamp_similarity(similarity);

        Self {
            semantic_similarity: round_to(similarity, 4),
            score: round_to(similarity * SCORE_SCALE, 2),
            percentage: round_to(similarity * 100.0, 1),
        }
    }
}

/// Clamps a raw cosine value into `[0, 1]`.
pub fn clamp_similarity(similarity: f64) -> f64 {
    if similarity.is_nan() {
        0.0
    } else {
        similarity.clamp(0.0, 1.0)
    }
}
