//! Score-band feedback used whenever generated feedback is unavailable.

/// Message for scores outside every band.
pub const DEFAULT_FALLBACK: &str = "Please review your answer and try again.";

/// Inclusive score ranges (0-100) and their messages.
pub const FALLBACK_BANDS: [(u8, u8, &str); 7] = [
    (
        90,
        100,
        "Excellent answer! Your response demonstrates comprehensive understanding of the key concepts. Well-structured and complete.",
    ),
    (
        80,
        89,
        "Very good answer with strong understanding of the main points. Consider adding more specific examples or technical details for improvement.",
    ),
    (
        70,
        79,
        "Good answer covering most key concepts. You could enhance it by including more specific details or examples mentioned in the reference answer.",
    ),
    (
        60,
        69,
        "Your answer captures the basic idea but lacks some important details. Review the key concepts and try to include more specific information.",
    ),
    (
        50,
        59,
        "Your answer shows partial understanding but is missing significant details. Consider reviewing the reference answer and incorporating more key concepts.",
    ),
    (
        40,
        49,
        "Your answer addresses some concepts but needs substantial improvement. Focus on understanding the core concepts better.",
    ),
    (
        0,
        39,
        "Your answer needs significant revision. Please review the key concepts thoroughly and practice similar questions.",
    ),
];

/// Converts a similarity to the 0-100 band score (ties round to even).
pub fn band_score(similarity: f64) -> f64 {
    (similarity * 100.0).round_ties_even()
}

/// Picks the band message for a similarity in `[0, 1]`.
pub fn fallback_feedback(similarity: f64) -> &'static str {
    let score = band_score(similarity);

    FALLBACK_BANDS
        .iter()
        .find(|(low, high, _)| f64::from(*low) <= score && score <= f64::from(*high))
        .map(|(_, _, message)| *message)
        .unwrap_or(DEFAULT_FALLBACK)
}
