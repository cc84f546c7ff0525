//! Beam search with optional sampling over a decoder step function.
//!
//! The step function receives the generated tokens of every live beam (without the decoder
//! start token) and returns one row of vocabulary logits per beam. Keeping the search
//! independent of the model lets it run against toy distributions in tests.

use rand::Rng;
use rand::seq::index::sample_weighted;

use crate::constants::{
    DEFAULT_MAX_NEW_TOKENS, DEFAULT_MIN_NEW_TOKENS, DEFAULT_NUM_BEAMS, DEFAULT_TEMPERATURE,
};

/// Decoding parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub num_beams: usize,
    pub temperature: f64,
    pub do_sample: bool,
    /// EOS is suppressed until this many tokens have been generated.
    pub min_new_tokens: usize,
    pub max_new_tokens: usize,
    /// Stop as soon as `num_beams` hypotheses have finished.
    pub early_stopping: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            num_beams: DEFAULT_NUM_BEAMS,
            temperature: DEFAULT_TEMPERATURE,
            do_sample: true,
            min_new_tokens: DEFAULT_MIN_NEW_TOKENS,
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
            early_stopping: true,
        }
    }
}

impl GenerationParams {
    /// Deterministic beam search (no sampling), mostly for tests.
    pub fn greedy_beams(num_beams: usize) -> Self {
        Self {
            num_beams,
            do_sample: false,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.num_beams == 0 {
            return Err("num_beams must be at least 1".to_string());
        }
        if !(self.temperature > 0.0 && self.temperature.is_finite()) {
            return Err(format!(
                "temperature must be positive, got {}",
                self.temperature
            ));
        }
        if self.min_new_tokens > self.max_new_tokens {
            return Err(format!(
                "min_new_tokens ({}) exceeds max_new_tokens ({})",
                self.min_new_tokens, self.max_new_tokens
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct Hypothesis {
    tokens: Vec<u32>,
    /// Sum of token log-probabilities.
    score: f32,
}

impl Hypothesis {
    fn normalized_score(&self) -> f32 {
        self.score / self.tokens.len().max(1) as f32
    }
}

/// Runs beam search and returns the best finished sequence (EOS excluded).
pub fn beam_search<R, F, E>(
    params: &GenerationParams,
    eos_token_id: u32,
    rng: &mut R,
    mut step: F,
) -> Result<Vec<u32>, E>
where
    R: Rng + ?Sized,
    F: FnMut(&[Vec<u32>]) -> Result<Vec<Vec<f32>>, E>,
{
    let num_beams = params.num_beams.max(1);
    let mut beams = vec![Hypothesis {
        tokens: Vec::new(),
        score: 0.0,
    }];
    let mut finished: Vec<Hypothesis> = Vec::new();

    for _ in 0..params.max_new_tokens {
        let sequences: Vec<Vec<u32>> = beams.iter().map(|b| b.tokens.clone()).collect();
        let logits = step(&sequences)?;

        let vocab = logits.first().map(Vec::len).unwrap_or(0);
        if vocab == 0 {
            break;
        }

        let mut scores: Vec<f32> = Vec::with_capacity(beams.len() * vocab);
        for (beam, row) in beams.iter().zip(&logits) {
            let mut log_probs = log_softmax(row);
            if beam.tokens.len() < params.min_new_tokens
                && let Some(eos) = log_probs.get_mut(eos_token_id as usize)
            {
                *eos = f32::NEG_INFINITY;
            }
            scores.extend(log_probs.iter().map(|lp| beam.score + lp));
        }

        let wanted = (2 * num_beams).min(scores.len());
        let mut picked = if params.do_sample {
            sample_candidates(&scores, params.temperature, wanted, rng)
        } else {
            top_candidates(&scores, wanted)
        };
        picked.sort_by(|a, b| scores[*b].total_cmp(&scores[*a]));

        let mut next = Vec::with_capacity(num_beams);
        for (rank, idx) in picked.into_iter().enumerate() {
            let score = scores[idx];
            if !score.is_finite() {
                continue;
            }

            let parent = &beams[idx / vocab];
            let token = (idx % vocab) as u32;

            if token == eos_token_id {
                if rank < num_beams {
                    finished.push(Hypothesis {
                        tokens: parent.tokens.clone(),
                        score,
                    });
                }
            } else {
                let mut tokens = parent.tokens.clone();
                tokens.push(token);
                next.push(Hypothesis { tokens, score });
            }

            if next.len() == num_beams {
                break;
            }
        }

        if params.early_stopping && finished.len() >= num_beams {
            return Ok(best_of(finished));
        }
        if next.is_empty() {
            break;
        }
        beams = next;
    }

    finished.extend(beams.into_iter().filter(|b| !b.tokens.is_empty()));
    Ok(best_of(finished))
}

fn best_of(hypotheses: Vec<Hypothesis>) -> Vec<u32> {
    hypotheses
        .into_iter()
        .max_by(|a, b| a.normalized_score().total_cmp(&b.normalized_score()))
        .map(|h| h.tokens)
        .unwrap_or_default()
}

fn log_softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if !max.is_finite() {
        return vec![f32::NEG_INFINITY; logits.len()];
    }
    let log_sum = logits.iter().map(|l| (l - max).exp()).sum::<f32>().ln();
    logits.iter().map(|l| l - max - log_sum).collect()
}

fn top_candidates(scores: &[f32], k: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..scores.len()).collect();
    indices.sort_by(|a, b| scores[*b].total_cmp(&scores[*a]));
    indices.truncate(k);
    indices
}

/// Samples `k` distinct candidates with probability `softmax(score / temperature)`.
fn sample_candidates<R: Rng + ?Sized>(
    scores: &[f32],
    temperature: f64,
    k: usize,
    rng: &mut R,
) -> Vec<usize> {
    let max = scores
        .iter()
        .copied()
        .filter(|s| s.is_finite())
        .fold(f32::NEG_INFINITY, f32::max);
    if !max.is_finite() {
        return Vec::new();
    }

    let weight = |i: usize| -> f64 {
        let s = scores[i];
        if s.is_finite() {
            (f64::from(s - max) / temperature).exp()
        } else {
            0.0
        }
    };

    let available = scores.iter().filter(|s| s.is_finite()).count();
    match sample_weighted(rng, scores.len(), weight, k.min(available)) {
        Ok(indices) => indices.into_vec(),
        Err(_) => top_candidates(scores, k),
    }
}
