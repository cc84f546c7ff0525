use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::constants::MAX_FEEDBACK_CHARS;
use crate::embedding::ModelSource;
use crate::embedding::device::select_device;
use crate::embedding::utils::load_tokenizer_with_truncation;
use crate::feedback::config::FeedbackConfig;
use crate::feedback::error::FeedbackError;
use crate::feedback::fallback::fallback_feedback;
use crate::feedback::prompt::build_prompt;
use crate::feedback::t5::FeedbackT5;

/// Feedback text and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    /// Produced by the feedback model.
    Generated(String),
    /// Score-band text, used because generation was unavailable or failed.
    Fallback { text: String, reason: String },
}

impl Feedback {
    pub fn text(&self) -> &str {
        match self {
            Feedback::Generated(text) => text,
            Feedback::Fallback { text, .. } => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Feedback::Generated(text) => text,
            Feedback::Fallback { text, .. } => text,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Feedback::Fallback { .. })
    }
}

struct ModelState {
    model: FeedbackT5,
    rng: StdRng,
}

enum GeneratorBackend {
    Model {
        state: Mutex<ModelState>,
        tokenizer: Tokenizer,
    },
    Stub,
    Unavailable {
        reason: String,
    },
}

/// Seq2seq feedback generator (supports stub mode).
///
/// Generation is serialised through a mutex; the decoder mutates internal state.
pub struct FeedbackGenerator {
    backend: GeneratorBackend,
    config: FeedbackConfig,
}

impl std::fmt::Debug for FeedbackGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackGenerator")
            .field(
                "backend",
                &match &self.backend {
                    GeneratorBackend::Model { .. } => "Model".to_string(),
                    GeneratorBackend::Stub => "Stub".to_string(),
                    GeneratorBackend::Unavailable { reason } => {
                        format!("Unavailable({})", reason)
                    }
                },
            )
            .field("max_input_len", &self.config.max_input_len)
            .field("generation", &self.config.generation)
            .finish()
    }
}

impl FeedbackGenerator {
    /// Loads the generator. Load failures are logged and yield an unavailable generator.
    pub fn load(config: FeedbackConfig) -> Self {
        if config.testing_stub {
            warn!("Feedback generator running in STUB mode (testing only)");
            return Self {
                backend: GeneratorBackend::Stub,
                config,
            };
        }

        if let Err(reason) = config.generation.validate() {
            warn!(%reason, "Invalid generation parameters");
            return Self::unavailable(config, reason);
        }

        let Some(source) = config.source.clone() else {
            warn!("No feedback model source configured");
            return Self::unavailable(config, "no model source configured");
        };

        match Self::load_model(&source, config.max_input_len) {
            Ok((model, tokenizer)) => {
                info!(
                    source = %source,
                    num_beams = config.generation.num_beams,
                    max_new_tokens = config.generation.max_new_tokens,
                    "Feedback model loaded"
                );
                let rng = match config.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                Self {
                    backend: GeneratorBackend::Model {
                        state: Mutex::new(ModelState { model, rng }),
                        tokenizer,
                    },
                    config,
                }
            }
            Err(e) => {
                warn!(source = %source, error = %e, "Error loading feedback model");
                Self::unavailable(config, e.to_string())
            }
        }
    }

    /// Creates a generator that is permanently not ready.
    pub fn unavailable(config: FeedbackConfig, reason: impl Into<String>) -> Self {
        Self {
            backend: GeneratorBackend::Unavailable {
                reason: reason.into(),
            },
            config,
        }
    }

    fn load_model(
        source: &ModelSource,
        max_input_len: usize,
    ) -> Result<(FeedbackT5, Tokenizer), FeedbackError> {
        let files = source.resolve()?;

        let device = select_device();
        debug!(?device, "Selected compute device for feedback generator");

        let tokenizer = load_tokenizer_with_truncation(&files.tokenizer, max_input_len).map_err(
            |e| FeedbackError::TokenizationFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            },
        )?;

        let model = FeedbackT5::load(&files, &device).map_err(|e| {
            FeedbackError::ModelLoadFailed {
                reason: format!("Failed to load T5 model: {}", e),
            }
        })?;

        Ok((model, tokenizer))
    }

    /// Runs the model on a prompt and returns cleaned-up feedback text.
    pub fn generate(&self, prompt: &str) -> Result<String, FeedbackError> {
        let raw = match &self.backend {
            GeneratorBackend::Model { state, tokenizer } => {
                self.generate_with_model(prompt, state, tokenizer)?
            }
            GeneratorBackend::Stub => match &self.config.stub_output {
                Some(output) => output.clone(),
                None => stub_output(prompt),
            },
            GeneratorBackend::Unavailable { reason } => {
                return Err(FeedbackError::ModelNotLoaded {
                    reason: reason.clone(),
                });
            }
        };

        finish_feedback(&raw)
    }

    fn generate_with_model(
        &self,
        prompt: &str,
        state: &Mutex<ModelState>,
        tokenizer: &Tokenizer,
    ) -> Result<String, FeedbackError> {
        let encoding =
            tokenizer
                .encode(prompt, true)
                .map_err(|e| FeedbackError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        debug!(
            prompt_len = prompt.len(),
            token_count = encoding.get_ids().len(),
            "Generating feedback"
        );

        let output_ids = {
            let mut guard = state.lock();
            let ModelState { model, rng } = &mut *guard;
            model.generate(encoding.get_ids(), &self.config.generation, rng)?
        };

        debug!(output_tokens = output_ids.len(), "Feedback generation finished");

        tokenizer
            .decode(&output_ids, true)
            .map_err(|e| FeedbackError::GenerationFailed {
                reason: format!("Failed to decode output: {}", e),
            })
    }

    /// Builds the prompt, generates, and falls back to score-band text on any failure.
    pub fn generate_feedback(
        &self,
        question: Option<&str>,
        model_answer: &str,
        student_answer: &str,
        similarity: f64,
    ) -> Feedback {
        let prompt = build_prompt(question, model_answer, student_answer);

        match self.generate(&prompt) {
            Ok(text) => Feedback::Generated(text),
            Err(e) => {
                let reason = e.to_string();
                if self.is_ready() {
                    warn!(error = %reason, "Feedback generation failed, using fallback");
                } else {
                    debug!(error = %reason, "Feedback model not ready, using fallback");
                }
                Feedback::Fallback {
                    text: fallback_feedback(similarity).to_string(),
                    reason,
                }
            }
        }
    }

    /// Returns `true` if feedback can be generated (real model or stub).
    pub fn is_ready(&self) -> bool {
        !matches!(self.backend, GeneratorBackend::Unavailable { .. })
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, GeneratorBackend::Stub)
    }

    /// Reason the model is unavailable, if it is.
    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.backend {
            GeneratorBackend::Unavailable { reason } => Some(reason),
            _ => None,
        }
    }

    pub fn config(&self) -> &FeedbackConfig {
        &self.config
    }
}

/// Trims model output and caps it at [`MAX_FEEDBACK_CHARS`] characters plus an ellipsis.
pub fn finish_feedback(raw: &str) -> Result<String, FeedbackError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FeedbackError::EmptyOutput);
    }

    match trimmed.char_indices().nth(MAX_FEEDBACK_CHARS) {
        Some((cut, _)) => Ok(format!("{}...", &trimmed[..cut])),
        None => Ok(trimmed.to_string()),
    }
}

fn stub_output(prompt: &str) -> String {
    let digest = blake3::hash(prompt.as_bytes()).to_hex();
    format!(
        "Mock feedback {}: compare your answer with the reference and cover its key concepts.",
        &digest.as_str()[..8]
    )
}
