use crate::constants::{GENERATION_MAX_INPUT_LEN, LLM_MODEL_ID};
use crate::embedding::ModelSource;
use crate::feedback::beam::GenerationParams;

#[derive(Debug, Clone)]
/// Configuration for [`FeedbackGenerator`](super::FeedbackGenerator).
pub struct FeedbackConfig {
    /// Where to load the model from. `None` leaves the generator unavailable.
    pub source: Option<ModelSource>,
    /// Prompt tokens beyond this are truncated.
    pub max_input_len: usize,
    pub generation: GenerationParams,
    /// Fixed RNG seed for sampling; `None` seeds from entropy.
    pub seed: Option<u64>,
    /// If true, return canned feedback without loading a model.
    pub testing_stub: bool,
    /// Fixed text returned by the stub. `None` derives the text from the prompt.
    pub stub_output: Option<String>,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            source: Some(ModelSource::Hub {
                repo_id: LLM_MODEL_ID.to_string(),
            }),
            max_input_len: GENERATION_MAX_INPUT_LEN,
            generation: GenerationParams::default(),
            seed: None,
            testing_stub: false,
            stub_output: None,
        }
    }
}

impl FeedbackConfig {
    /// Creates a config for an explicit model source.
    pub fn new(source: Option<ModelSource>) -> Self {
        Self {
            source,
            ..Default::default()
        }
    }

    /// Creates a stub config (no model files; canned feedback).
    pub fn stub() -> Self {
        Self {
            source: None,
            testing_stub: true,
            ..Default::default()
        }
    }

    /// Creates a stub config that always returns `output` as the raw model text.
    pub fn stub_with_output(output: impl Into<String>) -> Self {
        Self {
            stub_output: Some(output.into()),
            ..Self::stub()
        }
    }

    /// Creates a config with no model source; every request uses fallback feedback.
    pub fn unavailable() -> Self {
        Self {
            source: None,
            testing_stub: false,
            ..Default::default()
        }
    }
}
