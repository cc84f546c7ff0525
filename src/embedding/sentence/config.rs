use crate::constants::{DEFAULT_EMBEDDING_DIM, EMBEDDING_MAX_SEQ_LEN, EMBEDDINGS_MODEL_ID};
use crate::embedding::utils::ModelSource;

#[derive(Debug, Clone)]
/// Configuration for [`SentenceEmbedder`](super::SentenceEmbedder).
pub struct SentenceConfig {
    /// Where to load the model from. `None` leaves the embedder unavailable.
    pub source: Option<ModelSource>,
    /// Max tokens to consider.
    pub max_seq_len: usize,
    /// Output dimension used by stub mode (real models report their own).
    pub embedding_dim: usize,
    /// If true, run in deterministic stub mode (no model files required).
    pub testing_stub: bool,
}

impl Default for SentenceConfig {
    fn default() -> Self {
        Self {
            source: Some(ModelSource::Hub {
                repo_id: EMBEDDINGS_MODEL_ID.to_string(),
            }),
            max_seq_len: EMBEDDING_MAX_SEQ_LEN,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            testing_stub: false,
        }
    }
}

impl SentenceConfig {
    /// Creates a config for an explicit model source.
    pub fn new(source: Option<ModelSource>) -> Self {
        Self {
            source,
            ..Default::default()
        }
    }

    /// Creates a stub config (no model files; word-overlap embeddings).
    pub fn stub() -> Self {
        Self {
            source: None,
            testing_stub: true,
            ..Default::default()
        }
    }

    /// Creates a config with no model source; the embedder will report not-ready.
    pub fn unavailable() -> Self {
        Self {
            source: None,
            testing_stub: false,
            ..Default::default()
        }
    }
}
