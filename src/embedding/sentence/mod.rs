//! Sentence embedder (BERT + mean pooling).
//!
//! Loading never aborts the process. A model that cannot be loaded leaves the embedder in
//! an unavailable state: [`SentenceEmbedder::is_ready`] reports `false` and every
//! [`SentenceEmbedder::embed`] call fails with [`EmbeddingError::ModelNotLoaded`].
//!
//! Use [`SentenceConfig::stub`] for tests without model files.

/// Sentence embedder configuration.
pub mod config;


pub use config::SentenceConfig;

use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::embedding::bert::SentenceBert;
use crate::embedding::device::select_device;
use crate::embedding::error::EmbeddingError;
use crate::embedding::utils::{ModelSource, load_tokenizer_with_truncation};

enum EmbedderBackend {
    Model {
        model: SentenceBert,
        tokenizer: Tokenizer,
        device: Device,
    },
    Stub,
    Unavailable {
        reason: String,
    },
}

/// Embedding generator for semantic similarity (supports stub mode).
pub struct SentenceEmbedder {
    backend: EmbedderBackend,
    config: SentenceConfig,
}

impl std::fmt::Debug for SentenceEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceEmbedder")
            .field(
                "backend",
                &match &self.backend {
                    EmbedderBackend::Model { device, .. } => format!("Model({:?})", device),
                    EmbedderBackend::Stub => "Stub".to_string(),
                    EmbedderBackend::Unavailable { reason } => format!("Unavailable({})", reason),
                },
            )
            .field("embedding_dim", &self.embedding_dim())
            .field("max_seq_len", &self.config.max_seq_len)
            .finish()
    }
}

impl SentenceEmbedder {
    /// Loads the embedder. Load failures are logged and yield an unavailable embedder.
    pub fn load(config: SentenceConfig) -> Self {
        if config.testing_stub {
            warn!("Sentence embedder running in STUB mode (testing only)");
            return Self {
                backend: EmbedderBackend::Stub,
                config,
            };
        }

        let Some(source) = config.source.clone() else {
            warn!("No embedding model source configured");
            return Self::unavailable(config, "no model source configured");
        };

        match Self::load_model(&source, config.max_seq_len) {
            Ok((model, tokenizer, device)) => {
                info!(
                    source = %source,
                    hidden_size = model.hidden_size(),
                    max_seq_len = config.max_seq_len,
                    "Sentence embedding model loaded"
                );
                Self {
                    backend: EmbedderBackend::Model {
                        model,
                        tokenizer,
                        device,
                    },
                    config,
                }
            }
            Err(e) => {
                warn!(source = %source, error = %e, "Error loading embedding model");
                Self::unavailable(config, e.to_string())
            }
        }
    }

    /// Creates an embedder that is permanently not ready.
    pub fn unavailable(config: SentenceConfig, reason: impl Into<String>) -> Self {
        Self {
            backend: EmbedderBackend::Unavailable {
                reason: reason.into(),
            },
            config,
        }
    }

    fn load_model(
        source: &ModelSource,
        max_seq_len: usize,
    ) -> Result<(SentenceBert, Tokenizer, Device), EmbeddingError> {
        let files = source.resolve()?;

        let device = select_device();
        debug!(?device, "Selected compute device for sentence embedder");

        let tokenizer = load_tokenizer_with_truncation(&files.tokenizer, max_seq_len).map_err(
            |e| EmbeddingError::TokenizationFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            },
        )?;

        let model =
            SentenceBert::load(&files, &device).map_err(|e| EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to load BERT model: {}", e),
            })?;

        Ok((model, tokenizer, device))
    }

    /// Generates an L2-normalised embedding for a single string.
    pub fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        match &self.backend {
            EmbedderBackend::Model {
                model,
                tokenizer,
                device,
            } => self.embed_with_model(text, model, tokenizer, device),
            EmbedderBackend::Stub => Ok(self.embed_stub(text)),
            EmbedderBackend::Unavailable { reason } => Err(EmbeddingError::ModelNotLoaded {
                reason: reason.clone(),
            }),
        }
    }

    /// Generates embeddings for a batch of strings.
    pub fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|text| self.embed(text)).collect()
    }

    fn embed_with_model(
        &self,
        text: &str,
        model: &SentenceBert,
        tokenizer: &Tokenizer,
        device: &Device,
    ) -> Result<Vec<f32>, EmbeddingError> {
        let encoding =
            tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        if encoding.get_ids().is_empty() {
            return Ok(vec![0.0; model.hidden_size()]);
        }

        debug!(
            text_len = text.len(),
            token_count = encoding.get_ids().len(),
            "Generating sentence embedding"
        );

        let input_ids = Tensor::new(encoding.get_ids(), device)?.unsqueeze(0)?;
        let type_ids = Tensor::new(encoding.get_type_ids(), device)?.unsqueeze(0)?;
        let attention_mask = Tensor::new(encoding.get_attention_mask(), device)?.unsqueeze(0)?;

        let pooled = model
            .forward_pooled(&input_ids, &type_ids, &attention_mask)
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("BERT forward pass failed: {}", e),
            })?
            .to_vec1::<f32>()?;

        Ok(normalize(pooled))
    }

    /// Hashed bag-of-words: texts sharing words get proportionally similar vectors.
    fn embed_stub(&self, text: &str) -> Vec<f32> {
        debug!(text_len = text.len(), "Generating stub embedding");

        let dim = self.config.embedding_dim.max(1);
        let mut embedding = vec![0.0f32; dim];

        let lowered = text.to_lowercase();
        for word in lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let hash = blake3::hash(word.as_bytes());
            let mut bucket = [0u8; 8];
            bucket.copy_from_slice(&hash.as_bytes()[..8]);
            let idx = (u64::from_le_bytes(bucket) % dim as u64) as usize;
            embedding[idx] += 1.0;
        }

        normalize(embedding)
    }

    /// Returns the output embedding dimension.
    pub fn embedding_dim(&self) -> usize {
        match &self.backend {
            EmbedderBackend::Model { model, .. } => model.hidden_size(),
            _ => self.config.embedding_dim,
        }
    }

    /// Returns `true` if embeddings can be produced (real model or stub).
    pub fn is_ready(&self) -> bool {
        !matches!(self.backend, EmbedderBackend::Unavailable { .. })
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EmbedderBackend::Stub)
    }

    /// Reason the model is unavailable, if it is.
    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.backend {
            EmbedderBackend::Unavailable { reason } => Some(reason),
            _ => None,
        }
    }

    /// Returns the embedder configuration.
    pub fn config(&self) -> &SentenceConfig {
        &self.config
    }
}

fn normalize(mut embedding: Vec<f32>) -> Vec<f32> {
    let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm > 0.0 {
        for x in &mut embedding {
            *x /= norm;
        }
    }

    embedding
}
