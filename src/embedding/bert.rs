use candle::{DType, Device, Result, Tensor};
use candle_core as candle;
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};

use crate::embedding::utils::ModelFiles;

/// BERT encoder with attention-masked mean pooling (sentence-transformers layout).
#[derive(Clone)]
pub struct SentenceBert {
    model: std::sync::Arc<BertModel>,
    hidden_size: usize,
}

impl SentenceBert {
    pub fn load(files: &ModelFiles, device: &Device) -> Result<Self> {
        let config_content = std::fs::read_to_string(&files.config)?;
        let config: Config = serde_json::from_str(&config_content)
            .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[files.weights.clone()], DType::F32, device)?
        };

        let model = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("bert"), &config)?
        } else {
            BertModel::load(vb, &config)?
        };

        Ok(Self {
            model: std::sync::Arc::new(model),
            hidden_size: config.hidden_size,
        })
    }

    /// Returns the pooled sentence vector, shape `[hidden_size]`.
    pub fn forward_pooled(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: &Tensor,
    ) -> Result<Tensor> {
        // [1, seq_len, hidden]
        let hidden = self
            .model
            .forward(input_ids, token_type_ids, Some(attention_mask))?;

        let mask = attention_mask.to_dtype(DType::F32)?.unsqueeze(2)?;
        let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
        let counts = mask.sum(1)?.clamp(1e-9f32, f32::MAX)?;

        summed.broadcast_div(&counts)?.squeeze(0)
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }
}
