use candle::{DType, Device, Result, Tensor};
use candle_core as candle;
use candle_nn::VarBuilder;
use candle_transformers::models::t5::{Config, T5ForConditionalGeneration};
use rand::Rng;

use crate::embedding::ModelFiles;
use crate::feedback::beam::{GenerationParams, beam_search};

/// T5 encoder-decoder driven by [`beam_search`].
///
/// The decoder KV cache is disabled: beams are reordered between steps, so every step
/// re-runs the decoder over the full prefix of each beam.
pub struct FeedbackT5 {
    model: T5ForConditionalGeneration,
    decoder_start_token_id: u32,
    eos_token_id: u32,
    device: Device,
}

impl FeedbackT5 {
    pub fn load(files: &ModelFiles, device: &Device) -> Result<Self> {
        let config_content = std::fs::read_to_string(&files.config)?;
        let mut config: Config = serde_json::from_str(&config_content)
            .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))?;
        config.use_cache = false;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[files.weights.clone()], DType::F32, device)?
        };
        let model = T5ForConditionalGeneration::load(vb, &config)?;

        Ok(Self {
            model,
            decoder_start_token_id: config.decoder_start_token_id.unwrap_or(config.pad_token_id)
                as u32,
            eos_token_id: config.eos_token_id as u32,
            device: device.clone(),
        })
    }

    /// Generates output token ids for one prompt (EOS and start token excluded).
    pub fn generate<R: Rng + ?Sized>(
        &mut self,
        input_ids: &[u32],
        params: &GenerationParams,
        rng: &mut R,
    ) -> Result<Vec<u32>> {
        self.model.clear_kv_cache();

        let input = Tensor::new(input_ids, &self.device)?.unsqueeze(0)?;
        let encoder_output = self.model.encode(&input)?;
        let (_, enc_len, d_model) = encoder_output.dims3()?;

        let Self {
            model,
            decoder_start_token_id,
            eos_token_id,
            device,
        } = self;
        let start = *decoder_start_token_id;

        beam_search(params, *eos_token_id, rng, |beams: &[Vec<u32>]| {
            let batch = beams.len();
            let seq_len = beams.first().map(Vec::len).unwrap_or(0) + 1;

            let mut flat = Vec::with_capacity(batch * seq_len);
            for tokens in beams {
                flat.push(start);
                flat.extend_from_slice(tokens);
            }

            let decoder_ids = Tensor::from_vec(flat, (batch, seq_len), device)?;
            let encoder_states = encoder_output
                .broadcast_as((batch, enc_len, d_model))?
                .contiguous()?;

            // [batch, vocab] logits for the last position
            model
                .decode(&decoder_ids, &encoder_states)?
                .to_dtype(DType::F32)?
                .to_vec2::<f32>()
        })
    }
}
