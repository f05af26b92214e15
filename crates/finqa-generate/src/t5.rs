use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use candle_core::{Device, Tensor, D};
use candle_transformers::models::t5::{Config as T5Config, T5ForConditionalGeneration};
use tokenizers::{Tokenizer, TruncationParams};

use finqa_core::traits::Generator;
use finqa_embed::device::select_device;
use finqa_embed::weights::{load_tokenizer, load_var_builder, read_json_config};

#[derive(Deserialize)]
struct SpecialTokens {
    #[serde(default)]
    pad_token_id: u32,
    #[serde(default = "default_eos")]
    eos_token_id: u32,
    decoder_start_token_id: Option<u32>,
}

fn default_eos() -> u32 { 1 }

/// T5 encoder-decoder with greedy decoding over the KV cache.
///
/// Decoding takes the arg-max token at every step; there is no beam search.
/// Output stops at the end-of-sequence token or after `max_new_tokens`.
pub struct T5Generator {
    model: Mutex<T5ForConditionalGeneration>,
    tokenizer: Tokenizer,
    device: Device,
    start_token: u32,
    eos_token: u32,
    max_new_tokens: usize,
}

impl T5Generator {
    pub fn load(model_dir: &Path, max_input_tokens: usize, max_new_tokens: usize) -> Result<Self> {
        let device = select_device();
        tracing::info!(dir = %model_dir.display(), "loading generator");
        let mut tokenizer = load_tokenizer(model_dir)?;
        tokenizer
            .with_truncation(Some(TruncationParams { max_length: max_input_tokens, ..Default::default() }))
            .map_err(|e| anyhow!("Failed to configure truncation: {}", e))?;
        let mut config: T5Config = read_json_config(model_dir)?;
        config.use_cache = true;
        let special: SpecialTokens = read_json_config(model_dir)?;
        let vb = load_var_builder(model_dir, &device)?;
        let model = T5ForConditionalGeneration::load(vb, &config)?;
        Ok(Self {
            model: Mutex::new(model),
            tokenizer,
            device,
            start_token: special.decoder_start_token_id.unwrap_or(special.pad_token_id),
            eos_token: special.eos_token_id,
            max_new_tokens,
        })
    }

    fn decode_greedy(&self, model: &mut T5ForConditionalGeneration, prompt_ids: &[u32]) -> Result<Vec<u32>> {
        model.clear_kv_cache();
        let input_ids = Tensor::new(prompt_ids, &self.device)?.unsqueeze(0)?;
        let encoder_output = model.encode(&input_ids)?;
        let mut output = vec![self.start_token];
        for step in 0..self.max_new_tokens {
            // With the cache warm only the newest token is fed back in.
            let feed = if step == 0 { &output[..] } else { &output[output.len() - 1..] };
            let decoder_ids = Tensor::new(feed, &self.device)?.unsqueeze(0)?;
            let logits = model.decode(&decoder_ids, &encoder_output)?.squeeze(0)?;
            let next = logits.argmax(D::Minus1)?.to_scalar::<u32>()?;
            if next == self.eos_token { break; }
            output.push(next);
        }
        Ok(output.split_off(1))
    }
}

impl Generator for T5Generator {
    fn generate(&self, prompt: &str) -> Result<String> {
        let start = Instant::now();
        let enc = self.tokenizer.encode(prompt, true).map_err(|e| anyhow!("Tokenization failed: {}", e))?;
        let mut model = self.model.lock().map_err(|_| anyhow!("generator model lock poisoned"))?;
        let ids = self.decode_greedy(&mut model, enc.get_ids())?;
        drop(model);
        let text = self.tokenizer.decode(&ids, true).map_err(|e| anyhow!("Detokenization failed: {}", e))?;
        tracing::debug!(prompt_tokens = enc.get_ids().len(), output_tokens = ids.len(), elapsed_ms = start.elapsed().as_millis(), "generated");
        Ok(text)
    }
}
