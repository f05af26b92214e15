use anyhow::Result;
use serde::Deserialize;
use std::path::Path;
use std::time::Instant;

use candle_core::Device;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;

use finqa_core::traits::Embedder;

use crate::device::select_device;
use crate::pool::masked_mean_l2;
use crate::tokenize::{configure, encode_on_device};
use crate::weights::{load_tokenizer, load_var_builder, read_json_config};

/// Sentence encoders of the MiniLM family were trained on at most 256 tokens.
pub const EMBEDDER_MAX_LEN: usize = 256;

#[derive(Deserialize)]
pub(crate) struct HiddenSize {
    pub hidden_size: usize,
}

/// BERT sentence encoder: mean pooling over the attention mask, then L2 normalization.
pub struct BertEmbedder { model: BertModel, tokenizer: Tokenizer, device: Device, dim: usize, max_len: usize }

impl BertEmbedder {
    pub fn load(model_dir: &Path, max_len: usize) -> Result<Self> {
        let device = select_device();
        tracing::info!(dir = %model_dir.display(), "loading sentence encoder");
        let mut tokenizer = load_tokenizer(model_dir)?;
        configure(&mut tokenizer, max_len)?;
        let config: BertConfig = read_json_config(model_dir)?;
        let HiddenSize { hidden_size } = read_json_config(model_dir)?;
        let vb = load_var_builder(model_dir, &device)?;
        let model = BertModel::load(vb, &config)?;
        tracing::info!(dim = hidden_size, max_len, "sentence encoder ready");
        Ok(Self { model, tokenizer, device, dim: hidden_size, max_len })
    }
}

impl Embedder for BertEmbedder {
    fn dim(&self) -> usize { self.dim }

    fn max_len(&self) -> usize { self.max_len }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() { return Ok(Vec::new()); }
        let start = Instant::now();
        let inputs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let batch = encode_on_device(&self.tokenizer, inputs, &self.device)?;
        let hidden = self.model.forward(&batch.input_ids, &batch.type_ids, Some(&batch.attention_mask))?;
        let pooled = masked_mean_l2(&hidden, &batch.attention_mask)?;
        let rows: Vec<Vec<f32>> = pooled.to_device(&Device::Cpu)?.to_vec2()?;
        tracing::debug!(texts = texts.len(), elapsed_ms = start.elapsed().as_millis(), "embedded batch");
        Ok(rows)
    }
}
