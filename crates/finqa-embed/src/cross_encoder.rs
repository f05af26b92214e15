//! Pairwise relevance scoring with a BERT sequence classifier.
//!
//! The head mirrors a single-label sequence classifier: `tanh(pooler(CLS))`
//! followed by a linear layer producing one raw logit per `(query, text)` pair.
use anyhow::Result;
use std::path::Path;

use candle_core::{Device, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;

use finqa_core::traits::PairScorer;

use crate::bert::HiddenSize;
use crate::device::select_device;
use crate::tokenize::{configure, encode_on_device};
use crate::weights::{load_tokenizer, load_var_builder, read_json_config};

pub struct BertCrossEncoder { model: BertModel, pooler: Linear, classifier: Linear, tokenizer: Tokenizer, device: Device }

impl BertCrossEncoder {
    pub fn load(model_dir: &Path, max_len: usize) -> Result<Self> {
        let device = select_device();
        tracing::info!(dir = %model_dir.display(), "loading cross-encoder");
        let mut tokenizer = load_tokenizer(model_dir)?;
        configure(&mut tokenizer, max_len)?;
        let config: BertConfig = read_json_config(model_dir)?;
        let HiddenSize { hidden_size } = read_json_config(model_dir)?;
        let vb: VarBuilder = load_var_builder(model_dir, &device)?;
        let model = BertModel::load(vb.pp("bert"), &config)?;
        let pooler = candle_nn::linear(hidden_size, hidden_size, vb.pp("bert.pooler.dense"))?;
        let classifier = candle_nn::linear(hidden_size, 1, vb.pp("classifier"))?;
        Ok(Self { model, pooler, classifier, tokenizer, device })
    }

    fn logits(&self, pairs: &[(String, String)]) -> Result<Tensor> {
        let inputs: Vec<(&str, &str)> = pairs.iter().map(|(q, t)| (q.as_str(), t.as_str())).collect();
        let batch = encode_on_device(&self.tokenizer, inputs, &self.device)?;
        let hidden = self.model.forward(&batch.input_ids, &batch.type_ids, Some(&batch.attention_mask))?;
        let cls = hidden.narrow(1, 0, 1)?.squeeze(1)?;
        let pooled = self.pooler.forward(&cls)?.tanh()?;
        Ok(self.classifier.forward(&pooled)?.squeeze(1)?)
    }
}

impl PairScorer for BertCrossEncoder {
    fn predict(&self, pairs: &[(String, String)]) -> Result<Vec<f32>> {
        if pairs.is_empty() { return Ok(Vec::new()); }
        let scores = self.logits(pairs)?.to_device(&Device::Cpu)?.to_vec1::<f32>()?;
        tracing::debug!(pairs = pairs.len(), "scored pairs");
        Ok(scores)
    }
}
