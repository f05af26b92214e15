use anyhow::{anyhow, Result};
use candle_core::{Device, Tensor};
use tokenizers::{EncodeInput, PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};

/// Token tensors for one padded batch, each shaped `[B, T]`.
pub struct EncodedBatch {
    pub input_ids: Tensor,
    pub type_ids: Tensor,
    pub attention_mask: Tensor,
}

/// Truncate to `max_len` (special tokens included) and pad to the batch's longest row.
pub fn configure(tokenizer: &mut Tokenizer, max_len: usize) -> Result<()> {
    tokenizer
        .with_truncation(Some(TruncationParams { max_length: max_len, ..Default::default() }))
        .map_err(|e| anyhow!("Failed to configure truncation: {}", e))?;
    tokenizer.with_padding(Some(PaddingParams { strategy: PaddingStrategy::BatchLongest, ..Default::default() }));
    Ok(())
}

/// Encode single texts or `(query, text)` pairs on `device`.
pub fn encode_on_device<'s, E>(tokenizer: &Tokenizer, inputs: Vec<E>, device: &Device) -> Result<EncodedBatch>
where
    E: Into<EncodeInput<'s>> + Send,
{
    let encodings = tokenizer.encode_batch(inputs, true).map_err(|e| anyhow!("Tokenization failed: {}", e))?;
    let rows = encodings.len();
    let width = encodings.first().map_or(0, |e| e.get_ids().len());
    let mut ids = Vec::with_capacity(rows * width);
    let mut type_ids = Vec::with_capacity(rows * width);
    let mut mask = Vec::with_capacity(rows * width);
    for enc in &encodings {
        if enc.get_ids().len() != width { return Err(anyhow!("tokenizer produced ragged batch")); }
        ids.extend_from_slice(enc.get_ids());
        type_ids.extend_from_slice(enc.get_type_ids());
        mask.extend_from_slice(enc.get_attention_mask());
    }
    Ok(EncodedBatch {
        input_ids: Tensor::from_vec(ids, (rows, width), device)?,
        type_ids: Tensor::from_vec(type_ids, (rows, width), device)?,
        attention_mask: Tensor::from_vec(mask, (rows, width), device)?,
    })
}
