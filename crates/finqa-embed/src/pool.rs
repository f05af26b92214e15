use anyhow::{ensure, Result};
use candle_core::Tensor;

const NORM_FLOOR: f64 = 1e-12;

/// Sentence vector from token states: mean over the tokens the attention mask
/// keeps, scaled to unit length.
///
/// `hidden` is `[B, T, H]`, `attention_mask` is `[B, T]`; returns `[B, H]`.
/// A row whose mask is all zeros pools to the zero vector.
pub fn masked_mean_l2(hidden: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
    let (batch, _tokens, width) = hidden.dims3()?;

    let keep = attention_mask.to_device(hidden.device())?.to_dtype(hidden.dtype())?.unsqueeze(2)?;
    let summed = hidden.broadcast_mul(&keep)?.sum(1)?;
    let kept = keep.sum(1)?.clamp(1.0, f64::MAX)?;
    let mean = summed.broadcast_div(&kept)?;

    let length = mean.sqr()?.sum_keepdim(1)?.sqrt()?.clamp(NORM_FLOOR, f64::MAX)?;
    let pooled = mean.broadcast_div(&length)?;
    ensure!(pooled.dims() == [batch, width], "pooled shape {:?}", pooled.dims());
    Ok(pooled)
}
