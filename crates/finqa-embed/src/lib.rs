//! finqa-embed
//!
//! Candle-backed dense sentence encoder and cross-encoder, plus deterministic
//! stand-ins selected with `models.backend = "fake"`.
use anyhow::Result;
use std::path::Path;

use finqa_core::config::{resolve_with_base, ModelBackend, ModelSettings};
use finqa_core::traits::{Embedder, PairScorer};

pub mod bert;
pub mod cross_encoder;
pub mod device;
pub mod fake;
pub mod pool;
pub mod tokenize;
pub mod weights;

pub use bert::{BertEmbedder, EMBEDDER_MAX_LEN};
pub use cross_encoder::BertCrossEncoder;
pub use fake::{HashEmbedder, OverlapScorer};
pub use pool::masked_mean_l2;

/// Width of the hashed stand-in, matching the MiniLM sentence encoder.
pub const FAKE_DIM: usize = 384;

pub fn load_embedder(models: &ModelSettings, base: &Path) -> Result<Box<dyn Embedder>> {
    match models.backend {
        ModelBackend::Fake => { tracing::info!("using hashed embedder"); Ok(Box::new(HashEmbedder::new(FAKE_DIM))) }
        ModelBackend::Candle => {
            let dir = resolve_with_base(base, &models.embedder_dir);
            Ok(Box::new(BertEmbedder::load(&dir, EMBEDDER_MAX_LEN.min(models.max_seq_len))?))
        }
    }
}

pub fn load_pair_scorer(models: &ModelSettings, base: &Path) -> Result<Box<dyn PairScorer>> {
    match models.backend {
        ModelBackend::Fake => { tracing::info!("using term-overlap scorer"); Ok(Box::new(OverlapScorer)) }
        ModelBackend::Candle => {
            let dir = resolve_with_base(base, &models.cross_encoder_dir);
            Ok(Box::new(BertCrossEncoder::load(&dir, models.max_seq_len)?))
        }
    }
}
