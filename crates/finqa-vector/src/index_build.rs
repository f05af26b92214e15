use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};

use finqa_core::traits::{Embedder, VectorIndex};
use finqa_core::types::Chunk;

use crate::flat::FlatIpIndex;

pub const EMBED_BATCH_SIZE: usize = 32;

/// Embed every chunk text in order and load the vectors into a fresh index.
///
/// Vector `i` always belongs to chunk `i`; a batch that comes back short is an error.
pub fn build_vector_index(chunks: &[Chunk], embedder: &dyn Embedder, show_progress: bool) -> Result<FlatIpIndex> {
    let mut index = FlatIpIndex::new(embedder.dim());
    if chunks.is_empty() {
        tracing::warn!("no chunks to embed");
        return Ok(index);
    }
    tracing::info!(chunks = chunks.len(), dim = embedder.dim(), "embedding corpus");

    let pb = if show_progress { ProgressBar::new(chunks.len() as u64) } else { ProgressBar::hidden() };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg}")?
            .progress_chars("#>-"),
    );

    for batch in chunks.chunks(EMBED_BATCH_SIZE) {
        let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
        let vectors = embedder.embed_batch(&texts)?;
        if vectors.len() != texts.len() {
            return Err(anyhow!("embedder returned {} vectors for {} texts", vectors.len(), texts.len()));
        }
        index.add(&vectors)?;
        pb.inc(batch.len() as u64);
    }

    pb.finish_with_message("done");
    tracing::info!(vectors = index.len(), "vector index built");
    Ok(index)
}
