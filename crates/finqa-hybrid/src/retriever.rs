use anyhow::{ensure, Context, Result};

use finqa_core::error::Error;
use finqa_core::traits::{Embedder, LexicalIndex, VectorIndex};
use finqa_core::types::{Candidate, Chunk, SourceKind};

use crate::fusion::Fusion;

/// Lexical and dense search over one chunk sequence, fused into a single list.
///
/// Both indexes must be positionally aligned with `chunks`: hit `i` of either
/// branch refers to `chunks[i]`.
pub struct HybridRetriever<TI, VI>
where
    TI: LexicalIndex,
    VI: VectorIndex,
{
    lexical: TI,
    vector: VI,
    embedder: Box<dyn Embedder>,
    chunks: Vec<Chunk>,
    fusion: Fusion,
}

impl<TI, VI> HybridRetriever<TI, VI>
where
    TI: LexicalIndex,
    VI: VectorIndex,
{
    pub fn new(lexical: TI, vector: VI, embedder: Box<dyn Embedder>, chunks: Vec<Chunk>, fusion: Fusion) -> Self {
        Self { lexical, vector, embedder, chunks, fusion }
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn fusion(&self) -> Fusion {
        self.fusion
    }

    pub fn search(&self, query: &str, top_k: usize) -> Result<Vec<Candidate>> {
        if self.chunks.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let mut lexical_hits = self.lexical.search(query, top_k).context("lexical search")?;
        for h in &mut lexical_hits {
            h.source = SourceKind::Lexical;
        }

        let mut embedded = self.embedder.embed_batch(&[query.to_string()]).context("embedding query")?;
        ensure!(embedded.len() == 1, Error::OracleContract { expected: 1, actual: embedded.len() });
        let q_vec = embedded.remove(0);
        let mut dense_hits = self.vector.search(&q_vec, top_k).context("dense search")?;
        for h in &mut dense_hits {
            h.source = SourceKind::Dense;
        }
        tracing::debug!(lexical = lexical_hits.len(), dense = dense_hits.len(), "branch results");

        self.fusion
            .fuse(&lexical_hits, &dense_hits, top_k)
            .into_iter()
            .map(|hit| -> Result<Candidate> {
                let chunk = self
                    .chunks
                    .get(hit.chunk_id)
                    .ok_or(Error::Misaligned { chunk_id: hit.chunk_id, len: self.chunks.len() })?;
                Ok(Candidate::resolve(hit, chunk))
            })
            .collect()
    }
}
