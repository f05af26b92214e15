//! Merging the lexical and dense result lists into one ranking.
use std::collections::{HashMap, HashSet};

use finqa_core::config::{FusionKind, RetrievalSettings};
use finqa_core::types::{ChunkId, SearchHit, SourceKind};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fusion {
    /// Dense scores are multiplied by `dense_scale`, both lists are pooled and
    /// sorted by raw score. Ties keep lexical hits ahead of dense ones.
    ScaledScore { dense_scale: f32 },
    /// Weighted reciprocal rank: each list contributes `weight / (k + rank + 1)`.
    ReciprocalRank { k: f32, lexical_weight: f32, dense_weight: f32 },
}

impl Default for Fusion {
    fn default() -> Self {
        Self::ScaledScore { dense_scale: 100.0 }
    }
}

impl Fusion {
    pub fn from_settings(settings: &RetrievalSettings) -> Self {
        match settings.fusion {
            FusionKind::Scaled => Self::ScaledScore { dense_scale: settings.dense_scale },
            FusionKind::Rrf => Self::ReciprocalRank {
                k: settings.rrf_k,
                lexical_weight: settings.lexical_weight,
                dense_weight: settings.dense_weight,
            },
        }
    }

    /// At most `top_k` hits with pairwise distinct chunk ids, best first.
    pub fn fuse(&self, lexical: &[SearchHit], dense: &[SearchHit], top_k: usize) -> Vec<SearchHit> {
        match *self {
            Self::ScaledScore { dense_scale } => scaled_score(lexical, dense, dense_scale, top_k),
            Self::ReciprocalRank { k, lexical_weight, dense_weight } => {
                reciprocal_rank(lexical, dense, k, lexical_weight, dense_weight, top_k)
            }
        }
    }
}

fn scaled_score(lexical: &[SearchHit], dense: &[SearchHit], dense_scale: f32, top_k: usize) -> Vec<SearchHit> {
    let mut pooled: Vec<SearchHit> = lexical
        .iter()
        .map(|h| SearchHit { source: SourceKind::Lexical, ..*h })
        .chain(dense.iter().map(|h| SearchHit { score: h.score * dense_scale, source: SourceKind::Dense, ..*h }))
        .collect();
    // sort_by is stable
    pooled.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut seen = HashSet::new();
    let mut fused = Vec::with_capacity(top_k.min(pooled.len()));
    for hit in pooled {
        if fused.len() == top_k {
            break;
        }
        if seen.insert(hit.chunk_id) {
            fused.push(hit);
        }
    }
    fused
}

fn reciprocal_rank(
    lexical: &[SearchHit],
    dense: &[SearchHit],
    k: f32,
    lexical_weight: f32,
    dense_weight: f32,
    top_k: usize,
) -> Vec<SearchHit> {
    struct Entry {
        first_seen: usize,
        lexical: f32,
        dense: f32,
    }

    let mut entries: HashMap<ChunkId, Entry> = HashMap::new();
    let lists = [(lexical, lexical_weight, SourceKind::Lexical), (dense, dense_weight, SourceKind::Dense)];
    let mut order = 0;
    for (hits, weight, source) in lists {
        for (rank, hit) in hits.iter().enumerate() {
            let contribution = weight / (k + rank as f32 + 1.0);
            let entry = entries.entry(hit.chunk_id).or_insert_with(|| {
                order += 1;
                Entry { first_seen: order, lexical: 0.0, dense: 0.0 }
            });
            match source {
                SourceKind::Lexical => entry.lexical += contribution,
                SourceKind::Dense => entry.dense += contribution,
            }
        }
    }

    let mut fused: Vec<(usize, SearchHit)> = entries
        .into_iter()
        .map(|(chunk_id, e)| {
            let source = if e.dense > e.lexical { SourceKind::Dense } else { SourceKind::Lexical };
            (e.first_seen, SearchHit { chunk_id, score: e.lexical + e.dense, source })
        })
        .collect();
    fused.sort_by(|(oa, a), (ob, b)| b.score.total_cmp(&a.score).then(oa.cmp(ob)));
    fused.into_iter().take(top_k).map(|(_, hit)| hit).collect()
}
