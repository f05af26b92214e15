//! Domain types shared by the retrieval, re-ranking and generation stages.

use serde::{Deserialize, Serialize};

/// Position of a chunk in the corpus sequence. Both indexes use it as their join key.
pub type ChunkId = usize;

/// One statement line item as produced by the corpus ETL step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub year: i32,
    pub finance_parameter: String,
    pub value: f64,
}

/// A record rendered to the fixed text template.
///
/// - `text`: `"Year: {year}, Parameter: {finance_parameter}, Value: {value}"`
/// - `metadata`: the record the text was rendered from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub metadata: Record,
}

/// Indicates which retrieval branch produced a result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Lexical,
    Dense,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexical => f.write_str("lexical"),
            Self::Dense => f.write_str("dense"),
        }
    }
}

/// The minimal surface returned by both retrieval branches and by fusion.
///
/// `score` is branch-specific but higher is always better.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub chunk_id: ChunkId,
    pub score: f32,
    pub source: SourceKind,
}

/// A fused hit resolved against the chunk sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub chunk_id: ChunkId,
    pub score: f32,
    pub source: SourceKind,
    pub text: String,
    pub metadata: Record,
}

impl Candidate {
    pub fn resolve(hit: SearchHit, chunk: &Chunk) -> Self {
        Self {
            chunk_id: hit.chunk_id,
            score: hit.score,
            source: hit.source,
            text: chunk.text.clone(),
            metadata: chunk.metadata.clone(),
        }
    }
}

/// A candidate scored by the pairwise relevance model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub re_rank_score: f32,
}
