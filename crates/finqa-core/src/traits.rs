use crate::types::{Chunk, SearchHit};

/// Dense encoder: texts in, fixed-dimension vectors out, same order.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn max_len(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// Pairwise relevance model: one scalar per `(query, text)` pair, same order.
pub trait PairScorer: Send + Sync {
    fn predict(&self, pairs: &[(String, String)]) -> anyhow::Result<Vec<f32>>;
}

/// Text-to-text model used for the final answer.
pub trait Generator: Send + Sync {
    fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}

pub trait LexicalIndex: Send + Sync {
    fn index(&mut self, chunks: &[Chunk]) -> anyhow::Result<()>;
    fn search(&self, query: &str, k: usize) -> anyhow::Result<Vec<SearchHit>>;
}

/// Inner-product index over vectors whose ids are insertion positions.
pub trait VectorIndex: Send + Sync {
    fn dim(&self) -> usize;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn add(&mut self, vectors: &[Vec<f32>]) -> anyhow::Result<()>;
    fn search(&self, query: &[f32], k: usize) -> anyhow::Result<Vec<SearchHit>>;
}
