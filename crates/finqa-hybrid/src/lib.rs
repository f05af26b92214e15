//! finqa-hybrid
//!
//! Fusion of the BM25 and dense branches, pairwise re-ranking and the
//! end-to-end question pipeline.
pub mod fusion;
pub mod pipeline;
pub mod rerank;
pub mod retriever;

pub use fusion::Fusion;
pub use pipeline::{Answer, Outcome, Pipeline};
pub use rerank::ReRanker;
pub use retriever::HybridRetriever;

/// The pipeline as the binaries run it: tantivy BM25 plus the flat inner-product index.
pub type FinqaPipeline = Pipeline<finqa_text::Bm25Index, finqa_vector::FlatIpIndex>;
