//! finqa-text
//!
//! Tantivy-based BM25 scoring over chunk texts. Tokenization is a plain
//! case-sensitive whitespace split on both the index and the query side.
pub mod tantivy_utils;
pub mod index;

pub use index::Bm25Index;
