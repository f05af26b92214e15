//! Deterministic offline stand-ins for the neural models.
use anyhow::Result;
use std::hash::{Hash, Hasher};
use twox_hash::XxHash64;

use finqa_core::traits::{Embedder, PairScorer};

/// Lowercased word tokens with surrounding punctuation stripped.
pub fn normalized_terms(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|t| !t.is_empty())
}

/// Hashed bag-of-terms embedding, L2-normalized.
pub struct HashEmbedder { dim: usize }

impl HashEmbedder {
    pub fn new(dim: usize) -> Self { Self { dim: dim.max(1) } }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        for term in normalized_terms(text) {
            let mut hasher = XxHash64::with_seed(0);
            term.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h % self.dim as u64) as usize;
            v[idx] += 0.5 + (((h >> 32) as u32) as f32) / (u32::MAX as f32);
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 { for x in &mut v { *x /= norm; } }
        v
    }
}

impl Embedder for HashEmbedder {
    fn dim(&self) -> usize { self.dim }

    fn max_len(&self) -> usize { usize::MAX }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

/// Fraction of query terms that also occur in the text.
#[derive(Debug, Default, Clone, Copy)]
pub struct OverlapScorer;

impl OverlapScorer {
    fn overlap(query: &str, text: &str) -> f32 {
        let query_terms: Vec<String> = normalized_terms(query).collect();
        if query_terms.is_empty() { return 0.0; }
        let doc_terms: Vec<String> = normalized_terms(text).collect();
        let matches = query_terms.iter().filter(|t| doc_terms.contains(t)).count();
        matches as f32 / query_terms.len() as f32
    }
}

impl PairScorer for OverlapScorer {
    fn predict(&self, pairs: &[(String, String)]) -> Result<Vec<f32>> {
        Ok(pairs.iter().map(|(q, t)| Self::overlap(q, t)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terms_are_normalized() {
        let terms: Vec<String> = normalized_terms("Year: 2023, Parameter: Total Revenue?").collect();
        assert_eq!(terms, vec!["year", "2023", "parameter", "total", "revenue"]);
    }

    #[test]
    fn overlap_is_a_fraction_of_query_terms() {
        let s = OverlapScorer.predict(&[
            ("total revenue".into(), "Parameter: Total Revenue,".into()),
            ("total revenue".into(), "Parameter: Net Income,".into()),
            ("".into(), "anything".into()),
        ]).unwrap();
        assert_eq!(s, vec![1.0, 0.0, 0.0]);
    }
}
