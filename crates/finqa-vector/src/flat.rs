use anyhow::Result;

use finqa_core::error::Error;
use finqa_core::traits::VectorIndex;
use finqa_core::types::{SearchHit, SourceKind};

/// Exact inner-product index. Vectors are stored row-major and are not
/// normalized, so scores are only comparable within one search.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatIpIndex {
    dim: usize,
    data: Vec<f32>,
}

impl FlatIpIndex {
    pub fn new(dim: usize) -> Self {
        Self { dim, data: Vec::new() }
    }

    pub fn vectors(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.dim.max(1))
    }

    fn check_dim(&self, v: &[f32]) -> Result<(), Error> {
        if v.len() == self.dim {
            Ok(())
        } else {
            Err(Error::DimensionMismatch { expected: self.dim, actual: v.len() })
        }
    }
}

impl VectorIndex for FlatIpIndex {
    fn dim(&self) -> usize {
        self.dim
    }

    fn len(&self) -> usize {
        if self.dim == 0 { 0 } else { self.data.len() / self.dim }
    }

    fn add(&mut self, vectors: &[Vec<f32>]) -> Result<()> {
        // Validate the whole batch first so a bad row leaves the index untouched.
        for v in vectors {
            self.check_dim(v)?;
        }
        self.data.reserve(vectors.len() * self.dim);
        for v in vectors {
            self.data.extend_from_slice(v);
        }
        Ok(())
    }

    /// Top `k` ids by inner product, best first; ties go to the lower id.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        self.check_dim(query)?;
        if k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }
        let mut scored: Vec<(usize, f32)> = self
            .vectors()
            .enumerate()
            .map(|(id, row)| (id, row.iter().zip(query).map(|(a, b)| a * b).sum()))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(k);
        Ok(scored
            .into_iter()
            .map(|(chunk_id, score)| SearchHit { chunk_id, score, source: SourceKind::Dense })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_product_ranking() {
        let mut idx = FlatIpIndex::new(2);
        idx.add(&[vec![1.0, 0.0], vec![0.0, 1.0], vec![2.0, 2.0]]).unwrap();
        let hits = idx.search(&[1.0, 0.5], 2).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].chunk_id, 2);
        assert!((hits[0].score - 3.0).abs() < 1e-6);
        assert_eq!(hits[1].chunk_id, 0);
    }

    #[test]
    fn ties_prefer_lower_ids_and_k_is_clamped() {
        let mut idx = FlatIpIndex::new(1);
        idx.add(&[vec![1.0], vec![1.0], vec![1.0]]).unwrap();
        let hits = idx.search(&[1.0], 10).unwrap();
        assert_eq!(hits.iter().map(|h| h.chunk_id).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn dimension_errors_leave_index_untouched() {
        let mut idx = FlatIpIndex::new(3);
        assert!(idx.add(&[vec![1.0, 2.0, 3.0], vec![1.0]]).is_err());
        assert_eq!(idx.len(), 0);
        assert!(idx.search(&[1.0, 2.0], 1).is_err());
    }
}
