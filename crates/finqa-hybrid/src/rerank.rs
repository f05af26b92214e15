use anyhow::{ensure, Result};

use finqa_core::error::Error;
use finqa_core::traits::PairScorer;
use finqa_core::types::{Candidate, RankedCandidate};

/// Second-stage ordering of fused candidates by a pairwise relevance model.
pub struct ReRanker {
    scorer: Box<dyn PairScorer>,
}

impl ReRanker {
    pub fn new(scorer: Box<dyn PairScorer>) -> Self {
        Self { scorer }
    }

    /// Scores every `(query, text)` pair and sorts descending. Equal scores keep
    /// their input order. An empty list never reaches the model.
    pub fn rerank(&self, query: &str, candidates: Vec<Candidate>) -> Result<Vec<RankedCandidate>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        let pairs: Vec<(String, String)> = candidates.iter().map(|c| (query.to_string(), c.text.clone())).collect();
        let scores = self.scorer.predict(&pairs)?;
        ensure!(
            scores.len() == candidates.len(),
            Error::OracleContract { expected: candidates.len(), actual: scores.len() }
        );

        let mut ranked: Vec<RankedCandidate> = candidates
            .into_iter()
            .zip(scores)
            .map(|(candidate, re_rank_score)| RankedCandidate { candidate, re_rank_score })
            .collect();
        ranked.sort_by(|a, b| b.re_rank_score.total_cmp(&a.re_rank_score));
        Ok(ranked)
    }
}
