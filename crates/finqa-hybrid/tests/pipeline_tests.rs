use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use finqa_core::corpus::chunk_records;
use finqa_core::traits::{Embedder, Generator, LexicalIndex, VectorIndex};
use finqa_core::types::{Chunk, Record, SearchHit};
use finqa_embed::{HashEmbedder, OverlapScorer};
use finqa_generate::{AnswerGenerator, ExtractiveGenerator, PromptMode};
use finqa_guard::{Guardrails, Rejection, StatementType};
use finqa_hybrid::{Fusion, HybridRetriever, Outcome, Pipeline, ReRanker};
use finqa_text::Bm25Index;
use finqa_vector::FlatIpIndex;

/// Two axes: mentions of 2023 and of 2024.
struct YearEmbedder;

impl Embedder for YearEmbedder {
    fn dim(&self) -> usize { 2 }
    fn max_len(&self) -> usize { 64 }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| {
                let v = [t.contains("2023") as u8 as f32, t.contains("2024") as u8 as f32];
                let norm = (v[0] * v[0] + v[1] * v[1]).sqrt().max(1.0);
                vec![v[0] / norm, v[1] / norm]
            })
            .collect())
    }
}

#[derive(Clone, Default)]
struct Calls(Arc<AtomicUsize>);

impl Calls {
    fn bump(&self) { self.0.fetch_add(1, Ordering::SeqCst); }
    fn get(&self) -> usize { self.0.load(Ordering::SeqCst) }
}

struct CountingLexical { inner: Bm25Index, calls: Calls }

impl LexicalIndex for CountingLexical {
    fn index(&mut self, chunks: &[Chunk]) -> Result<()> { self.inner.index(chunks) }
    fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>> {
        self.calls.bump();
        self.inner.search(query, k)
    }
}

struct CountingGenerator { calls: Calls }

impl Generator for CountingGenerator {
    fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.bump();
        ExtractiveGenerator.generate(prompt)
    }
}

fn revenue_records() -> Vec<Record> {
    vec![
        Record { year: 2023, finance_parameter: "Total Revenue".into(), value: 383_285_000_000.0 },
        Record { year: 2024, finance_parameter: "Total Revenue".into(), value: 391_035_000_000.0 },
    ]
}

fn dense_index(chunks: &[Chunk], embedder: &dyn Embedder) -> FlatIpIndex {
    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
    let mut index = FlatIpIndex::new(embedder.dim());
    index.add(&embedder.embed_batch(&texts).unwrap()).unwrap();
    index
}

struct Harness {
    pipeline: Pipeline<CountingLexical, FlatIpIndex>,
    searches: Calls,
    generations: Calls,
}

fn harness(records: &[Record]) -> Harness {
    let chunks = chunk_records(records);
    let searches = Calls::default();
    let generations = Calls::default();
    let lexical = CountingLexical { inner: Bm25Index::build(&chunks).unwrap(), calls: searches.clone() };
    let vector = dense_index(&chunks, &YearEmbedder);
    let retriever = HybridRetriever::new(lexical, vector, Box::new(YearEmbedder), chunks, Fusion::default());
    let generator = AnswerGenerator::new(Box::new(CountingGenerator { calls: generations.clone() }), 3);
    let pipeline = Pipeline::new(Guardrails::new().unwrap(), retriever, ReRanker::new(Box::new(OverlapScorer)), generator, 5);
    Harness { pipeline, searches, generations }
}

#[test]
fn single_fact_revenue_question() {
    let h = harness(&revenue_records());
    let Outcome::Answered(answer) = h.pipeline.ask("What is the total revenue for 2023?").unwrap() else {
        panic!("expected an answer");
    };
    assert_eq!(answer.mode, PromptMode::SingleFact);
    assert_eq!(answer.statement, StatementType::IncomeStatement);
    assert!(answer.text.contains("383285000000.0"), "{}", answer.text);
    assert!(!answer.flagged);
    assert_eq!(answer.ranked.iter().filter(|r| r.candidate.chunk_id == 0).count(), 1);
    assert_eq!(answer.top().unwrap().candidate.chunk_id, 0);
    assert!((answer.confidence() - 100.0).abs() < 1e-3);
    assert_eq!(answer.additional_context(), None);
    assert_eq!(h.generations.get(), 1);
}

#[test]
fn chunk_zero_is_surfaced_by_both_branches() {
    let query = "What is the total revenue for 2023?";
    let chunks = chunk_records(&revenue_records());

    let lexical_hits = Bm25Index::build(&chunks).unwrap().search(query, 5).unwrap();
    assert!(lexical_hits.iter().any(|h| h.chunk_id == 0), "{lexical_hits:?}");
    let q_vec = YearEmbedder.embed_batch(&[query.to_string()]).unwrap().remove(0);
    let dense_hits = dense_index(&chunks, &YearEmbedder).search(&q_vec, 5).unwrap();
    assert_eq!(dense_hits[0].chunk_id, 0);

    let h = harness(&revenue_records());
    let candidates = h.pipeline.retriever().search(query, 5).unwrap();
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].chunk_id, 0);
    assert_eq!(candidates.iter().filter(|c| c.chunk_id == 0).count(), 1);
}

#[test]
fn multi_year_question() {
    let h = harness(&revenue_records());
    let Outcome::Answered(answer) = h.pipeline.ask("Compare revenue over two years").unwrap() else {
        panic!("expected an answer");
    };
    assert_eq!(answer.mode, PromptMode::MultiYear);
}

#[test]
fn rejected_questions_never_reach_retrieval() {
    let h = harness(&revenue_records());
    assert_eq!(
        h.pipeline.ask("I want to bomb the building").unwrap(),
        Outcome::Rejected(Rejection::Harmful { keyword: "bomb" })
    );
    assert_eq!(h.pipeline.ask("What's the weather today?").unwrap(), Outcome::Rejected(Rejection::OffTopic));
    assert_eq!(h.pipeline.ask("  ").unwrap(), Outcome::Rejected(Rejection::Empty));
    assert_eq!(h.searches.get(), 0);
    assert_eq!(h.generations.get(), 0);
}

#[test]
fn empty_corpus_skips_generation() {
    let h = harness(&[]);
    assert_eq!(h.pipeline.ask("What is the total revenue for 2023?").unwrap(), Outcome::NoResults);
    assert_eq!(h.generations.get(), 0);
}

#[test]
fn fused_results_are_distinct_and_bounded() {
    let records: Vec<Record> = (0..30)
        .map(|i| Record {
            year: 2023 + (i % 2),
            finance_parameter: format!("Line Item {i}"),
            value: 1000.0 * i as f64,
        })
        .collect();
    let chunks = chunk_records(&records);
    let embedder = HashEmbedder::new(32);
    let vector = dense_index(&chunks, &embedder);
    let lexical = Bm25Index::build(&chunks).unwrap();
    let retriever = HybridRetriever::new(lexical, vector, Box::new(embedder), chunks, Fusion::default());

    for k in [1, 3, 5, 12] {
        let candidates = retriever.search("Parameter: Line Item 7", k).unwrap();
        assert!(candidates.len() <= k);
        let ids: HashSet<_> = candidates.iter().map(|c| c.chunk_id).collect();
        assert_eq!(ids.len(), candidates.len());
    }
}

#[test]
fn rerank_is_a_sorted_permutation() {
    let chunks = chunk_records(&revenue_records());
    let embedder = HashEmbedder::new(16);
    let vector = dense_index(&chunks, &embedder);
    let retriever =
        HybridRetriever::new(Bm25Index::build(&chunks).unwrap(), vector, Box::new(embedder), chunks, Fusion::default());
    let query = "Total Revenue 2024";
    let candidates = retriever.search(query, 5).unwrap();
    let before: HashSet<_> = candidates.iter().map(|c| c.chunk_id).collect();

    let ranked = ReRanker::new(Box::new(OverlapScorer)).rerank(query, candidates).unwrap();
    let after: HashSet<_> = ranked.iter().map(|r| r.candidate.chunk_id).collect();
    assert_eq!(before, after);
    assert!(ranked.windows(2).all(|w| w[0].re_rank_score >= w[1].re_rank_score));
    assert!(ReRanker::new(Box::new(OverlapScorer)).rerank(query, Vec::new()).unwrap().is_empty());
}
