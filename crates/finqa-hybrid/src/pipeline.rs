//! One question in, one outcome out: guard, retrieve, re-rank, generate, screen.
use anyhow::Result;
use serde::Serialize;

use finqa_core::corpus::format_value;
use finqa_core::traits::{LexicalIndex, VectorIndex};
use finqa_core::types::RankedCandidate;
use finqa_generate::{AnswerGenerator, PromptMode};
use finqa_guard::{Guardrails, Rejection, StatementType};

use crate::rerank::ReRanker;
use crate::retriever::HybridRetriever;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub text: String,
    pub flagged: bool,
    pub mode: PromptMode,
    pub statement: StatementType,
    /// Never empty.
    pub ranked: Vec<RankedCandidate>,
}

impl Answer {
    pub fn top(&self) -> Option<&RankedCandidate> {
        self.ranked.first()
    }

    /// Fusion score of the best re-ranked candidate.
    pub fn confidence(&self) -> f32 {
        self.top().map(|r| r.candidate.score).unwrap_or_default()
    }

    /// `"{parameter} {year}: {value}"` of the top record when its value does not
    /// already appear in the answer text.
    pub fn additional_context(&self) -> Option<String> {
        let top = &self.top()?.candidate.metadata;
        let value = format_value(top.value);
        (!self.text.contains(&value)).then(|| format!("{} {}: {}", top.finance_parameter, top.year, value))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Rejected(Rejection),
    NoResults,
    Answered(Answer),
}

pub struct Pipeline<TI, VI>
where
    TI: LexicalIndex,
    VI: VectorIndex,
{
    guard: Guardrails,
    retriever: HybridRetriever<TI, VI>,
    reranker: ReRanker,
    generator: AnswerGenerator,
    top_k: usize,
}

impl<TI, VI> Pipeline<TI, VI>
where
    TI: LexicalIndex,
    VI: VectorIndex,
{
    pub fn new(
        guard: Guardrails,
        retriever: HybridRetriever<TI, VI>,
        reranker: ReRanker,
        generator: AnswerGenerator,
        top_k: usize,
    ) -> Self {
        Self { guard, retriever, reranker, generator, top_k }
    }

    pub fn retriever(&self) -> &HybridRetriever<TI, VI> {
        &self.retriever
    }

    pub fn reranker(&self) -> &ReRanker {
        &self.reranker
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn ask(&self, query: &str) -> Result<Outcome> {
        let statement = match self.guard.screen_query(query) {
            Ok(statement) => statement,
            Err(rejection) => return Ok(Outcome::Rejected(rejection)),
        };

        let candidates = self.retriever.search(query, self.top_k)?;
        let ranked = self.reranker.rerank(query, candidates)?;
        if ranked.is_empty() {
            tracing::info!("no candidates for question");
            return Ok(Outcome::NoResults);
        }

        let generated = self.generator.generate(query, &ranked)?;
        let screened = self.guard.screen_answer(&generated.text);
        Ok(Outcome::Answered(Answer {
            text: screened.text,
            flagged: screened.flagged,
            mode: generated.mode,
            statement,
            ranked,
        }))
    }
}
