use anyhow::Result;

use finqa_core::error::Error;
use finqa_core::traits::Generator;
use finqa_core::types::RankedCandidate;

use crate::prompt::{build_context, build_prompt, first_line, PromptMode};

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedAnswer {
    pub text: String,
    pub mode: PromptMode,
}

/// Grounds a generative model on the best re-ranked candidates.
pub struct AnswerGenerator {
    oracle: Box<dyn Generator>,
    context_docs: usize,
}

impl AnswerGenerator {
    pub fn new(oracle: Box<dyn Generator>, context_docs: usize) -> Self {
        Self { oracle, context_docs: context_docs.max(1) }
    }

    /// Generate a one-line answer. Fails with [`Error::NoContext`] on an empty
    /// candidate list without consulting the model.
    pub fn generate(&self, query: &str, ranked: &[RankedCandidate]) -> Result<GeneratedAnswer> {
        if ranked.is_empty() {
            return Err(Error::NoContext.into());
        }
        let mode = PromptMode::for_query(query);
        let context = build_context(ranked, self.context_docs);
        let prompt = build_prompt(mode, query, &context);
        tracing::debug!(%mode, context_docs = ranked.len().min(self.context_docs), "generating answer");
        let raw = self.oracle.generate(&prompt)?;
        Ok(GeneratedAnswer { text: first_line(&raw).to_string(), mode })
    }
}
