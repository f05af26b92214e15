//! Prompt construction for the answer generator.
//!
//! Two prompt strategies exist. The choice is made per query from its shape
//! and is never persisted between queries.
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use finqa_core::types::RankedCandidate;

const MULTI_YEAR_CUES: [&str; 4] = ["two", "2", "multiple", "over"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptMode {
    /// Return the value and parameter of the best context document.
    SingleFact,
    /// Aggregate the context per year, one sentence per year.
    MultiYear,
}

impl PromptMode {
    /// Multi-year when a cue word appears together with `years`, or when both
    /// `2023` and `2024` occur anywhere in the query. Cue words match per word,
    /// case-insensitively.
    pub fn for_query(query: &str) -> Self {
        let lowered = query.to_lowercase();
        let words: Vec<&str> = lowered.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()).collect();
        let has = |w: &str| words.contains(&w);
        let cue = MULTI_YEAR_CUES.iter().any(|&c| has(c)) && has("years");
        if cue || (lowered.contains("2023") && lowered.contains("2024")) { Self::MultiYear } else { Self::SingleFact }
    }
}

impl std::fmt::Display for PromptMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SingleFact => f.write_str("single-fact"),
            Self::MultiYear => f.write_str("multi-year"),
        }
    }
}

/// One `Document n [Re-rank Score: s]: text` line per candidate, at most `limit`.
pub fn build_context(ranked: &[RankedCandidate], limit: usize) -> String {
    let mut context = String::new();
    for (i, rc) in ranked.iter().take(limit).enumerate() {
        let _ = writeln!(context, "Document {} [Re-rank Score: {}]: {}", i + 1, rc.re_rank_score, rc.candidate.text);
    }
    context
}

pub fn build_prompt(mode: PromptMode, query: &str, context: &str) -> String {
    match mode {
        PromptMode::SingleFact => format!(
            "You are a helpful assistant that answers questions concisely based on the provided context.\n\n\
             Question: {query}\n\n\
             Context:\n{context}\n\n\
             Instructions:\n\
             1. Return the **Value** and **Parameter** from the document with the highest re-rank score that best answers the question.\n\
             2. **Do not include any other context, details, or metadata. Just provide the numeric value and parameter.**\n"
        ),
        PromptMode::MultiYear => format!(
            "You are a helpful assistant that produces a descriptive summary based on provided context. \
             The context contains data with a 'value', 'parameter', and 'year'. \
             Your task is to aggregate and summarize the values and parameters by year. \
             For each year, produce a clear, complete sentence that states the total or summarized value along with its parameter. \
             Make sure that the summary is coherent and only includes the aggregated results as per the available years. \n\n\
             Question: {query}\n\n\
             Context:\n{context}\n\n\
             Instructions:\n\
             1. Parse the provided context to identify all entries with their respective value, parameter, and year.\n\
             2. Aggregate the values and parameters for each year if multiple entries exist.\n\
             3. For each year, write a full sentence that describes the aggregated result in a natural, clear language.\n\
             4. Do not include any extra information besides these sentences.\n"
        ),
    }
}

/// First line of the trimmed model output; everything after it is discarded.
pub fn first_line(raw: &str) -> &str {
    raw.trim().split('\n').next().unwrap_or_default()
}
