//! Plain-text rendering of pipeline outcomes and candidate listings.
use std::fmt::Write;

use finqa_core::types::{Candidate, RankedCandidate};
use finqa_hybrid::{Answer, Outcome};

pub const NO_RESULTS: &str = "No relevant documents found.";

pub fn render_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Rejected(rejection) => format!("{rejection}\n"),
        Outcome::NoResults => format!("{NO_RESULTS}\n"),
        Outcome::Answered(answer) => render_answer(answer),
    }
}

pub fn render_answer(answer: &Answer) -> String {
    let mut out = String::new();
    if let Some(extra) = answer.additional_context() {
        let _ = writeln!(out, "Additional Context:\n{extra}\n");
    }
    let _ = writeln!(out, "Final Answer\n{}\n", answer.text);
    let _ = writeln!(out, "Confidence Score: {:.2}", answer.confidence());
    if let Some(top) = answer.top() {
        let _ = writeln!(out, "---\nTop Retrieved Snippet\n{}", top.candidate.text);
        let _ = writeln!(out, "Re-rank Score: {:.2}", top.re_rank_score);
    }
    out
}

pub fn render_fused(candidates: &[Candidate]) -> String {
    let mut out = String::new();
    for (i, c) in candidates.iter().enumerate() {
        let _ = writeln!(out, "  {}. score={:.4}  chunk={}  source={}", i + 1, c.score, c.chunk_id, c.source);
        let _ = writeln!(out, "     {}", c.text);
    }
    out
}

pub fn render_ranked(ranked: &[RankedCandidate]) -> String {
    let mut out = String::new();
    for (i, r) in ranked.iter().enumerate() {
        let c = &r.candidate;
        let _ = writeln!(
            out,
            "  {}. re_rank={:.4}  score={:.4}  chunk={}  source={}",
            i + 1,
            r.re_rank_score,
            c.score,
            c.chunk_id,
            c.source
        );
        let _ = writeln!(out, "     {}", c.text);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use finqa_core::types::{Record, SourceKind};
    use finqa_generate::PromptMode;
    use finqa_guard::{Rejection, StatementType};

    fn ranked(value: f64) -> RankedCandidate {
        RankedCandidate {
            candidate: Candidate {
                chunk_id: 0,
                score: 87.654,
                source: SourceKind::Dense,
                text: format!("Year: 2023, Parameter: Total Revenue, Value: {value:.1}"),
                metadata: Record { year: 2023, finance_parameter: "Total Revenue".into(), value },
            },
            re_rank_score: 7.891,
        }
    }

    fn answer(text: &str) -> Answer {
        Answer {
            text: text.into(),
            flagged: false,
            mode: PromptMode::SingleFact,
            statement: StatementType::IncomeStatement,
            ranked: vec![ranked(383_285_000_000.0)],
        }
    }

    #[test]
    fn answer_block() {
        let out = render_answer(&answer("Total Revenue 2023 was 383285000000.0"));
        assert!(!out.contains("Additional Context:"));
        assert!(out.contains("Final Answer\nTotal Revenue 2023 was 383285000000.0\n"));
        assert!(out.contains("Confidence Score: 87.65\n"));
        assert!(out.contains("Top Retrieved Snippet\nYear: 2023, Parameter: Total Revenue, Value: 383285000000.0\n"));
        assert!(out.contains("Re-rank Score: 7.89\n"));
    }

    #[test]
    fn additional_context_when_value_is_missing() {
        let out = render_answer(&answer("Revenue grew"));
        assert!(out.starts_with("Additional Context:\nTotal Revenue 2023: 383285000000.0\n"));
    }

    #[test]
    fn declines_and_empty_results() {
        assert_eq!(render_outcome(&Outcome::Rejected(Rejection::OffTopic)), "Please ask a finance question.\n");
        assert_eq!(render_outcome(&Outcome::Rejected(Rejection::Empty)), "Please enter a query.\n");
        assert_eq!(render_outcome(&Outcome::NoResults), "No relevant documents found.\n");
    }
}
