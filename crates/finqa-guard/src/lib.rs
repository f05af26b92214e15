//! finqa-guard
//!
//! Deterministic filters around the question-answering pipeline: a pre-check
//! deciding whether a question may run at all and a post-check screening the
//! generated answer.
use anyhow::Result;
use regex::Regex;

pub mod vocabulary;

pub use vocabulary::{DomainVocabulary, StatementType};

pub const HARMFUL_KEYWORDS: &[&str] = &["kill", "attack", "terrorist", "bomb", "hate", "abuse"];
pub const PROHIBITED_TOPICS: &[&str] = &["violent", "illegal"];
/// Placeholder markers, matched case-insensitively anywhere in the answer.
/// `nan` alone must stand as a whole word so it does not fire inside `finance`.
pub const SUSPICIOUS_PATTERN: &str = r"(?i)\?\?\?|undefined|no data|\bnan\b";
pub const FLAGGED_ANSWER: &str = "Output flagged as potentially misleading.";

/// Why a question was declined. Declines are outcomes, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    Empty,
    Harmful { keyword: &'static str },
    OffTopic,
}

impl Rejection {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "Please enter a query.",
            Self::Harmful { .. } => "This question can't be answered because it contains prohibited content.",
            Self::OffTopic => "Please ask a finance question.",
        }
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenedAnswer {
    pub text: String,
    pub flagged: bool,
}

pub struct Guardrails {
    vocabulary: DomainVocabulary,
    suspicious: Regex,
}

impl Guardrails {
    pub fn new() -> Result<Self> {
        Self::with_vocabulary(DomainVocabulary::standard()?)
    }

    pub fn with_vocabulary(vocabulary: DomainVocabulary) -> Result<Self> {
        Ok(Self { vocabulary, suspicious: Regex::new(SUSPICIOUS_PATTERN)? })
    }

    /// Checks run in order: blank input, harmful content, domain vocabulary.
    pub fn screen_query(&self, query: &str) -> Result<StatementType, Rejection> {
        if query.trim().is_empty() {
            return Err(Rejection::Empty);
        }
        if let Some(keyword) = harmful_keyword(query) {
            tracing::info!(keyword, "declined harmful question");
            return Err(Rejection::Harmful { keyword });
        }
        self.vocabulary.classify(query).ok_or_else(|| {
            tracing::info!("declined off-topic question");
            Rejection::OffTopic
        })
    }

    /// Replace an answer carrying a placeholder marker with [`FLAGGED_ANSWER`].
    pub fn screen_answer(&self, answer: &str) -> ScreenedAnswer {
        match self.suspicious.find(answer) {
            Some(m) => {
                tracing::warn!(marker = m.as_str(), "flagged generated answer");
                ScreenedAnswer { text: FLAGGED_ANSWER.to_string(), flagged: true }
            }
            None => ScreenedAnswer { text: answer.to_string(), flagged: false },
        }
    }
}

/// Substring match, so `bombing` and `hateful` are caught too.
pub fn harmful_keyword(query: &str) -> Option<&'static str> {
    let lowered = query.to_lowercase();
    HARMFUL_KEYWORDS.iter().chain(PROHIBITED_TOPICS).copied().find(|kw| lowered.contains(kw))
}
