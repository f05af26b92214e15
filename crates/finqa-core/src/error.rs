use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed corpus: {0}")]
    Corpus(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Chunk {chunk_id} is out of range for a corpus of {len} chunks")]
    Misaligned { chunk_id: usize, len: usize },

    #[error("Model returned {actual} outputs for {expected} inputs")]
    OracleContract { expected: usize, actual: usize },

    #[error("No ranked context to generate from")]
    NoContext,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
