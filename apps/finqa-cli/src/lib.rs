//! finqa-cli
//!
//! Runtime wiring shared by the `finqa`, `finqa-indexer` and `finqa-search` binaries.
use tracing_subscriber::EnvFilter;

pub mod display;
pub mod runtime;

/// Log to stderr so stdout carries only answers and listings.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}
