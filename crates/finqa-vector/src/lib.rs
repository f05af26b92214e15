//! finqa-vector
//!
//! Exact inner-product vector index over chunk embeddings, its on-disk
//! artifact, and the offline build step that fills it.
pub mod flat;
pub mod index_build;
pub mod store;

pub use flat::FlatIpIndex;
pub use index_build::build_vector_index;
pub use store::{corpus_fingerprint, load_index, save_index, IndexManifest};
