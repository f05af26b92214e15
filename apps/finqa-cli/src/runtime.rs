//! Explicit start-up: every index and model is loaded here once and handed to
//! the pipeline. Any failure is fatal before the first question is read.
use anyhow::{bail, Context, Result};
use std::path::Path;

use finqa_core::config::{resolve_with_base, Config, ModelBackend, ModelSettings, Settings};
use finqa_core::corpus::{chunk_records, load_records};
use finqa_core::error::Error;
use finqa_core::traits::VectorIndex;
use finqa_core::types::Chunk;
use finqa_embed::{load_embedder, load_pair_scorer};
use finqa_generate::{load_generator, AnswerGenerator};
use finqa_guard::Guardrails;
use finqa_hybrid::{FinqaPipeline, Fusion, HybridRetriever, Pipeline, ReRanker};
use finqa_text::Bm25Index;
use finqa_vector::{build_vector_index, corpus_fingerprint, load_index, save_index, FlatIpIndex, IndexManifest};

pub fn load_settings() -> Result<Settings> {
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    config.settings()
}

/// Identifies the encoder that produced an index, recorded in its manifest.
pub fn embedder_label(models: &ModelSettings) -> String {
    match models.backend {
        ModelBackend::Candle => format!("candle:{}", models.embedder_dir),
        ModelBackend::Fake => "fake:hashed".to_string(),
    }
}

pub fn load_chunks(settings: &Settings, base: &Path) -> Result<Vec<Chunk>> {
    let path = resolve_with_base(base, &settings.data.corpus_path);
    let corpus = load_records(&path).with_context(|| format!("loading corpus {}", path.display()))?;
    if corpus.dropped > 0 {
        tracing::warn!(dropped = corpus.dropped, "skipped malformed corpus records");
    }
    Ok(chunk_records(&corpus.records))
}

/// Embed the corpus and write the vector index artifact.
pub fn build_index(settings: &Settings, base: &Path, show_progress: bool) -> Result<IndexManifest> {
    let chunks = load_chunks(settings, base)?;
    let embedder = load_embedder(&settings.models, base)?;
    let index = build_vector_index(&chunks, embedder.as_ref(), show_progress)?;
    let out = resolve_with_base(base, &settings.data.vector_index_path);
    let manifest = save_index(&out, &index, &corpus_fingerprint(&chunks), &embedder_label(&settings.models))?;
    tracing::info!(path = %out.display(), count = manifest.count, dim = manifest.dim, "vector index saved");
    Ok(manifest)
}

/// The lexical and dense branches plus the re-ranker, without a generator.
pub struct Retrieval {
    pub retriever: HybridRetriever<Bm25Index, FlatIpIndex>,
    pub reranker: ReRanker,
}

/// Refuses an index whose size differs from the corpus. Returns `false`, after
/// warning, when the index was built from different chunk texts.
pub fn check_alignment(manifest: &IndexManifest, chunks: &[Chunk]) -> Result<bool> {
    if manifest.count != chunks.len() {
        bail!(
            "vector index holds {} vectors but the corpus has {} chunks; rebuild it with finqa-indexer",
            manifest.count,
            chunks.len()
        );
    }
    let aligned = manifest.corpus_fingerprint == corpus_fingerprint(chunks);
    if !aligned {
        tracing::warn!("vector index was built from a different corpus; results may be misaligned");
    }
    Ok(aligned)
}

pub fn build_retrieval(settings: &Settings, base: &Path) -> Result<Retrieval> {
    let chunks = load_chunks(settings, base)?;
    let lexical = Bm25Index::build(&chunks).context("building BM25 index")?;

    let index_path = resolve_with_base(base, &settings.data.vector_index_path);
    let (vector, manifest) =
        load_index(&index_path).with_context(|| format!("loading vector index {}", index_path.display()))?;
    check_alignment(&manifest, &chunks)?;
    let label = embedder_label(&settings.models);
    if manifest.embedder != label {
        tracing::warn!(built_with = %manifest.embedder, running = %label, "vector index was built by another encoder");
    }

    let embedder = load_embedder(&settings.models, base)?;
    if embedder.dim() != vector.dim() {
        return Err(Error::DimensionMismatch { expected: vector.dim(), actual: embedder.dim() }.into());
    }
    let scorer = load_pair_scorer(&settings.models, base)?;

    tracing::info!(chunks = chunks.len(), fusion = ?settings.retrieval.fusion, "retrieval ready");
    Ok(Retrieval {
        retriever: HybridRetriever::new(lexical, vector, embedder, chunks, Fusion::from_settings(&settings.retrieval)),
        reranker: ReRanker::new(scorer),
    })
}

pub fn build_pipeline(settings: &Settings, base: &Path) -> Result<FinqaPipeline> {
    let Retrieval { retriever, reranker } = build_retrieval(settings, base)?;
    let oracle = load_generator(&settings.models, &settings.generation, base)?;
    Ok(Pipeline::new(
        Guardrails::new()?,
        retriever,
        reranker,
        AnswerGenerator::new(oracle, settings.generation.context_docs),
        settings.retrieval.top_k,
    ))
}
