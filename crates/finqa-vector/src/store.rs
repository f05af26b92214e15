//! JSON persistence for [`FlatIpIndex`].
//!
//! The artifact carries a manifest describing what it was built from. The
//! positional alignment between vectors and chunks is not stored; callers
//! compare `count` and `corpus_fingerprint` against the chunks they derive.
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use finqa_core::error::Error;
use finqa_core::traits::VectorIndex;
use finqa_core::types::Chunk;

use crate::flat::FlatIpIndex;

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexManifest {
    pub format_version: u32,
    pub dim: usize,
    pub count: usize,
    pub built_at: DateTime<Utc>,
    pub corpus_fingerprint: String,
    pub embedder: String,
}

#[derive(Serialize, Deserialize)]
struct Artifact {
    manifest: IndexManifest,
    vectors: Vec<Vec<f32>>,
}

/// blake3 over the ordered chunk texts, each terminated by a NUL byte.
pub fn corpus_fingerprint(chunks: &[Chunk]) -> String {
    let mut hasher = blake3::Hasher::new();
    for c in chunks {
        hasher.update(c.text.as_bytes());
        hasher.update(&[0]);
    }
    hasher.finalize().to_hex().to_string()
}

pub fn save_index(path: &Path, index: &FlatIpIndex, corpus_fingerprint: &str, embedder: &str) -> Result<IndexManifest> {
    let manifest = IndexManifest {
        format_version: FORMAT_VERSION,
        dim: index.dim(),
        count: index.len(),
        built_at: Utc::now(),
        corpus_fingerprint: corpus_fingerprint.to_string(),
        embedder: embedder.to_string(),
    };
    let artifact = Artifact { manifest: manifest.clone(), vectors: index.vectors().map(<[f32]>::to_vec).collect() };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    {
        let mut w = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer(&mut w, &artifact)?;
        w.flush()?;
    }
    tmp.persist(path).with_context(|| format!("writing vector index to {}", path.display()))?;
    tracing::info!(path = %path.display(), count = manifest.count, dim = manifest.dim, "saved vector index");
    Ok(manifest)
}

pub fn load_index(path: &Path) -> Result<(FlatIpIndex, IndexManifest)> {
    if !path.exists() {
        return Err(Error::NotFound(format!("vector index {}", path.display())).into());
    }
    let file = fs::File::open(path)?;
    let artifact: Artifact = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing vector index {}", path.display()))?;
    let Artifact { manifest, vectors } = artifact;
    if manifest.format_version != FORMAT_VERSION {
        bail!("unsupported vector index format {} (expected {})", manifest.format_version, FORMAT_VERSION);
    }
    if vectors.len() != manifest.count {
        bail!("vector index manifest lists {} vectors but {} are stored", manifest.count, vectors.len());
    }
    let mut index = FlatIpIndex::new(manifest.dim);
    index.add(&vectors)?;
    Ok((index, manifest))
}
