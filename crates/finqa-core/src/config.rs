//! Layered configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` + `config.<env>.toml`
//! + `APP_*` env vars (nested keys separated by `__`, e.g. `APP_RETRIEVAL__TOP_K`).
//! Provides helpers to expand `~` and `${VAR}` and to resolve relative paths
//! against a known base directory.
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::Error;

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(&env_name)
    }

    pub fn load_for_env(env_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file("config.toml"));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            other => tracing::debug!(env = other, "no environment overlay for RUST_ENV"),
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.settings()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Extract and validate the typed settings tree.
    pub fn settings(&self) -> anyhow::Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub models: ModelSettings,
    pub retrieval: RetrievalSettings,
    pub generation: GenerationSettings,
}

impl Settings {
    pub fn validate(&self) -> crate::error::Result<()> {
        let r = &self.retrieval;
        if r.top_k == 0 {
            return Err(Error::InvalidConfig("retrieval.top_k must be at least 1".into()));
        }
        if !(r.dense_scale.is_finite() && r.dense_scale > 0.0) {
            return Err(Error::InvalidConfig("retrieval.dense_scale must be positive".into()));
        }
        if !(r.rrf_k.is_finite() && r.rrf_k > 0.0) {
            return Err(Error::InvalidConfig("retrieval.rrf_k must be positive".into()));
        }
        if r.lexical_weight < 0.0 || r.dense_weight < 0.0 {
            return Err(Error::InvalidConfig("retrieval weights must not be negative".into()));
        }
        let g = &self.generation;
        if g.context_docs == 0 {
            return Err(Error::InvalidConfig("generation.context_docs must be at least 1".into()));
        }
        if g.max_new_tokens == 0 || g.max_input_tokens == 0 || self.models.max_seq_len == 0 {
            return Err(Error::InvalidConfig("token limits must be at least 1".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub corpus_path: String,
    pub vector_index_path: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            corpus_path: "data/processed/financial_data.json".into(),
            vector_index_path: "embeddings/financial_data.index.json".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelBackend {
    #[default]
    Candle,
    Fake,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub backend: ModelBackend,
    pub embedder_dir: String,
    pub cross_encoder_dir: String,
    pub generator_dir: String,
    pub max_seq_len: usize,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            backend: ModelBackend::Candle,
            embedder_dir: "models/all-MiniLM-L6-v2".into(),
            cross_encoder_dir: "models/ms-marco-MiniLM-L-6-v2".into(),
            generator_dir: "models/flan-t5-base".into(),
            max_seq_len: 512,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FusionKind {
    #[default]
    Scaled,
    Rrf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub top_k: usize,
    pub fusion: FusionKind,
    pub dense_scale: f32,
    pub rrf_k: f32,
    pub lexical_weight: f32,
    pub dense_weight: f32,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: 5,
            fusion: FusionKind::Scaled,
            dense_scale: 100.0,
            rrf_k: 60.0,
            lexical_weight: 1.0,
            dense_weight: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub context_docs: usize,
    pub max_new_tokens: usize,
    pub max_input_tokens: usize,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self { context_docs: 3, max_new_tokens: 512, max_input_tokens: 512 }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let s = Settings::default();
        assert!(s.validate().is_ok());
        assert_eq!(s.retrieval.top_k, 5);
        assert_eq!(s.generation.context_docs, 3);
        assert!((s.retrieval.dense_scale - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn zero_top_k_is_rejected() {
        let mut s = Settings::default();
        s.retrieval.top_k = 0;
        assert!(matches!(s.validate(), Err(Error::InvalidConfig(_))));
    }

    fn rejected(edit: impl FnOnce(&mut Settings)) -> bool {
        let mut s = Settings::default();
        edit(&mut s);
        matches!(s.validate(), Err(Error::InvalidConfig(_)))
    }

    #[test]
    fn zero_context_docs_is_rejected() {
        assert!(rejected(|s| s.generation.context_docs = 0));
    }

    #[test]
    fn non_positive_dense_scale_is_rejected() {
        assert!(rejected(|s| s.retrieval.dense_scale = 0.0));
        assert!(rejected(|s| s.retrieval.dense_scale = -1.0));
        assert!(rejected(|s| s.retrieval.dense_scale = f32::NAN));
    }

    #[test]
    fn non_positive_rrf_k_is_rejected() {
        assert!(rejected(|s| s.retrieval.rrf_k = 0.0));
        assert!(rejected(|s| s.retrieval.rrf_k = -60.0));
    }

    #[test]
    fn negative_fusion_weights_are_rejected() {
        assert!(rejected(|s| s.retrieval.lexical_weight = -0.5));
        assert!(rejected(|s| s.retrieval.dense_weight = -0.5));
    }

    #[test]
    fn zero_token_limits_are_rejected() {
        assert!(rejected(|s| s.generation.max_new_tokens = 0));
        assert!(rejected(|s| s.generation.max_input_tokens = 0));
        assert!(rejected(|s| s.models.max_seq_len = 0));
    }

    #[test]
    fn relative_paths_join_base() {
        let base = Path::new("/srv/finqa");
        assert_eq!(resolve_with_base(base, "data/x.json"), PathBuf::from("/srv/finqa/data/x.json"));
        assert_eq!(resolve_with_base(base, "/abs/x.json"), PathBuf::from("/abs/x.json"));
    }
}
