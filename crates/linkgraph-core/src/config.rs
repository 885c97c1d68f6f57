//! Configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `linkgraph.toml` +
//! `linkgraph.<env>.toml` + `APP_*` env vars (nested keys split on `__`,
//! e.g. `APP_GRAPH__THRESHOLD=0.7`). Relative paths resolve against the
//! directory the config was loaded from.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub struct Config {
    figment: Figment,
    base_dir: PathBuf,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_from(&env::current_dir()?, &env_name)
    }

    pub fn load_from(base_dir: &Path, env_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(base_dir.join("linkgraph.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(base_dir.join("linkgraph.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(base_dir.join("linkgraph.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(base_dir.join("linkgraph.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment, base_dir: base_dir.to_path_buf() };
        config.settings()?;
        Ok(config)
    }

    /// Typed, validated settings with every path resolved against the base dir.
    pub fn settings(&self) -> anyhow::Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to parse configuration: {}", e))?;
        settings.validate()?;
        Ok(settings.resolve_paths(&self.base_dir))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub content: ContentSettings,
    pub cache: CacheSettings,
    pub embedding: EmbeddingSettings,
    pub graph: GraphParams,
    pub output: OutputSettings,
    pub search: SearchSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.graph.threshold) {
            return Err(Error::InvalidConfig(format!(
                "graph.threshold must be within [0, 1], got {}",
                self.graph.threshold
            )));
        }
        if self.content.extensions.is_empty() {
            return Err(Error::InvalidConfig("content.extensions must not be empty".to_string()));
        }
        if self.cache.checkpoint_every == 0 {
            return Err(Error::InvalidConfig("cache.checkpoint_every must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn resolve_paths(mut self, base: &Path) -> Self {
        let resolve = |p: &PathBuf| resolve_with_base(base, p.to_string_lossy());
        self.content.posts_dir = resolve(&self.content.posts_dir);
        self.cache.path = resolve(&self.cache.path);
        self.output.graph_path = resolve(&self.output.graph_path);
        self.output.links_path = resolve(&self.output.links_path);
        self.output.search_path = resolve(&self.output.search_path);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentSettings {
    pub posts_dir: PathBuf,
    pub extensions: Vec<String>,
    pub include_drafts: bool,
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self {
            posts_dir: PathBuf::from("src/content/posts"),
            extensions: vec!["md".to_string(), "mdx".to_string()],
            include_drafts: false,
        }
    }
}

/// When a cached embedding counts as fresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StalenessPolicy {
    /// Any cached record for the slug is trusted, whatever the post now says.
    #[default]
    None,
    /// Regenerate when the hash of the embedding input text changed.
    ContentHash,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub path: PathBuf,
    pub staleness: StalenessPolicy,
    pub checkpoint_every: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("src/data/embeddings-cache.json"),
            staleness: StalenessPolicy::None,
            checkpoint_every: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    #[default]
    OpenAi,
    Fake,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub provider: EmbeddingProvider,
    pub model: String,
    pub base_url: String,
    pub dimensions: usize,
    pub api_key: Option<String>,
    pub request_delay_ms: u64,
    pub timeout_secs: u64,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: EmbeddingProvider::OpenAi,
            model: "text-embedding-3-small".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            dimensions: 1536,
            api_key: None,
            request_delay_ms: 200,
            timeout_secs: 30,
        }
    }
}

impl EmbeddingSettings {
    /// Configured key, falling back to `OPENAI_API_KEY`.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| env::var("OPENAI_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
    }
}

/// Shared knobs for both graph algorithms.
///
/// `max_edges_per_node` bounds the similarity graph; `max_suggestions` bounds
/// the per-post AI suggestions of the unified link graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphParams {
    pub threshold: f64,
    pub max_edges_per_node: usize,
    pub max_suggestions: usize,
}

impl Default for GraphParams {
    fn default() -> Self {
        Self { threshold: 0.65, max_edges_per_node: 5, max_suggestions: 5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub graph_path: PathBuf,
    pub links_path: PathBuf,
    pub search_path: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            graph_path: PathBuf::from("public/graph-data.json"),
            links_path: PathBuf::from("src/data/links.json"),
            search_path: PathBuf::from("public/search-index.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub content_chars: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { content_chars: 500 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}

/// Expand a user-provided path string (`~` and `${VAR}`/`$VAR`) without canonicalizing.
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Expand `p`, then join it onto `base` unless it is already absolute.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_pipeline_constants() {
        let s = Settings::default();
        assert!((s.graph.threshold - 0.65).abs() < f64::EPSILON);
        assert_eq!(s.graph.max_edges_per_node, 5);
        assert_eq!(s.graph.max_suggestions, 5);
        assert_eq!(s.cache.staleness, StalenessPolicy::None);
        assert_eq!(s.search.content_chars, 500);
    }

    #[test]
    fn threshold_out_of_range_is_rejected() {
        let mut s = Settings::default();
        s.graph.threshold = 1.5;
        assert!(matches!(s.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn relative_paths_resolve_against_base() {
        let base = Path::new("/srv/blog");
        assert_eq!(resolve_with_base(base, "public/a.json"), PathBuf::from("/srv/blog/public/a.json"));
        assert_eq!(resolve_with_base(base, "/tmp/a.json"), PathBuf::from("/tmp/a.json"));
    }
}
