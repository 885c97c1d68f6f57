//! Embedding providers for posts.
//!
//! `get_default_embedder` picks the OpenAI-compatible client or, when
//! `APP_USE_FAKE_EMBEDDINGS=1` / `embedding.provider = "fake"`, a deterministic
//! hashing embedder for tests and offline development.

use std::hash::{Hash, Hasher};

use anyhow::Result;
use linkgraph_core::config::{EmbeddingProvider, EmbeddingSettings};
use linkgraph_core::error::Error;
use linkgraph_core::traits::Embedder;
use linkgraph_core::types::Document;
use twox_hash::XxHash64;

pub mod openai;

pub use openai::OpenAiEmbedder;

/// Text sent to the embedding model for a post: title, tags and excerpt.
/// The body is left out to keep requests small and cheap.
pub fn embedding_input(doc: &Document) -> String {
    let mut parts = vec![doc.title.clone()];
    if !doc.tags.is_empty() {
        parts.push(doc.tags.join(", "));
    }
    if let Some(excerpt) = doc.excerpt.as_deref().filter(|e| !e.trim().is_empty()) {
        parts.push(excerpt.to_string());
    }
    parts.join("\n")
}

/// Token-hashing embedder: same text, same L2-normalized vector.
pub struct FakeEmbedder {
    dim: usize,
    id: String,
}

impl FakeEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim, id: format!("fake:xxhash:d{dim}") }
    }
}

impl Embedder for FakeEmbedder {
    fn embedder_id(&self) -> &str { &self.id }

    fn dim(&self) -> usize { self.dim }

    fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let mut v = vec![0f32; self.dim];
        if self.dim == 0 {
            return Ok(v);
        }
        for (i, token) in text.split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.to_lowercase().hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val + (i as f32 % 3.0) * 0.01;
        }
        let norm = (v.iter().map(|x| x * x).sum::<f32>()).sqrt().max(1e-6);
        for x in &mut v { *x /= norm; }
        Ok(v)
    }
}

fn fake_requested() -> bool {
    std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Build the configured embedder.
///
/// Fails with `Error::Setup` when the OpenAI provider is selected and no API
/// key is configured.
pub fn get_default_embedder(settings: &EmbeddingSettings) -> Result<Box<dyn Embedder>, Error> {
    if fake_requested() || settings.provider == EmbeddingProvider::Fake {
        tracing::info!(dim = settings.dimensions, "using fake embedder");
        return Ok(Box::new(FakeEmbedder::new(settings.dimensions)));
    }
    let api_key = settings.resolved_api_key().ok_or_else(|| {
        Error::Setup("no embedding API key: set embedding.api_key or OPENAI_API_KEY".to_string())
    })?;
    let embedder = OpenAiEmbedder::new(api_key, settings).map_err(|e| Error::Setup(format!("{e:#}")))?;
    tracing::info!(model = %settings.model, "using OpenAI embedder");
    Ok(Box::new(embedder))
}
