//! Blocking client for OpenAI-compatible `/embeddings` endpoints.

use std::time::Duration;

use anyhow::{Context, Result};
use linkgraph_core::config::EmbeddingSettings;
use linkgraph_core::traits::Embedder;
use reqwest::blocking::Client;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

/// One request per text; failures surface to the caller, which logs and skips.
pub struct OpenAiEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    dimensions: usize,
    id: String,
}

impl OpenAiEmbedder {
    pub fn new(api_key: String, settings: &EmbeddingSettings) -> Result<Self> {
        anyhow::ensure!(!api_key.trim().is_empty(), "missing OpenAI API key");
        anyhow::ensure!(!settings.model.trim().is_empty(), "missing embedding model name");
        let mut headers = reqwest::header::HeaderMap::new();
        let auth = format!("Bearer {}", api_key.trim());
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&auth).context("invalid OpenAI API key")?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .default_headers(headers)
            .build()
            .context("failed to build embeddings HTTP client")?;
        let endpoint = format!("{}/embeddings", settings.base_url.trim_end_matches('/'));
        Ok(Self {
            client,
            endpoint,
            model: settings.model.clone(),
            dimensions: settings.dimensions,
            id: format!("openai:{}:d{}", settings.model, settings.dimensions),
        })
    }
}

impl Embedder for OpenAiEmbedder {
    fn embedder_id(&self) -> &str { &self.id }

    fn dim(&self) -> usize { self.dimensions }

    fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest { model: &self.model, input: text, dimensions: Some(self.dimensions) };
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .context("embeddings request failed")?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_else(|_| "<body unavailable>".to_string());
            anyhow::bail!("embeddings request failed ({}): {}", status, body);
        }
        let parsed: EmbeddingResponse = resp.json().context("failed to parse embedding response")?;
        parsed
            .data
            .into_iter()
            .next()
            .map(|entry| entry.embedding)
            .context("embedding response contained no data")
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}
