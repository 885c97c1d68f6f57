//! Fill the embedding cache for posts that have no fresh record.
//!
//! Calls are sequential with a fixed pause between them. A failed call is
//! logged and the post is left without an embedding for this run. The cache
//! is saved every `checkpoint_every` new embeddings and once at the end, so an
//! interrupted run keeps what it already paid for.

use std::thread;
use std::time::Duration;

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use linkgraph_core::config::{CacheSettings, EmbeddingSettings, StalenessPolicy};
use linkgraph_core::error::{Error, Result};
use linkgraph_core::traits::Embedder;
use linkgraph_core::types::{Document, EmbeddingRecord};
use linkgraph_embed::embedding_input;
use tracing::{info, warn};

use crate::cache::{EmbeddingCache, EmbeddingStore};

#[derive(Debug, Clone)]
pub struct GenerationOptions {
    pub staleness: StalenessPolicy,
    pub request_delay: Duration,
    pub checkpoint_every: usize,
    pub show_progress: bool,
}

impl GenerationOptions {
    pub fn from_settings(cache: &CacheSettings, embedding: &EmbeddingSettings) -> Self {
        Self {
            staleness: cache.staleness,
            request_delay: Duration::from_millis(embedding.request_delay_ms),
            checkpoint_every: cache.checkpoint_every.max(1),
            show_progress: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Posts whose cached record was reused.
    pub cached: usize,
    pub generated: usize,
    pub failed: usize,
}

fn hash_content(s: &str) -> String {
    blake3::hash(s.as_bytes()).to_hex().to_string()
}

fn is_fresh(record: Option<&EmbeddingRecord>, policy: StalenessPolicy, content_hash: &str) -> bool {
    match (record, policy) {
        (None, _) => false,
        (Some(_), StalenessPolicy::None) => true,
        (Some(r), StalenessPolicy::ContentHash) => r.content_hash.as_deref() == Some(content_hash),
    }
}

fn progress_bar(len: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} posts ({percent}%) {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

/// Embed every post in `docs` that lacks a fresh cache record and persist the
/// result through `store`.
///
/// Only write failures are returned as errors; provider failures are counted
/// in the report.
pub fn generate_missing(
    store: &EmbeddingStore,
    cache: &mut EmbeddingCache,
    docs: &[Document],
    embedder: &dyn Embedder,
    opts: &GenerationOptions,
) -> Result<GenerationReport> {
    let mut report = GenerationReport::default();
    let mut pending = Vec::new();
    for doc in docs {
        let input = embedding_input(doc);
        let content_hash = hash_content(&input);
        if is_fresh(cache.get(&doc.slug), opts.staleness, &content_hash) {
            report.cached += 1;
        } else {
            pending.push((doc, input, content_hash));
        }
    }
    info!(cached = report.cached, pending = pending.len(), embedder = embedder.embedder_id(), "embedding posts");
    if pending.is_empty() {
        return Ok(report);
    }

    let pb = progress_bar(pending.len(), opts.show_progress);
    let mut unsaved = 0usize;
    for (i, (doc, input, content_hash)) in pending.iter().enumerate() {
        if i > 0 && !opts.request_delay.is_zero() {
            thread::sleep(opts.request_delay);
        }
        pb.set_message(doc.slug.clone());
        match embed_one(cache, embedder, doc, input) {
            Ok(embedding) => {
                cache.insert(EmbeddingRecord {
                    slug: doc.slug.clone(),
                    title: doc.title.clone(),
                    tags: doc.tags.clone(),
                    embedding,
                    updated_at: Utc::now().to_rfc3339(),
                    content_hash: Some(content_hash.clone()),
                });
                report.generated += 1;
                unsaved += 1;
                if unsaved >= opts.checkpoint_every {
                    store.save(cache)?;
                    unsaved = 0;
                }
            }
            Err(e) => {
                warn!(slug = %doc.slug, error = %e, "embedding failed; post skipped this run");
                report.failed += 1;
            }
        }
        pb.inc(1);
    }
    if unsaved > 0 {
        store.save(cache)?;
    }
    pb.finish_with_message("done");
    info!(generated = report.generated, failed = report.failed, cached = report.cached, "embedding pass finished");
    Ok(report)
}

fn embed_one(cache: &EmbeddingCache, embedder: &dyn Embedder, doc: &Document, input: &str) -> Result<Vec<f32>> {
    let call_failed = |reason: String| Error::ExternalCall { slug: doc.slug.clone(), reason };
    let embedding = embedder.embed_text(input).map_err(|e| call_failed(format!("{e:#}")))?;
    let expected = cache.dimension().unwrap_or_else(|| embedder.dim());
    if embedding.is_empty() || (expected > 0 && embedding.len() != expected) {
        return Err(call_failed(format!(
            "got a {}-dimensional vector, expected {}",
            embedding.len(),
            expected
        )));
    }
    Ok(embedding)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(hash: Option<&str>) -> EmbeddingRecord {
        EmbeddingRecord {
            slug: "a".into(),
            title: "A".into(),
            tags: vec![],
            embedding: vec![1.0],
            updated_at: String::new(),
            content_hash: hash.map(str::to_string),
        }
    }

    #[test]
    fn presence_is_freshness_without_hash_policy() {
        assert!(is_fresh(Some(&record(None)), StalenessPolicy::None, "h"));
        assert!(!is_fresh(None, StalenessPolicy::None, "h"));
    }

    #[test]
    fn content_hash_policy_compares_hashes() {
        assert!(is_fresh(Some(&record(Some("h"))), StalenessPolicy::ContentHash, "h"));
        assert!(!is_fresh(Some(&record(Some("old"))), StalenessPolicy::ContentHash, "h"));
        assert!(!is_fresh(Some(&record(None)), StalenessPolicy::ContentHash, "h"));
    }
}
