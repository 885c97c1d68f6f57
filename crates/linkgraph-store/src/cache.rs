//! JSON embedding cache keyed by post slug.
//!
//! The cache is consulted before calling a provider and written through on
//! misses. Presence of a record is what makes a post fresh unless a
//! content-hash staleness policy is selected. Records for deleted posts are
//! kept; readers simply never ask for them.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use linkgraph_core::error::{Error, Result};
use linkgraph_core::types::{EmbeddingRecord, Slug};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::atomic::write_json_atomic;

pub const CACHE_VERSION: &str = "1.0";

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    version: String,
    posts: Vec<EmbeddingRecord>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddingCache {
    records: BTreeMap<Slug, EmbeddingRecord>,
}

impl EmbeddingCache {
    pub fn new() -> Self { Self::default() }

    pub fn get(&self, slug: &str) -> Option<&EmbeddingRecord> { self.records.get(slug) }

    pub fn contains(&self, slug: &str) -> bool { self.records.contains_key(slug) }

    /// Insert or replace the record for `record.slug`.
    pub fn insert(&mut self, record: EmbeddingRecord) -> Option<EmbeddingRecord> {
        self.records.insert(record.slug.clone(), record)
    }

    pub fn len(&self) -> usize { self.records.len() }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    /// Length of the cached vectors, taken from the first non-empty record.
    pub fn dimension(&self) -> Option<usize> {
        self.records.values().map(|r| r.embedding.len()).find(|&len| len > 0)
    }

    pub fn records(&self) -> impl Iterator<Item = &EmbeddingRecord> {
        self.records.values()
    }

    /// `(slug, vector)` pairs for the graph builders.
    pub fn vectors(&self) -> impl Iterator<Item = (&str, &[f32])> {
        self.records.values().map(|r| (r.slug.as_str(), r.embedding.as_slice()))
    }
}

impl FromIterator<EmbeddingRecord> for EmbeddingCache {
    fn from_iter<I: IntoIterator<Item = EmbeddingRecord>>(iter: I) -> Self {
        let mut cache = Self::new();
        for record in iter { cache.insert(record); }
        cache
    }
}

/// File-backed store for an [`EmbeddingCache`].
#[derive(Debug, Clone)]
pub struct EmbeddingStore {
    path: PathBuf,
}

impl EmbeddingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    pub fn path(&self) -> &Path { &self.path }

    /// Load the cache; a missing or unreadable file is an empty cache.
    pub fn load(&self) -> EmbeddingCache {
        match self.try_load() {
            Ok(cache) => cache,
            Err(e) => {
                warn!(error = %e, "ignoring embedding cache; all posts will be embedded again");
                EmbeddingCache::new()
            }
        }
    }

    /// Like [`load`](Self::load) but reports corruption as `Error::CacheCorruption`.
    pub fn try_load(&self) -> Result<EmbeddingCache> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no embedding cache yet");
            return Ok(EmbeddingCache::new());
        }
        let corrupt = |reason: String| Error::CacheCorruption { path: self.path.clone(), reason };
        let raw = fs::read_to_string(&self.path).map_err(|e| corrupt(e.to_string()))?;
        let file: CacheFile = serde_json::from_str(&raw).map_err(|e| corrupt(e.to_string()))?;
        if file.version != CACHE_VERSION {
            debug!(version = %file.version, expected = CACHE_VERSION, "reading cache written by another version");
        }
        let cache: EmbeddingCache = file.posts.into_iter().collect();
        info!(records = cache.len(), path = %self.path.display(), "loaded embedding cache");
        Ok(cache)
    }

    /// Overwrite the cache file atomically.
    pub fn save(&self, cache: &EmbeddingCache) -> Result<()> {
        let file = CacheFile {
            version: CACHE_VERSION.to_string(),
            posts: cache.records().cloned().collect(),
        };
        write_json_atomic(&self.path, &file)?;
        debug!(records = cache.len(), path = %self.path.display(), "saved embedding cache");
        Ok(())
    }
}
