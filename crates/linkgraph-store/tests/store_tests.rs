use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use linkgraph_core::config::StalenessPolicy;
use linkgraph_core::error::Error;
use linkgraph_core::traits::Embedder;
use linkgraph_core::types::{Document, EmbeddingRecord};
use linkgraph_embed::FakeEmbedder;
use linkgraph_store::{generate_missing, EmbeddingCache, EmbeddingStore, GenerationOptions};

fn doc(slug: &str, title: &str) -> Document {
    Document {
        slug: slug.into(),
        title: title.into(),
        tags: vec!["rust".into()],
        date: "2024-01-01".into(),
        excerpt: None,
        draft: false,
        body: String::new(),
        explicit_links: vec![],
    }
}

fn record(slug: &str, embedding: Vec<f32>) -> EmbeddingRecord {
    EmbeddingRecord {
        slug: slug.into(),
        title: slug.to_uppercase(),
        tags: vec![],
        embedding,
        updated_at: "2024-01-01T00:00:00Z".into(),
        content_hash: None,
    }
}

fn quiet_opts(staleness: StalenessPolicy, checkpoint_every: usize) -> GenerationOptions {
    GenerationOptions { staleness, request_delay: Duration::ZERO, checkpoint_every, show_progress: false }
}

/// Wraps the fake embedder, counts calls and fails for inputs containing `fail_on`.
struct ScriptedEmbedder {
    inner: FakeEmbedder,
    fail_on: Option<&'static str>,
    calls: AtomicUsize,
}

impl ScriptedEmbedder {
    fn new(dim: usize, fail_on: Option<&'static str>) -> Self {
        Self { inner: FakeEmbedder::new(dim), fail_on, calls: AtomicUsize::new(0) }
    }

    fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }
}

impl Embedder for ScriptedEmbedder {
    fn embedder_id(&self) -> &str { "scripted" }

    fn dim(&self) -> usize { self.inner.dim() }

    fn embed_text(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(needle) = self.fail_on {
            if text.contains(needle) {
                anyhow::bail!("provider returned 500");
            }
        }
        self.inner.embed_text(text)
    }
}

#[test]
fn missing_cache_file_loads_empty() {
    let tmp = tempfile::TempDir::new().unwrap();
    let store = EmbeddingStore::new(tmp.path().join("nope.json"));
    assert!(store.try_load().unwrap().is_empty());
}

#[test]
fn corrupt_cache_is_reported_and_treated_as_empty() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("cache.json");
    fs::write(&path, "{ not json").unwrap();
    let store = EmbeddingStore::new(&path);

    assert!(matches!(store.try_load(), Err(Error::CacheCorruption { .. })));
    assert!(store.load().is_empty());
}

#[test]
fn save_then_load_reproduces_records() {
    let tmp = tempfile::TempDir::new().unwrap();
    let store = EmbeddingStore::new(tmp.path().join("data/cache.json"));
    let cache: EmbeddingCache = vec![record("a", vec![0.1, 0.2]), record("b", vec![0.3, 0.4])].into_iter().collect();
    store.save(&cache).unwrap();

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
    assert_eq!(raw["version"], "1.0");
    assert_eq!(raw["posts"][0]["updatedAt"], "2024-01-01T00:00:00Z");

    assert_eq!(store.load(), cache);
}

#[test]
fn cached_posts_are_not_embedded_again() {
    let tmp = tempfile::TempDir::new().unwrap();
    let store = EmbeddingStore::new(tmp.path().join("cache.json"));
    let embedder = ScriptedEmbedder::new(16, None);
    let mut cache: EmbeddingCache = std::iter::once(record("a", vec![1.0; 16])).collect();
    let docs = vec![doc("a", "Edited title"), doc("b", "New post")];

    let report = generate_missing(&store, &mut cache, &docs, &embedder, &quiet_opts(StalenessPolicy::None, 10)).unwrap();

    assert_eq!((report.cached, report.generated, report.failed), (1, 1, 0));
    assert_eq!(embedder.calls(), 1);
    assert_eq!(cache.get("a").unwrap().embedding, vec![1.0; 16], "presence means fresh");
    assert!(cache.get("b").unwrap().content_hash.is_some());
    assert_eq!(store.load().len(), 2);
}

#[test]
fn content_hash_policy_regenerates_edited_posts() {
    let tmp = tempfile::TempDir::new().unwrap();
    let store = EmbeddingStore::new(tmp.path().join("cache.json"));
    let embedder = ScriptedEmbedder::new(16, None);
    let mut cache = EmbeddingCache::new();
    let opts = quiet_opts(StalenessPolicy::ContentHash, 10);

    generate_missing(&store, &mut cache, &[doc("a", "First title")], &embedder, &opts).unwrap();
    let again = generate_missing(&store, &mut cache, &[doc("a", "First title")], &embedder, &opts).unwrap();
    assert_eq!((again.cached, again.generated), (1, 0));

    let edited = generate_missing(&store, &mut cache, &[doc("a", "Second title")], &embedder, &opts).unwrap();
    assert_eq!(edited.generated, 1);
    assert_eq!(embedder.calls(), 2);
}

#[test]
fn failed_call_is_skipped_and_run_continues() {
    let tmp = tempfile::TempDir::new().unwrap();
    let store = EmbeddingStore::new(tmp.path().join("cache.json"));
    let embedder = ScriptedEmbedder::new(8, Some("Broken"));
    let mut cache = EmbeddingCache::new();
    let docs = vec![doc("a", "Fine"), doc("b", "Broken"), doc("c", "Also fine")];

    let report = generate_missing(&store, &mut cache, &docs, &embedder, &quiet_opts(StalenessPolicy::None, 10)).unwrap();

    assert_eq!((report.generated, report.failed), (2, 1));
    assert!(!cache.contains("b"));
    let saved = store.load();
    assert!(saved.contains("a") && saved.contains("c"));
}

#[test]
fn vectors_of_a_different_dimension_are_rejected() {
    let tmp = tempfile::TempDir::new().unwrap();
    let store = EmbeddingStore::new(tmp.path().join("cache.json"));
    let mut cache: EmbeddingCache = std::iter::once(record("old", vec![0.5; 4])).collect();
    let embedder = ScriptedEmbedder::new(8, None);

    let report = generate_missing(&store, &mut cache, &[doc("new", "New")], &embedder, &quiet_opts(StalenessPolicy::None, 10)).unwrap();

    assert_eq!((report.generated, report.failed), (0, 1));
    assert!(!cache.contains("new"));
}

/// Records how many records the on-disk cache holds at each call.
struct DiskWatcher {
    inner: FakeEmbedder,
    store: EmbeddingStore,
    seen: std::sync::Mutex<Vec<usize>>,
}

impl Embedder for DiskWatcher {
    fn embedder_id(&self) -> &str { "watcher" }

    fn dim(&self) -> usize { self.inner.dim() }

    fn embed_text(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        self.seen.lock().unwrap().push(self.store.load().len());
        self.inner.embed_text(text)
    }
}

#[test]
fn checkpoints_save_progress_during_the_run() {
    let tmp = tempfile::TempDir::new().unwrap();
    let store = EmbeddingStore::new(tmp.path().join("cache.json"));
    let watcher = DiskWatcher { inner: FakeEmbedder::new(8), store: store.clone(), seen: Default::default() };
    let mut cache = EmbeddingCache::new();
    let docs: Vec<Document> = (0..5).map(|i| doc(&format!("p{i}"), &format!("Post {i}"))).collect();

    let report = generate_missing(&store, &mut cache, &docs, &watcher, &quiet_opts(StalenessPolicy::None, 2)).unwrap();

    assert_eq!(report.generated, 5);
    assert_eq!(*watcher.seen.lock().unwrap(), vec![0, 0, 2, 2, 4]);
    assert_eq!(store.load().len(), 5);
    let files = fs::read_dir(tmp.path()).unwrap().count();
    assert_eq!(files, 1, "no temp files left beside the cache");
}

#[test]
fn deleted_posts_stay_in_the_cache() {
    let tmp = tempfile::TempDir::new().unwrap();
    let store = EmbeddingStore::new(tmp.path().join("cache.json"));
    let embedder = ScriptedEmbedder::new(8, None);
    let mut cache: EmbeddingCache = std::iter::once(record("gone", vec![0.5; 8])).collect();

    generate_missing(&store, &mut cache, &[doc("kept", "Kept")], &embedder, &quiet_opts(StalenessPolicy::None, 10)).unwrap();

    let saved = store.load();
    assert!(saved.contains("gone"));
    assert!(saved.contains("kept"));
}
