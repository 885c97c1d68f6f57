use linkgraph_core::config::{EmbeddingProvider, EmbeddingSettings};
use linkgraph_core::error::Error;
use linkgraph_core::traits::Embedder;
use linkgraph_embed::{get_default_embedder, FakeEmbedder};

#[test]
fn fake_embedder_shapes_and_determinism() {
    let embedder = FakeEmbedder::new(64);
    let v1 = embedder.embed_text("hello world").expect("embed");
    let v2 = embedder.embed_text("hello world").expect("embed");

    assert_eq!(v1.len(), 64, "embedding dim is 64");

    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    for (a, b) in v1.iter().zip(v2.iter()) { assert!((a - b).abs() <= 1e-6); }
}

#[test]
fn fake_embedder_separates_different_texts() {
    let embedder = FakeEmbedder::new(256);
    let a = embedder.embed_text("rust ownership borrowing").expect("embed");
    let b = embedder.embed_text("sourdough bread hydration").expect("embed");
    assert_ne!(a, b);
}

#[test]
fn fake_provider_is_selected_from_settings() {
    let settings = EmbeddingSettings { provider: EmbeddingProvider::Fake, dimensions: 32, ..Default::default() };
    let embedder = get_default_embedder(&settings).expect("fake embedder");
    assert_eq!(embedder.dim(), 32);
    assert!(embedder.embedder_id().starts_with("fake:"));
}

#[test]
fn missing_api_key_is_a_setup_error() {
    if std::env::var("APP_USE_FAKE_EMBEDDINGS").is_ok() {
        return;
    }
    let settings = EmbeddingSettings { api_key: Some("   ".to_string()), ..Default::default() };
    let err = get_default_embedder(&settings).err().expect("must fail without a key");
    assert!(matches!(err, Error::Setup(_)), "got {err}");
}
