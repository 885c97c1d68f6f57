/// Text → vector capability. Implementations must return vectors of
/// `dim()` length for every successful call.
pub trait Embedder: Send + Sync {
    /// Stable identifier for the provider/model (e.g. `openai:text-embedding-3-small`).
    fn embedder_id(&self) -> &str;
    /// Embedding dimensionality (D).
    fn dim(&self) -> usize;
    fn embed_text(&self, text: &str) -> anyhow::Result<Vec<f32>>;
}
