//! linkgraph-store
//!
//! Persistence for the pipeline: the slug-keyed embedding cache, the pass that
//! fills it from an embedding provider, and all-or-nothing JSON file writes.

pub mod atomic;
pub mod cache;
pub mod generate;

pub use atomic::write_json_atomic;
pub use cache::{EmbeddingCache, EmbeddingStore, CACHE_VERSION};
pub use generate::{generate_missing, GenerationOptions, GenerationReport};
