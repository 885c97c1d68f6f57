use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Setup failed: {0}")]
    Setup(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Could not read {}: {reason}", path.display())]
    SourceRead { path: PathBuf, reason: String },

    #[error("Embedding cache {} is unreadable: {reason}", path.display())]
    CacheCorruption { path: PathBuf, reason: String },

    #[error("Embedding call failed for '{slug}': {reason}")]
    ExternalCall { slug: String, reason: String },

    #[error("Dimension mismatch: {left} != {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
