//! linkgraph-search
//!
//! Client-side search index: one entry per post with its metadata and the
//! first few hundred characters of the body as plain text.

pub mod index;
pub mod plain_text;

pub use index::SearchIndexer;
pub use plain_text::MarkdownStripper;
