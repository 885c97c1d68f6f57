use anyhow::Result;
use linkgraph_core::types::{Document, SearchEntry};
use tracing::info;

use crate::plain_text::{truncate_chars, MarkdownStripper};

pub const DEFAULT_CONTENT_CHARS: usize = 500;

pub struct SearchIndexer {
    stripper: MarkdownStripper,
    content_chars: usize,
}

impl SearchIndexer {
    pub fn new(content_chars: usize) -> Result<Self> {
        Ok(Self { stripper: MarkdownStripper::new()?, content_chars })
    }

    pub fn entry(&self, doc: &Document) -> SearchEntry {
        let plain = self.stripper.strip(&doc.body);
        SearchEntry {
            slug: doc.slug.clone(),
            title: doc.title.clone(),
            excerpt: doc.excerpt.clone(),
            tags: doc.tags.clone(),
            content: truncate_chars(&plain, self.content_chars).to_string(),
            date: doc.date.clone(),
        }
    }

    /// One entry per document, in input order.
    pub fn build(&self, docs: &[Document]) -> Vec<SearchEntry> {
        let entries: Vec<SearchEntry> = docs.iter().map(|d| self.entry(d)).collect();
        info!(entries = entries.len(), max_chars = self.content_chars, "search index built");
        entries
    }
}
