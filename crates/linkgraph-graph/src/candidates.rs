//! All-pairs similarity over the posts that have embeddings.

use std::collections::HashMap;

use linkgraph_core::similarity::{cosine_similarity, SimilarityMode};
use linkgraph_core::types::Document;
use rayon::prelude::*;
use tracing::warn;

/// Slug → vector lookup borrowed from the embedding cache.
///
/// Slugs with no matching document are never looked up, so records of
/// deleted posts drop out here.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingIndex<'a> {
    vectors: HashMap<&'a str, &'a [f32]>,
}

impl<'a> EmbeddingIndex<'a> {
    pub fn get(&self, slug: &str) -> Option<&'a [f32]> {
        self.vectors.get(slug).copied().filter(|v| !v.is_empty())
    }
}

impl<'a> FromIterator<(&'a str, &'a [f32])> for EmbeddingIndex<'a> {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a [f32])>>(iter: I) -> Self {
        Self { vectors: iter.into_iter().collect() }
    }
}

/// Similarity of `docs[left]` and `docs[right]`, with `left < right`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredPair {
    pub left: usize,
    pub right: usize,
    pub score: f64,
}

/// Score every unordered pair of `docs` that both have embeddings and keep
/// those with `score >= threshold`.
///
/// Rows run in parallel; the result is in enumeration order (`left`
/// ascending, then `right` ascending) regardless of scheduling. In strict mode
/// a pair with mismatched dimensions is logged and dropped.
pub fn pairwise_similarities(
    docs: &[Document],
    index: &EmbeddingIndex<'_>,
    mode: SimilarityMode,
    threshold: f64,
) -> Vec<ScoredPair> {
    let vectors: Vec<Option<&[f32]>> = docs.iter().map(|d| index.get(&d.slug)).collect();
    let rows: Vec<Vec<ScoredPair>> = (0..docs.len())
        .into_par_iter()
        .map(|left| {
            let Some(a) = vectors[left] else { return Vec::new() };
            let mut row = Vec::new();
            for right in left + 1..docs.len() {
                let Some(b) = vectors[right] else { continue };
                match cosine_similarity(a, b, mode) {
                    Ok(score) if score >= threshold => row.push(ScoredPair { left, right, score }),
                    Ok(_) => {}
                    Err(e) => warn!(
                        left = %docs[left].slug,
                        right = %docs[right].slug,
                        error = %e,
                        "pair skipped"
                    ),
                }
            }
            row
        })
        .collect();
    rows.into_iter().flatten().collect()
}
