//! Domain types shared by the reader, the graph builders and the JSON artifacts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type Slug = String;

/// One post as read from the content directory.
///
/// - `slug`: unique, URL-safe identity (explicit `slug` field or file stem)
/// - `tags`: ordered; the first tag is the primary one used for grouping
/// - `explicit_links`: normalized `[[target]]` slugs, deduplicated, in first-occurrence order
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub slug: Slug,
    pub title: String,
    pub tags: Vec<String>,
    pub date: String,
    pub excerpt: Option<String>,
    pub draft: bool,
    pub body: String,
    pub explicit_links: Vec<Slug>,
}

impl Document {
    pub fn primary_tag(&self) -> Option<&str> {
        self.tags.first().map(String::as_str)
    }

    pub fn links_to(&self, slug: &str) -> bool {
        self.explicit_links.iter().any(|l| l == slug)
    }
}

/// Cached vector for one post. `title`/`tags` are copied at generation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingRecord {
    pub slug: Slug,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub embedding: Vec<f32>,
    #[serde(default)]
    pub updated_at: String,
    /// blake3 of the embedding input text; absent in caches written before it existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: Slug,
    pub title: String,
    pub tags: Vec<String>,
    pub group: usize,
    pub connections: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Explicit,
    Ai,
}

/// A relation between two posts. Stored directed, compared unordered.
///
/// `kind` is omitted from the similarity-graph artifact, where every edge is
/// similarity-derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: Slug,
    pub target: Slug,
    pub weight: f64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<EdgeKind>,
}

impl GraphEdge {
    pub fn touches(&self, slug: &str) -> bool {
        self.source == slug || self.target == slug
    }

    /// Order-independent identity of the endpoint pair.
    pub fn pair_key(&self) -> (Slug, Slug) {
        pair_key(&self.source, &self.target)
    }
}

pub fn pair_key(a: &str, b: &str) -> (Slug, Slug) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRef {
    pub slug: Slug,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedLink {
    pub slug: Slug,
    pub title: String,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacklinksEntry {
    pub explicit: Vec<LinkRef>,
    pub ai_suggested: Vec<SuggestedLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostMeta {
    pub title: String,
    pub tags: Vec<String>,
    pub excerpt: Option<String>,
}

/// `graph-data.json`: the standalone similarity visualization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub generated_at: String,
}

/// `links.json`: unified explicit + AI graph with backlinks for the explorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinksData {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub backlinks: BTreeMap<Slug, BacklinksEntry>,
    pub post_meta: BTreeMap<Slug, PostMeta>,
    pub generated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchEntry {
    pub slug: Slug,
    pub title: String,
    pub excerpt: Option<String>,
    pub tags: Vec<String>,
    pub content: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchIndex {
    pub entries: Vec<SearchEntry>,
    pub generated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_key_ignores_direction() {
        assert_eq!(pair_key("b", "a"), pair_key("a", "b"));
    }

    #[test]
    fn edge_type_serializes_lowercase_and_is_optional() {
        let ai = GraphEdge { source: "a".into(), target: "b".into(), weight: 0.9, kind: Some(EdgeKind::Ai) };
        let json = serde_json::to_value(&ai).unwrap();
        assert_eq!(json["type"], "ai");

        let plain = GraphEdge { kind: None, ..ai };
        let json = serde_json::to_value(&plain).unwrap();
        assert!(json.get("type").is_none());
    }

    #[test]
    fn backlinks_use_camel_case() {
        let entry = BacklinksEntry {
            explicit: vec![],
            ai_suggested: vec![SuggestedLink { slug: "x".into(), title: "X".into(), score: 0.7 }],
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["aiSuggested"][0]["score"], 0.7);
    }

    #[test]
    fn embedding_record_accepts_legacy_shape() {
        let raw = r#"{"slug":"a","title":"A","tags":["rust"],"embedding":[0.1,0.2],"updatedAt":"2024-01-01T00:00:00Z"}"#;
        let rec: EmbeddingRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(rec.content_hash, None);
        assert_eq!(rec.embedding.len(), 2);
    }
}
