//! Assemble and write the JSON artifacts read by the site.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use linkgraph_core::types::{Document, GraphData, LinksData, SearchEntry, SearchIndex};
use linkgraph_graph::{aggregate_backlinks, post_meta, LinkGraph, SimilarityGraph};
use linkgraph_store::write_json_atomic;
use serde::Serialize;
use tracing::info;

pub fn generated_at() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn graph_data(graph: SimilarityGraph) -> GraphData {
    GraphData { nodes: graph.nodes, edges: graph.edges, generated_at: generated_at() }
}

pub fn links_data(docs: &[Document], graph: LinkGraph) -> LinksData {
    LinksData {
        backlinks: aggregate_backlinks(docs, &graph.suggestions),
        post_meta: post_meta(docs),
        nodes: graph.nodes,
        edges: graph.edges,
        generated_at: generated_at(),
    }
}

pub fn search_index(entries: Vec<SearchEntry>) -> SearchIndex {
    SearchIndex { entries, generated_at: generated_at() }
}

/// All-or-nothing write; a failure leaves the previous artifact in place.
pub fn write_artifact<T: Serialize>(path: &Path, artifact: &T) -> Result<()> {
    write_json_atomic(path, artifact).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "artifact written");
    Ok(())
}
