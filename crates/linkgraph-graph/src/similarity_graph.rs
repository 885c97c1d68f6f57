//! Similarity-only graph for the standalone visualization.
//!
//! Qualifying pairs are sorted by score (stable, so ties keep enumeration
//! order) and accepted greedily while both endpoints are under
//! `max_edges_per_node`.

use std::cmp::Ordering;

use linkgraph_core::config::GraphParams;
use linkgraph_core::similarity::{round_weight, SimilarityMode};
use linkgraph_core::types::{Document, GraphEdge, GraphNode};
use tracing::info;

use crate::candidates::{pairwise_similarities, EmbeddingIndex};
use crate::edges::EdgeSet;
use crate::groups::GroupIndex;
use crate::nodes::build_nodes;

#[derive(Debug, Clone)]
pub struct SimilarityGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub groups: GroupIndex,
}

pub fn build_similarity_graph(docs: &[Document], index: &EmbeddingIndex<'_>, params: &GraphParams) -> SimilarityGraph {
    let mut pairs = pairwise_similarities(docs, index, SimilarityMode::Strict, params.threshold);
    pairs.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    let mut degree = vec![0usize; docs.len()];
    let mut edges = EdgeSet::new();
    for pair in &pairs {
        if degree[pair.left] >= params.max_edges_per_node || degree[pair.right] >= params.max_edges_per_node {
            continue;
        }
        let accepted = edges.insert(GraphEdge {
            source: docs[pair.left].slug.clone(),
            target: docs[pair.right].slug.clone(),
            weight: round_weight(pair.score),
            kind: None,
        });
        if accepted {
            degree[pair.left] += 1;
            degree[pair.right] += 1;
        }
    }

    let edges = edges.into_vec();
    let mut groups = GroupIndex::new();
    let nodes = build_nodes(docs, &edges, &mut groups);
    info!(
        nodes = nodes.len(),
        candidates = pairs.len(),
        edges = edges.len(),
        threshold = params.threshold,
        "similarity graph built"
    );
    SimilarityGraph { nodes, edges, groups }
}
