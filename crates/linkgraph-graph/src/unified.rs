//! Unified link graph: explicit wiki-links plus AI suggestions.
//!
//! Built in two phases, and the order is part of the contract:
//!
//! 1. Every resolvable explicit link becomes an `explicit` edge (weight 1.0).
//!    Dangling targets and self-links are dropped. Finished before phase 2.
//! 2. Each post, in input order, ranks the other posts by similarity (lenient
//!    mode), excluding posts it already links to, and keeps the top
//!    `max_suggestions` at or above the threshold. Each suggestion becomes an
//!    `ai` edge unless the pair is already connected by any edge.
//!
//! Suggestions are kept per post independently of the edge list, so a
//! suggestion can appear in backlinks without a matching `ai` edge.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use linkgraph_core::config::GraphParams;
use linkgraph_core::similarity::{round_weight, SimilarityMode};
use linkgraph_core::types::{Document, EdgeKind, GraphEdge, GraphNode, Slug, SuggestedLink};
use tracing::{debug, info};

use crate::candidates::{pairwise_similarities, EmbeddingIndex};
use crate::edges::EdgeSet;
use crate::groups::GroupIndex;
use crate::nodes::build_nodes;

pub const EXPLICIT_WEIGHT: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct LinkGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    /// Ranked suggestions per post; every post has an entry, possibly empty.
    pub suggestions: BTreeMap<Slug, Vec<SuggestedLink>>,
    pub groups: GroupIndex,
}

pub fn build_link_graph(docs: &[Document], index: &EmbeddingIndex<'_>, params: &GraphParams) -> LinkGraph {
    let known: HashSet<&str> = docs.iter().map(|d| d.slug.as_str()).collect();

    let mut edges = EdgeSet::new();
    let explicit = add_explicit_edges(docs, &known, &mut edges);

    let ranked = rank_suggestions(docs, index, params);
    let mut suggestions = BTreeMap::new();
    let mut ai_edges = 0usize;
    for (doc, candidates) in docs.iter().zip(ranked) {
        let mut accepted = Vec::with_capacity(candidates.len());
        for (other, score) in candidates {
            let target = &docs[other];
            let added = edges.insert(GraphEdge {
                source: doc.slug.clone(),
                target: target.slug.clone(),
                weight: round_weight(score),
                kind: Some(EdgeKind::Ai),
            });
            if added {
                ai_edges += 1;
            }
            accepted.push(SuggestedLink { slug: target.slug.clone(), title: target.title.clone(), score: round_weight(score) });
        }
        suggestions.entry(doc.slug.clone()).or_insert(accepted);
    }

    let edges = edges.into_vec();
    let mut groups = GroupIndex::new();
    let nodes = build_nodes(docs, &edges, &mut groups);
    info!(nodes = nodes.len(), explicit, ai = ai_edges, "link graph built");
    LinkGraph { nodes, edges, suggestions, groups }
}

fn add_explicit_edges(docs: &[Document], known: &HashSet<&str>, edges: &mut EdgeSet) -> usize {
    let mut added = 0;
    for doc in docs {
        for target in &doc.explicit_links {
            if target == &doc.slug {
                continue;
            }
            if !known.contains(target.as_str()) {
                debug!(source = %doc.slug, target = %target, "dangling wiki-link dropped");
                continue;
            }
            let inserted = edges.insert(GraphEdge {
                source: doc.slug.clone(),
                target: target.clone(),
                weight: EXPLICIT_WEIGHT,
                kind: Some(EdgeKind::Explicit),
            });
            if inserted {
                added += 1;
            }
        }
    }
    added
}

/// `(other index, raw score)` per post, best first, ties by input order.
fn rank_suggestions(docs: &[Document], index: &EmbeddingIndex<'_>, params: &GraphParams) -> Vec<Vec<(usize, f64)>> {
    let mut neighbours: Vec<Vec<(usize, f64)>> = vec![Vec::new(); docs.len()];
    for pair in pairwise_similarities(docs, index, SimilarityMode::Lenient, params.threshold) {
        neighbours[pair.left].push((pair.right, pair.score));
        neighbours[pair.right].push((pair.left, pair.score));
    }
    for (i, list) in neighbours.iter_mut().enumerate() {
        let doc = &docs[i];
        list.retain(|&(other, _)| docs[other].slug != doc.slug && !doc.links_to(&docs[other].slug));
        list.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0)));
        list.truncate(params.max_suggestions);
    }
    neighbours
}
