use std::collections::HashSet;

use linkgraph_core::types::{GraphEdge, Slug};

/// Edge list that holds at most one edge per unordered endpoint pair.
/// The first edge inserted for a pair wins.
#[derive(Debug, Clone, Default)]
pub struct EdgeSet {
    edges: Vec<GraphEdge>,
    pairs: HashSet<(Slug, Slug)>,
}

impl EdgeSet {
    pub fn new() -> Self { Self::default() }

    /// Returns false, leaving the set unchanged, when the pair is taken.
    pub fn insert(&mut self, edge: GraphEdge) -> bool {
        if !self.pairs.insert(edge.pair_key()) {
            return false;
        }
        self.edges.push(edge);
        true
    }

    pub fn into_vec(self) -> Vec<GraphEdge> { self.edges }
}
