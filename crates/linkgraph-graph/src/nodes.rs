use std::collections::HashMap;

use linkgraph_core::types::{Document, GraphEdge, GraphNode};

use crate::groups::GroupIndex;

/// One node per document in input order, with `connections` counted from
/// the finished edge list. Every document gets a node, linked or not.
pub fn build_nodes(docs: &[Document], edges: &[GraphEdge], groups: &mut GroupIndex) -> Vec<GraphNode> {
    let mut degree: HashMap<&str, usize> = HashMap::new();
    for edge in edges {
        *degree.entry(edge.source.as_str()).or_default() += 1;
        if edge.target != edge.source {
            *degree.entry(edge.target.as_str()).or_default() += 1;
        }
    }
    docs.iter()
        .map(|doc| GraphNode {
            id: doc.slug.clone(),
            title: doc.title.clone(),
            tags: doc.tags.clone(),
            group: groups.assign(doc),
            connections: degree.get(doc.slug.as_str()).copied().unwrap_or(0),
        })
        .collect()
}
