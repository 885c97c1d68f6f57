//! linkgraph-graph
//!
//! Builds the post graphs from documents and cached embeddings:
//! - `similarity_graph`: similarity-only edges, degree-capped per node
//! - `unified`: explicit wiki-link edges first, then AI suggestions
//! - `backlinks`: per-post inbound view and post metadata
//!
//! Both builders share `candidates::pairwise_similarities` and
//! [`GraphParams`].

pub mod backlinks;
pub mod candidates;
pub mod edges;
pub mod groups;
pub mod nodes;
pub mod similarity_graph;
pub mod unified;

pub use backlinks::{aggregate_backlinks, post_meta};
pub use candidates::{pairwise_similarities, EmbeddingIndex, ScoredPair};
pub use edges::EdgeSet;
pub use groups::{GroupIndex, UNCATEGORIZED};
pub use linkgraph_core::config::GraphParams;
pub use nodes::build_nodes;
pub use similarity_graph::{build_similarity_graph, SimilarityGraph};
pub use unified::{build_link_graph, LinkGraph};
