//! linkgraph-cli
//!
//! Stage runner behind the `linkgraph` binary. Library crates do the work;
//! this crate wires configuration, logging and artifact writes around them.

pub mod logger;
pub mod pipeline;
pub mod serializer;

pub use pipeline::{Pipeline, Stage};
