//! # causallm-graph
//!
//! Causal DAG representation built on `petgraph::StableGraph`.
//!
//! - `graph`: frozen `CausalGraph`, its builder, and cycle enforcement
//! - `parser`: `DagParser` turning structural descriptions into validated graphs
//! - `traversal`: parents, children, ancestors, descendants, topological order
//! - `separation`: d-separation and the backdoor blocking check

pub mod graph;
pub mod parser;
pub mod separation;
pub mod traversal;

pub use graph::{CausalGraph, CausalGraphBuilder};
pub use parser::DagParser;
