//! Graph storage, construction, and DAG enforcement.

pub mod builder;
pub mod dag_enforcement;
pub mod stable_graph;

pub use builder::CausalGraphBuilder;
pub use stable_graph::{CausalGraph, CausalStableGraph, IndexedGraph};
