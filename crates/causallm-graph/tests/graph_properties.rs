//! Property tests: parsing never yields a cycle, and round-trips preserve edges.

use proptest::prelude::*;

use causallm_core::errors::GraphValidationError;
use causallm_core::models::{EdgeSpec, GraphData, NodeSpec};
use causallm_graph::graph::dag_enforcement;
use causallm_graph::DagParser;

fn edge_strategy(n: usize) -> impl Strategy<Value = Vec<(usize, usize)>> {
    prop::collection::vec((0..n, 0..n), 0..n * 3)
}

fn graph_data(n: usize, edges: &[(usize, usize)]) -> GraphData {
    let mut seen = std::collections::HashSet::new();
    GraphData {
        nodes: (0..n).map(|i| NodeSpec::new(format!("n{i}"))).collect(),
        edges: edges
            .iter()
            .filter(|(s, t)| s != t && seen.insert((*s, *t)))
            .map(|(s, t)| EdgeSpec::new(format!("n{s}"), format!("n{t}")))
            .collect(),
    }
}

proptest! {
    #[test]
    fn parse_never_returns_a_cycle(edges in edge_strategy(12)) {
        let data = graph_data(12, &edges);
        match DagParser::new().parse(&data) {
            Ok(graph) => {
                prop_assert!(dag_enforcement::find_cycles(graph.indexed()).is_empty());
                prop_assert_eq!(graph.topological_order().unwrap().len(), 12);
            }
            Err(GraphValidationError::CycleDetected { cycle }) => {
                // Every consecutive pair of the reported cycle is a real edge.
                for i in 0..cycle.len() {
                    let from = &cycle[i];
                    let to = &cycle[(i + 1) % cycle.len()];
                    prop_assert!(data.edges.iter().any(|e| &e.source == from && &e.target == to));
                }
            }
            Err(other) => prop_assert!(false, "unexpected error {}", other),
        }
    }

    #[test]
    fn forward_edges_round_trip(edges in edge_strategy(10)) {
        let forward: Vec<(usize, usize)> = edges.into_iter().filter(|(s, t)| s < t).collect();
        let data = graph_data(10, &forward);
        let graph = DagParser::new().parse(&data).unwrap();
        let again = DagParser::new().parse(&graph.to_graph_data()).unwrap();
        prop_assert_eq!(graph.edges(), again.edges());
        prop_assert_eq!(graph.edge_count(), data.edges.len());
    }
}
