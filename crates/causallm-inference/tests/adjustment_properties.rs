//! Property tests: every adjustment set found satisfies the backdoor criterion.

use proptest::prelude::*;

use causallm_core::errors::InferenceError;
use causallm_core::models::{Dataset, GraphData};
use causallm_graph::separation::blocks_backdoor;
use causallm_graph::{CausalGraph, DagParser};
use causallm_inference::find_adjustment_set;

const NODES: usize = 8;

/// Edges always point from the lower index to the higher one.
fn forward_dag(edges: &[(usize, usize)]) -> CausalGraph {
    let names: Vec<String> = (0..NODES).map(|i| format!("n{i}")).collect();
    let mut pairs: Vec<(String, String)> = edges
        .iter()
        .filter(|(a, b)| a != b)
        .map(|&(a, b)| (names[a.min(b)].clone(), names[a.max(b)].clone()))
        .collect();
    pairs.sort();
    pairs.dedup();
    DagParser::new()
        .parse(&GraphData::from_edges(&names, &pairs))
        .unwrap()
}

fn observed_except(hidden: &[usize]) -> Dataset {
    (0..NODES)
        .filter(|i| !hidden.contains(i))
        .fold(Dataset::builder(), |b, i| {
            b.continuous(&format!("n{i}"), vec![0.0, 1.0, 2.0])
        })
        .build()
        .unwrap()
}

fn query() -> impl Strategy<Value = (usize, usize)> {
    (0..NODES - 1).prop_flat_map(|t| (Just(t), t + 1..NODES))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn fully_observed_graphs_are_always_identified(
        edges in prop::collection::vec((0..NODES, 0..NODES), 0..NODES * 2),
        (t, y) in query(),
    ) {
        let graph = forward_dag(&edges);
        let data = observed_except(&[]);
        let (t, y) = (format!("n{t}"), format!("n{y}"));

        let set = find_adjustment_set(&graph, &data, &t, &y, NODES).unwrap();
        let chosen: Vec<&str> = set.iter().collect();
        prop_assert!(blocks_backdoor(&graph, &t, &y, &chosen).unwrap());

        let downstream = graph.descendants(&t);
        for z in &chosen {
            prop_assert!(!downstream.contains(z), "{} descends from {}", z, t);
        }
    }

    #[test]
    fn hidden_nodes_never_enter_the_set(
        edges in prop::collection::vec((0..NODES, 0..NODES), 0..NODES * 2),
        (t, y) in query(),
        hidden in prop::collection::vec(0..NODES, 0..3),
    ) {
        let hidden: Vec<usize> = hidden.into_iter().filter(|&h| h != t && h != y).collect();
        let graph = forward_dag(&edges);
        let data = observed_except(&hidden);
        let (t, y) = (format!("n{t}"), format!("n{y}"));

        match find_adjustment_set(&graph, &data, &t, &y, NODES) {
            Ok(set) => {
                let chosen: Vec<&str> = set.iter().collect();
                prop_assert!(chosen.iter().all(|z| data.contains(z)));
                prop_assert!(blocks_backdoor(&graph, &t, &y, &chosen).unwrap());
            }
            Err(InferenceError::Unidentifiable(e)) => {
                prop_assert_eq!(e.treatment, t);
                // Only a hidden node can leave a backdoor open.
                prop_assert!(!hidden.is_empty());
            }
            Err(other) => prop_assert!(false, "unexpected error: {other:?}"),
        }
    }
}
