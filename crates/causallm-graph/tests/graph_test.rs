//! CausalGraph construction, refinement, traversal and d-separation.

use causallm_core::errors::GraphValidationError;
use causallm_core::models::{EdgeMeta, GraphData, VariableKind};
use causallm_graph::separation::{blocks_backdoor, d_separated};
use causallm_graph::{CausalGraph, DagParser};
use test_fixtures::load_fixture_str;

fn collider() -> CausalGraph {
    DagParser::new()
        .parse_json(&load_fixture_str("graphs/collider.json"))
        .unwrap()
}

fn chain(names: &[&str]) -> CausalGraph {
    let edges: Vec<(&str, &str)> = names.windows(2).map(|w| (w[0], w[1])).collect();
    DagParser::new().parse(&GraphData::from_edges(names, &edges)).unwrap()
}

#[test]
fn builder_rejects_cycles_on_insertion() {
    let mut builder = CausalGraph::builder();
    builder.add_node("A", VariableKind::Continuous).unwrap();
    builder.add_node("B", VariableKind::Continuous).unwrap();
    builder.add_node("C", VariableKind::Continuous).unwrap();
    builder.add_edge("A", "B", EdgeMeta::prior()).unwrap();
    builder.add_edge("B", "C", EdgeMeta::prior()).unwrap();
    let err = builder.add_edge("C", "A", EdgeMeta::prior()).unwrap_err();
    assert_eq!(
        err,
        GraphValidationError::CycleDetected {
            cycle: vec!["C".into(), "A".into(), "B".into()]
        }
    );
    // The rejected edge left no trace.
    let graph = builder.build();
    assert_eq!(graph.edge_count(), 2);
}

#[test]
fn undirected_residuals_are_tracked_separately() {
    let mut builder = CausalGraph::builder();
    for n in ["X", "Y", "Z"] {
        builder.add_node(n, VariableKind::Continuous).unwrap();
    }
    builder.add_edge("X", "Y", EdgeMeta::statistical(0.9)).unwrap();
    builder
        .add_undirected_edge("Z", "Y", EdgeMeta::statistical(0.8))
        .unwrap();
    assert!(builder
        .add_undirected_edge("Y", "X", EdgeMeta::statistical(0.5))
        .is_err());

    let graph = builder.build();
    assert!(!graph.is_fully_oriented());
    assert_eq!(graph.undirected_edges()[0].0, "Y");
    assert_eq!(graph.undirected_edges()[0].1, "Z");
    assert!(graph.is_adjacent("Z", "Y"));
    assert_eq!(
        graph.require_oriented(),
        Err(GraphValidationError::UndirectedResidual { count: 1 })
    );

    let oriented = graph.with_orientation("Z", "Y").unwrap();
    assert!(oriented.is_fully_oriented());
    assert_eq!(oriented.edge("Z", "Y").unwrap().confidence, 0.8);
    // The original is untouched.
    assert_eq!(graph.undirected_count(), 1);
}

#[test]
fn refinement_returns_new_graphs() {
    let graph = chain(&["A", "B", "C"]);
    let more = graph.with_edge("A", "C", EdgeMeta::llm(0.4)).unwrap();
    assert_eq!(more.edge_count(), 3);
    assert_eq!(graph.edge_count(), 2);

    let err = graph.with_edge("C", "A", EdgeMeta::prior()).unwrap_err();
    assert!(matches!(err, GraphValidationError::CycleDetected { .. }));

    let fewer = more.without_edge("A", "B").unwrap();
    assert!(!fewer.has_edge("A", "B"));
    assert!(matches!(
        fewer.without_edge("A", "B"),
        Err(GraphValidationError::MissingEdge { .. })
    ));
    assert!(matches!(
        graph.with_orientation("A", "B"),
        Err(GraphValidationError::MissingEdge { .. })
    ));
}

#[test]
fn traversal_queries() {
    let graph = collider();
    assert_eq!(graph.parents("C"), vec!["A", "B"]);
    assert_eq!(graph.children("C"), vec!["D"]);
    assert_eq!(graph.ancestors("D"), vec!["A", "B", "C"]);
    assert_eq!(graph.descendants("A"), vec!["C", "D"]);
    assert!(graph.is_ancestor("A", "D"));
    assert!(!graph.is_ancestor("D", "A"));
    assert!(graph.parents("nope").is_empty());
    assert_eq!(graph.topological_order().unwrap(), vec!["A", "B", "C", "D"]);
}

#[test]
fn d_separation_through_collider() {
    let graph = collider();
    assert!(d_separated(&graph, &["A"], &["B"], &[]).unwrap());
    assert!(!d_separated(&graph, &["A"], &["B"], &["C"]).unwrap());
    // Conditioning on a descendant of the collider opens it too.
    assert!(!d_separated(&graph, &["A"], &["B"], &["D"]).unwrap());
    assert!(d_separated(&graph, &["A"], &["D"], &["C"]).unwrap());
    assert!(!d_separated(&graph, &["A"], &["D"], &[]).unwrap());
    assert!(d_separated(&graph, &["A"], &["nope"], &[]).is_err());
}

#[test]
fn backdoor_check_ignores_the_causal_path() {
    // Z -> X -> Y, Z -> Y
    let graph = DagParser::new()
        .parse(&GraphData::from_edges(
            &["Z", "X", "Y"],
            &[("Z", "X"), ("X", "Y"), ("Z", "Y")],
        ))
        .unwrap();
    assert!(!blocks_backdoor(&graph, "X", "Y", &[]).unwrap());
    assert!(blocks_backdoor(&graph, "X", "Y", &["Z"]).unwrap());

    // A plain chain has no backdoor path at all.
    let chain = chain(&["X", "M", "Y"]);
    assert!(blocks_backdoor(&chain, "X", "Y", &[]).unwrap());
}
