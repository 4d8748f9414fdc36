//! Abduction-action-prediction replay of observed units.

use causallm_core::errors::{CounterfactualError, GraphValidationError};
use causallm_core::models::{
    CounterfactualTrace, Dataset, EdgeMeta, GraphData, Intervention, VariableKind,
};
use causallm_graph::{CausalGraph, DagParser};
use causallm_inference::CounterfactualEngine;
use test_fixtures::{permute_rows, LinearSem};

fn dag(nodes: &[&str], edges: &[(&str, &str)]) -> CausalGraph {
    DagParser::new()
        .parse(&GraphData::from_edges(nodes, edges))
        .unwrap()
}

/// x -> m -> y <- w
fn chain_graph() -> CausalGraph {
    dag(&["w", "x", "m", "y"], &[("x", "m"), ("m", "y"), ("w", "y")])
}

fn chain_data(n: usize, seed: u64) -> Dataset {
    LinearSem::new()
        .root("w", 1.0)
        .root("x", 1.0)
        .node("m", &[("x", 2.0)], 0.5)
        .node("y", &[("m", 3.0), ("w", 1.0)], 0.5)
        .sample(n, seed)
}

fn traces(data: &Dataset, graph: &CausalGraph, intervention: Intervention) -> Vec<CounterfactualTrace> {
    CounterfactualEngine::new()
        .generate_counterfactuals(data, &intervention, graph)
        .unwrap()
        .map(|item| item.unwrap())
        .collect()
}

#[test]
fn intervention_propagates_along_the_chain() {
    let data = chain_data(1000, 4);
    let graph = chain_graph();
    let x0 = data.value(0, "x").unwrap();

    let trace = traces(&data, &graph, Intervention::new("x", x0 + 1.0).for_units(vec![0]))
        .pop()
        .unwrap();

    assert_eq!(trace.unit, 0);
    assert_eq!(trace.intervened.get("x"), Some(&(x0 + 1.0)));
    assert_eq!(trace.propagated.keys().collect::<Vec<_>>(), ["m", "y"]);
    let dm = trace.change("m").unwrap();
    let dy = trace.change("y").unwrap();
    assert!((dm - 2.0).abs() < 0.1, "{dm}");
    assert!((dy - 6.0).abs() < 0.3, "{dy}");

    // w is not downstream of x and keeps its observed value.
    assert!(!trace.propagated.contains_key("w"));
    assert_eq!(trace.counterfactual_world()["w"], trace.original["w"]);
}

#[test]
fn no_op_intervention_reproduces_observations() {
    let data = chain_data(300, 8);
    let graph = chain_graph();
    let engine = CounterfactualEngine::new();

    for unit in [0, 17, 299] {
        let observed = data.value(unit, "x").unwrap();
        let intervention = Intervention::new("x", observed).for_units(vec![unit]);
        let trace = engine
            .generate_counterfactuals(&data, &intervention, &graph)
            .unwrap()
            .next()
            .unwrap()
            .unwrap();
        for (node, value) in &trace.propagated {
            assert_eq!(*value, trace.original[node], "unit {unit}, node {node}");
        }
        assert_eq!(trace.counterfactual_world(), trace.original);
    }
}

#[test]
fn counterfactuals_are_invariant_to_row_order() {
    let data = chain_data(400, 12);
    let shuffled = permute_rows(&data, 77);
    let graph = chain_graph();

    let key = |t: &CounterfactualTrace| t.original["x"];
    let mut a: Vec<_> = traces(&data, &graph, Intervention::new("x", 0.5))
        .into_iter()
        .map(|t| (key(&t), t.propagated))
        .collect();
    let mut b: Vec<_> = traces(&shuffled, &graph, Intervention::new("x", 0.5))
        .into_iter()
        .map(|t| (key(&t), t.propagated))
        .collect();
    a.sort_by(|l, r| l.0.total_cmp(&r.0));
    b.sort_by(|l, r| l.0.total_cmp(&r.0));
    assert_eq!(a, b);
}

#[test]
fn failed_units_are_reported_and_skipped() {
    let data = Dataset::builder()
        .continuous("x", vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0])
        .continuous("y", vec![1.0, f64::NAN, 5.2, 6.9, 9.1, 11.0])
        .build()
        .unwrap();
    let graph = dag(&["x", "y"], &[("x", "y")]);
    let intervention = Intervention::new("x", 10.0).for_units(vec![0, 1, 2]);

    let items: Vec<_> = CounterfactualEngine::new()
        .generate_counterfactuals(&data, &intervention, &graph)
        .unwrap()
        .collect();
    assert_eq!(items.len(), 3);
    assert!(items[0].is_ok());
    let err = items[1].as_ref().unwrap_err();
    assert_eq!((err.unit, err.node.as_str()), (1, "y"));
    assert!(items[2].is_ok());

    let ok: Vec<usize> = CounterfactualEngine::new()
        .generate_counterfactuals(&data, &intervention, &graph)
        .unwrap()
        .successful()
        .map(|t| t.unit)
        .collect();
    assert_eq!(ok, vec![0, 2]);
}

#[test]
fn categorical_and_latent_descendants_are_unidentifiable() {
    let data = LinearSem::new()
        .root("x", 1.0)
        .binary("c", &[("x", 1.0)], 0.0)
        .node("y", &[("x", 1.0)], 1.0)
        .sample(200, 3);

    let graph = dag(&["x", "c"], &[("x", "c")]);
    let mut iter = CounterfactualEngine::new()
        .generate_counterfactuals(&data, &Intervention::new("x", 3.0).for_units(vec![0]), &graph)
        .unwrap();
    assert_eq!(iter.len(), 1);
    assert_eq!(iter.next().unwrap().unwrap_err().node, "c");

    // x -> hidden -> y: the latent mediator cannot be recomputed.
    let graph = dag(&["x", "hidden", "y"], &[("x", "hidden"), ("hidden", "y")]);
    let err = CounterfactualEngine::new()
        .generate_counterfactuals(&data, &Intervention::new("x", 3.0).for_units(vec![5]), &graph)
        .unwrap()
        .next()
        .unwrap()
        .unwrap_err();
    assert_eq!((err.unit, err.node.as_str()), (5, "hidden"));
}

#[test]
fn structural_problems_are_fatal() {
    let data = chain_data(50, 1);
    let graph = chain_graph();
    let engine = CounterfactualEngine::new();

    let err = engine
        .generate_counterfactuals(&data, &Intervention::new("z", 1.0), &graph)
        .unwrap_err();
    assert_eq!(err, CounterfactualError::UnknownVariable { name: "z".into() });

    let partial = dag(&["x", "u"], &[("u", "x")]);
    let err = engine
        .generate_counterfactuals(&data, &Intervention::new("u", 1.0), &partial)
        .unwrap_err();
    assert_eq!(err, CounterfactualError::UnobservedVariable { name: "u".into() });

    let err = engine
        .generate_counterfactuals(&data, &Intervention::new("x", 1.0).for_units(vec![3, 50]), &graph)
        .unwrap_err();
    assert_eq!(err, CounterfactualError::UnitOutOfRange { unit: 50, rows: 50 });

    let mut builder = CausalGraph::builder();
    builder.add_node("x", VariableKind::Continuous).unwrap();
    builder.add_node("m", VariableKind::Continuous).unwrap();
    builder
        .add_undirected_edge("x", "m", EdgeMeta::statistical(0.8))
        .unwrap();
    let err = engine
        .generate_counterfactuals(&data, &Intervention::new("x", 1.0), &builder.build())
        .unwrap_err();
    assert_eq!(
        err,
        CounterfactualError::Graph(GraphValidationError::UndirectedResidual { count: 1 })
    );
}

#[test]
fn intervention_values_are_validated() {
    let data = chain_data(50, 2);
    let graph = chain_graph();
    let engine = CounterfactualEngine::new();

    for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let err = engine
            .generate_counterfactuals(&data, &Intervention::new("x", value).for_units(vec![0]), &graph)
            .unwrap_err();
        assert!(
            matches!(err, CounterfactualError::InvalidInterventionValue { ref name, .. } if name == "x"),
            "{value}: {err:?}"
        );
    }

    let categorical = LinearSem::new()
        .binary("c", &[], 0.0)
        .node("y", &[("c", 1.0)], 1.0)
        .sample(100, 6);
    let graph = dag(&["c", "y"], &[("c", "y")]);
    for value in [0.5, -1.0] {
        let err = engine
            .generate_counterfactuals(&categorical, &Intervention::new("c", value), &graph)
            .unwrap_err();
        assert!(matches!(err, CounterfactualError::InvalidInterventionValue { .. }));
    }
    let trace = engine
        .generate_counterfactuals(&categorical, &Intervention::new("c", 1.0).for_units(vec![0]), &graph)
        .unwrap()
        .next()
        .unwrap()
        .unwrap();
    assert!(trace.propagated["y"].is_finite());
}

#[test]
fn unchanged_descendants_without_observations_are_absent() {
    let data = Dataset::builder()
        .continuous("x", vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0])
        .continuous("y", vec![1.0, f64::NAN, 5.2, 6.9, 9.1, 11.0])
        .build()
        .unwrap();
    let graph = dag(&["x", "y"], &[("x", "y")]);

    // Forcing x to its observed value changes no parent of y.
    let trace = CounterfactualEngine::new()
        .generate_counterfactuals(&data, &Intervention::new("x", 1.0).for_units(vec![1]), &graph)
        .unwrap()
        .next()
        .unwrap()
        .unwrap();
    assert!(trace.propagated.is_empty());
    assert!(!trace.original.contains_key("y"));
}
