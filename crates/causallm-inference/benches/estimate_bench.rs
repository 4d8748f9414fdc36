use criterion::{criterion_group, criterion_main, Criterion};

use causallm_core::config::EstimationConfig;
use causallm_core::models::{GraphData, Intervention};
use causallm_graph::DagParser;
use causallm_inference::{CounterfactualEngine, DoOperator};
use test_fixtures::LinearSem;

fn bench_inference(c: &mut Criterion) {
    let data = LinearSem::new()
        .root("z", 1.0)
        .node("x", &[("z", 0.8)], 1.0)
        .node("m", &[("x", 1.2)], 1.0)
        .node("y", &[("m", 0.7), ("z", 0.5)], 1.0)
        .sample(5000, 2);
    let graph = DagParser::new()
        .parse(&GraphData::from_edges(
            &["z", "x", "m", "y"],
            &[("z", "x"), ("x", "m"), ("m", "y"), ("z", "y")],
        ))
        .unwrap();

    let operator = DoOperator::new(EstimationConfig::default());
    c.bench_function("estimate_effect_5k_rows", |b| {
        b.iter(|| operator.estimate_effect(&data, "x", "y", &graph).unwrap());
    });

    let engine = CounterfactualEngine::new();
    let intervention = Intervention::new("x", 1.0);
    c.bench_function("counterfactuals_5k_units", |b| {
        b.iter(|| {
            engine
                .generate_counterfactuals(&data, &intervention, &graph)
                .unwrap()
                .successful()
                .count()
        });
    });
}

criterion_group!(benches, bench_inference);
criterion_main!(benches);
