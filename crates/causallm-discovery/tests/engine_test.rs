//! Async discovery through the engine: statistical, oracle-only and hybrid.

use std::time::Duration;

use causallm_core::config::CausalConfig;
use causallm_core::errors::{DiscoveryError, GraphValidationError};
use causallm_core::models::{Dataset, DiscoveryMethod, EdgeSource};
use causallm_core::traits::{Cancellable, NoOracle};
use causallm_discovery::CausalDiscoveryEngine;
use test_fixtures::{LinearSem, ScriptedOracle, SlowOracle};

fn config(timeout_ms: u64) -> CausalConfig {
    CausalConfig::from_toml(&format!(
        "[discovery]\nsignificance = 0.001\n\n[oracle]\ntimeout_ms = {timeout_ms}\nmin_confidence = 0.3\n"
    ))
    .unwrap()
}

fn collider_data() -> Dataset {
    LinearSem::new()
        .root("A", 1.0)
        .root("B", 1.0)
        .node("C", &[("A", 0.8), ("B", 0.8)], 1.0)
        .node("D", &[("C", 0.8)], 1.0)
        .sample(2000, 7)
}

fn triangle_data() -> Dataset {
    LinearSem::new()
        .root("A", 1.0)
        .node("B", &[("A", 0.8)], 1.0)
        .node("C", &[("A", 0.8), ("B", 0.8)], 1.0)
        .sample(2000, 3)
}

#[tokio::test]
async fn statistical_method_runs_pc() {
    let engine = CausalDiscoveryEngine::statistical_only(config(1000));
    let data = collider_data();
    let graph = engine
        .discover_relationships(&data, None, DiscoveryMethod::Statistical)
        .await
        .unwrap();
    assert!(graph.has_edge("A", "C") && graph.has_edge("B", "C") && graph.has_edge("C", "D"));
}

#[tokio::test]
async fn variable_subset_is_respected() {
    let engine = CausalDiscoveryEngine::statistical_only(config(1000));
    let data = collider_data();
    let subset = vec!["A".to_string(), "C".to_string()];
    let graph = engine
        .discover_relationships(&data, Some(&subset), DiscoveryMethod::Statistical)
        .await
        .unwrap();
    assert_eq!(graph.node_names(), vec!["A", "C"]);
    assert!(graph.is_adjacent("A", "C"));

    let bad = vec!["nope".to_string()];
    let err = engine
        .discover_relationships(&data, Some(&bad), DiscoveryMethod::Statistical)
        .await
        .unwrap_err();
    assert_eq!(err, DiscoveryError::UnknownVariable { name: "nope".into() });
}

#[tokio::test]
async fn llm_method_validates_and_filters_the_proposal() {
    let oracle = ScriptedOracle::new()
        .proposes("A", "C", 0.9)
        .proposes("B", "C", 0.8)
        .proposes("C", "D", 0.1);
    let engine = CausalDiscoveryEngine::new(oracle, config(1000));
    let data = collider_data();
    let graph = engine
        .discover_relationships(&data, None, DiscoveryMethod::Llm)
        .await
        .unwrap();
    assert_eq!(graph.edge_count(), 2);
    assert!(!graph.has_edge("C", "D"), "below min_confidence");
    let meta = graph.edge("A", "C").unwrap();
    assert_eq!(meta.source, EdgeSource::Llm);
    assert_eq!(meta.confidence, 0.9);
}

#[tokio::test]
async fn llm_method_rejects_cyclic_proposals() {
    let oracle = ScriptedOracle::new()
        .proposes("A", "B", 0.9)
        .proposes("B", "A", 0.9);
    let engine = CausalDiscoveryEngine::new(oracle, config(1000));
    let err = engine
        .discover_relationships(&collider_data(), None, DiscoveryMethod::Llm)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DiscoveryError::Graph(GraphValidationError::CycleDetected { .. })
    ));
}

#[tokio::test]
async fn llm_method_treats_malformed_proposals_as_abstention() {
    let malformed = [
        ScriptedOracle::new().proposes("A", "C", 1.5),
        ScriptedOracle::new().proposes("A", "C", f64::NAN),
        ScriptedOracle::new()
            .proposes("A", "C", 0.9)
            .proposes("A", "C", 0.8),
        ScriptedOracle::new().proposes("C", "C", 0.9),
    ];
    for oracle in malformed {
        let engine = CausalDiscoveryEngine::new(oracle, config(1000));
        let err = engine
            .discover_relationships(&collider_data(), None, DiscoveryMethod::Llm)
            .await
            .unwrap_err();
        assert_eq!(err, DiscoveryError::OracleAbstained);
    }
}

#[tokio::test]
async fn llm_method_without_an_answer_abstains() {
    let engine = CausalDiscoveryEngine::new(NoOracle, config(1000));
    let err = engine
        .discover_relationships(&collider_data(), None, DiscoveryMethod::Llm)
        .await
        .unwrap_err();
    assert_eq!(err, DiscoveryError::OracleAbstained);
}

#[tokio::test]
async fn hybrid_orients_residuals_in_order() {
    let oracle = ScriptedOracle::new()
        .orients("A", "B")
        .orients("A", "C")
        .orients("B", "C");
    let engine = CausalDiscoveryEngine::new(oracle, config(1000));
    let graph = engine
        .discover_relationships(&triangle_data(), None, DiscoveryMethod::Hybrid)
        .await
        .unwrap();

    assert!(graph.is_fully_oriented());
    assert!(graph.has_edge("A", "B") && graph.has_edge("A", "C") && graph.has_edge("B", "C"));
    assert_eq!(graph.edge("A", "B").unwrap().source, EdgeSource::Llm);
    assert_eq!(
        engine.oracle().asked(),
        vec![
            ("A".to_string(), "B".to_string()),
            ("A".to_string(), "C".to_string()),
            ("B".to_string(), "C".to_string()),
        ]
    );
}

#[tokio::test]
async fn hybrid_never_overrides_statistical_orientations() {
    // The oracle disagrees with every orientation the data fixed.
    let oracle = ScriptedOracle::new()
        .orients("C", "A")
        .orients("C", "B")
        .orients("D", "C");
    let engine = CausalDiscoveryEngine::new(oracle, config(1000));
    let graph = engine
        .discover_relationships(&collider_data(), None, DiscoveryMethod::Hybrid)
        .await
        .unwrap();

    assert!(graph.has_edge("A", "C") && graph.has_edge("B", "C") && graph.has_edge("C", "D"));
    assert_eq!(graph.edge("C", "D").unwrap().source, EdgeSource::Statistical);
    assert!(engine.oracle().asked().is_empty());
}

#[tokio::test]
async fn hybrid_meek_propagation_skips_settled_pairs() {
    // A -> B, then C -> A, forces C -> B by R2; B - C is never asked.
    let oracle = ScriptedOracle::new().orients("A", "B").orients("C", "A");
    let engine = CausalDiscoveryEngine::new(oracle, config(1000));
    let graph = engine
        .discover_relationships(&triangle_data(), None, DiscoveryMethod::Hybrid)
        .await
        .unwrap();
    assert!(graph.has_edge("C", "B"));
    assert_eq!(engine.oracle().asked().len(), 2);
}

#[tokio::test]
async fn oracle_timeout_leaves_edges_undirected() {
    let slow = SlowOracle::new(
        Duration::from_secs(5),
        ScriptedOracle::new().orients("A", "B"),
    );
    let engine = CausalDiscoveryEngine::new(slow, config(10));
    let graph = engine
        .discover_relationships(&triangle_data(), None, DiscoveryMethod::Hybrid)
        .await
        .unwrap();
    assert_eq!(graph.undirected_count(), 3);
    assert_eq!(engine.oracle().calls(), 3);
}

#[tokio::test]
async fn unparseable_orientation_is_abstention() {
    let oracle = ScriptedOracle::new().raw_orientation("A causes B, probably");
    let engine = CausalDiscoveryEngine::new(oracle, config(1000));
    let graph = engine
        .discover_relationships(&triangle_data(), None, DiscoveryMethod::Hybrid)
        .await
        .unwrap();
    assert_eq!(graph.undirected_count(), 3);
}

#[tokio::test]
async fn cancellation_before_start() {
    let engine = CausalDiscoveryEngine::statistical_only(config(1000));
    engine.cancellation_token().cancel();
    let err = engine
        .discover_relationships(&collider_data(), None, DiscoveryMethod::Statistical)
        .await
        .unwrap_err();
    assert_eq!(err, DiscoveryError::Cancelled);
}

#[tokio::test]
async fn cancellation_interrupts_a_pending_oracle_call() {
    let slow = SlowOracle::new(Duration::from_secs(30), ScriptedOracle::new());
    let engine = CausalDiscoveryEngine::new(slow, config(60_000));
    let token = engine.cancellation_token();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();
    });

    let err = tokio::time::timeout(
        Duration::from_secs(10),
        engine.discover_relationships(&triangle_data(), None, DiscoveryMethod::Hybrid),
    )
    .await
    .expect("cancellation should end discovery promptly")
    .unwrap_err();
    assert_eq!(err, DiscoveryError::Cancelled);
    assert_eq!(engine.oracle().calls(), 1);
}

#[tokio::test]
async fn cancellation_reaches_a_running_pc_search() {
    let mut sem = LinearSem::new().root("V0", 1.0);
    for i in 1..12 {
        let parent = format!("V{}", i - 1);
        sem = sem.node(&format!("V{i}"), &[(parent.as_str(), 0.6)], 1.0);
    }
    let data = sem.sample(5000, 13);

    let engine = CausalDiscoveryEngine::statistical_only(config(1000));
    let token = engine.cancellation_token();
    // Runs as soon as discovery yields to the executor, i.e. while PC is on the blocking pool.
    tokio::spawn(async move { token.cancel() });

    let err = engine
        .discover_relationships(&data, None, DiscoveryMethod::Statistical)
        .await
        .unwrap_err();
    assert_eq!(err, DiscoveryError::Cancelled);
}
