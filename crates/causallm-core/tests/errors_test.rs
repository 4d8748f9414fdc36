//! Tests for the error taxonomy.

use causallm_core::errors::error_code::{self, CausalErrorCode};
use causallm_core::errors::*;

#[test]
fn every_error_has_a_code() {
    let graph = GraphValidationError::SelfLoop { node: "A".into() };
    assert_eq!(graph.error_code(), error_code::GRAPH_VALIDATION_ERROR);

    let data = InsufficientDataError::ZeroVariance {
        variable: "X".into(),
    };
    assert_eq!(data.error_code(), error_code::INSUFFICIENT_DATA);

    let dataset = DatasetError::EmptyColumnName;
    assert_eq!(dataset.error_code(), error_code::DATASET_ERROR);

    let unidentifiable = UnidentifiableEffectError {
        treatment: "T".into(),
        outcome: "Y".into(),
        reason: "latent confounder".into(),
    };
    assert_eq!(unidentifiable.error_code(), error_code::UNIDENTIFIABLE_EFFECT);

    let unit = CounterfactualUnidentifiableError {
        unit: 3,
        node: "C".into(),
        reason: "categorical".into(),
    };
    assert_eq!(unit.error_code(), error_code::COUNTERFACTUAL_UNIDENTIFIABLE);

    assert_eq!(
        DiscoveryError::OracleAbstained.error_code(),
        error_code::ORACLE_ABSTAINED
    );
    assert_eq!(DiscoveryError::Cancelled.error_code(), error_code::CANCELLED);
    assert_eq!(
        DiscoveryError::WorkerFailed { message: "panicked".into() }.error_code(),
        error_code::WORKER_FAILED
    );
    assert_eq!(
        ConfigError::FileNotFound { path: "/x".into() }.error_code(),
        error_code::CONFIG_ERROR
    );
}

#[test]
fn cycle_error_lists_the_closed_path() {
    let err = GraphValidationError::cycle(vec!["A".into(), "B".into(), "C".into()]);
    assert_eq!(
        err.to_string(),
        "cycle detected in causal graph: A -> B -> C -> A"
    );
    assert!(err.tagged_string().starts_with("[GRAPH_VALIDATION_ERROR]"));
}

#[test]
fn sub_errors_convert_into_causal_error() {
    let err: CausalError = GraphValidationError::EmptyNodeName.into();
    assert!(matches!(err, CausalError::Graph(_)));

    let err: CausalError = InsufficientDataError::NoOverlap {
        treatment: "T".into(),
    }
    .into();
    assert!(matches!(err, CausalError::Data(_)));

    let err: CausalError = UnidentifiableEffectError {
        treatment: "T".into(),
        outcome: "Y".into(),
        reason: "r".into(),
    }
    .into();
    assert!(err.is_unidentifiable());
    assert_eq!(err.error_code(), error_code::UNIDENTIFIABLE_EFFECT);

    let err: CausalError = DiscoveryError::HybridMerge(GraphValidationError::cycle(vec![
        "A".into(),
        "B".into(),
    ]))
    .into();
    assert_eq!(err.error_code(), error_code::HYBRID_MERGE_FAILED);
    assert!(!err.is_unidentifiable());
}

#[test]
fn inference_error_wraps_graph_and_data_errors() {
    let err: InferenceError = GraphValidationError::UndirectedResidual { count: 2 }.into();
    assert_eq!(err.error_code(), error_code::GRAPH_VALIDATION_ERROR);

    let err: InferenceError = InsufficientDataError::MissingColumn { name: "Z".into() }.into();
    assert_eq!(err.error_code(), error_code::INSUFFICIENT_DATA);
}
