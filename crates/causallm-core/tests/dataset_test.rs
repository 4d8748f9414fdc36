//! Tests for the dataset model.

use causallm_core::errors::{DatasetError, InsufficientDataError};
use causallm_core::models::{Dataset, VariableKind};

fn small() -> Dataset {
    Dataset::builder()
        .continuous("x", vec![3.0, 1.0, 2.0, f64::NAN])
        .categorical("g", vec![1.0, 0.0, 1.0, 0.0])
        .describe("x", "dose in mg")
        .build()
        .unwrap()
}

#[test]
fn builder_indexes_columns_in_order() {
    let ds = small();
    assert_eq!(ds.n_rows(), 4);
    assert_eq!(ds.n_columns(), 2);
    assert_eq!(ds.variables()[0].name(), "x");
    assert_eq!(ds.variables()[1].index(), 1);
    assert_eq!(ds.variable("g").unwrap().kind(), VariableKind::Categorical);
    assert_eq!(ds.variable("x").unwrap().description(), Some("dose in mg"));
    assert!(ds.contains("g"));
    assert!(!ds.contains("y"));
}

#[test]
fn builder_rejects_bad_columns() {
    let err = Dataset::builder()
        .continuous("a", vec![1.0, 2.0])
        .continuous("b", vec![1.0])
        .build()
        .unwrap_err();
    assert!(matches!(err, DatasetError::RaggedColumn { expected: 2, found: 1, .. }));

    let err = Dataset::builder()
        .continuous("a", vec![1.0])
        .continuous("a", vec![2.0])
        .build()
        .unwrap_err();
    assert!(matches!(err, DatasetError::DuplicateColumn { .. }));

    let err = Dataset::builder()
        .categorical("c", vec![0.0, 1.5])
        .build()
        .unwrap_err();
    assert!(matches!(err, DatasetError::InvalidCategory { row: 1, .. }));

    let err = Dataset::builder().continuous(" ", vec![]).build().unwrap_err();
    assert_eq!(err, DatasetError::EmptyColumnName);
}

#[test]
fn complete_rows_skip_missing_values() {
    let ds = small();
    assert_eq!(ds.complete_rows(&["x", "g"]).unwrap(), vec![0, 1, 2]);
    assert_eq!(ds.complete_rows(&["g"]).unwrap(), vec![0, 1, 2, 3]);
    assert!(matches!(
        ds.complete_rows(&["nope"]),
        Err(InsufficientDataError::MissingColumn { .. })
    ));
}

#[test]
fn canonical_rows_ignore_storage_order() {
    let ds = small();
    let canonical = ds.canonical_rows(&["x", "g"]).unwrap();
    let values: Vec<f64> = canonical.iter().map(|&r| ds.value(r, "x").unwrap()).collect();
    assert_eq!(values, vec![1.0, 2.0, 3.0]);

    let permuted = ds.select_rows(&[3, 2, 1, 0]);
    let canonical = permuted.canonical_rows(&["x", "g"]).unwrap();
    let values: Vec<f64> = canonical
        .iter()
        .map(|&r| permuted.value(r, "x").unwrap())
        .collect();
    assert_eq!(values, vec![1.0, 2.0, 3.0]);
}

#[test]
fn levels_are_sorted_and_distinct() {
    let ds = small();
    assert_eq!(ds.levels("g").unwrap(), vec![0.0, 1.0]);
}

#[test]
fn json_columns_map_null_to_missing() {
    let ds = Dataset::from_json_columns(
        r#"{"columns": [
            {"name": "a", "values": [1.0, null, 3.0]},
            {"name": "b", "kind": "categorical", "description": "arm", "values": [0, 1, 1]}
        ]}"#,
    )
    .unwrap();
    assert_eq!(ds.n_rows(), 3);
    assert!(ds.value(1, "a").unwrap().is_nan());
    assert!(ds.variable("b").unwrap().is_categorical());
    assert_eq!(ds.variable("b").unwrap().description(), Some("arm"));

    let err = Dataset::from_json_columns("{not json").unwrap_err();
    assert!(matches!(err, DatasetError::Malformed { .. }));
}
