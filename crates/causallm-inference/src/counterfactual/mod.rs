//! Unit-level counterfactuals under a linear additive-noise model.
//!
//! Abduction recovers each unit's residuals from its observed values, action
//! forces the intervened variable, and prediction recomputes the descendants
//! in topological order with those residuals held fixed.

pub mod engine;
pub mod scm;

pub use engine::{CounterfactualEngine, CounterfactualIter};
pub use scm::{StructuralAssignment, StructuralModel};
