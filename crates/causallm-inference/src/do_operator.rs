//! `do(treatment)` effect estimation by backdoor adjustment.

use tracing::{debug, info};

use causallm_core::config::{CausalConfig, EstimationConfig};
use causallm_core::errors::InferenceError;
use causallm_core::models::{AdjustmentSet, Dataset, InterventionResult};
use causallm_graph::CausalGraph;

use crate::adjustment::find_adjustment_set;
use crate::estimator::{bootstrap_interval, select_estimator, EstimationSample};

/// Estimates average interventional effects from observational data.
///
/// Stateless apart from its configuration; safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct DoOperator {
    config: EstimationConfig,
}

impl DoOperator {
    pub fn new(config: EstimationConfig) -> Self {
        Self { config }
    }

    pub fn from_config(config: &CausalConfig) -> Self {
        Self::new(config.estimation.clone())
    }

    pub fn config(&self) -> &EstimationConfig {
        &self.config
    }

    /// Validate the query and find its minimal backdoor adjustment set.
    pub fn adjustment_set(
        &self,
        data: &Dataset,
        treatment: &str,
        outcome: &str,
        graph: &CausalGraph,
    ) -> Result<AdjustmentSet, InferenceError> {
        validate_query(data, treatment, outcome, graph)?;
        find_adjustment_set(
            graph,
            data,
            treatment,
            outcome,
            self.config.effective_max_adjustment_set_size(),
        )
    }

    /// Estimate the effect of intervening on `treatment` on `outcome`.
    ///
    /// The adjustment set used is always part of the result.
    pub fn estimate_effect(
        &self,
        data: &Dataset,
        treatment: &str,
        outcome: &str,
        graph: &CausalGraph,
    ) -> Result<InterventionResult, InferenceError> {
        let adjustment_set = self.adjustment_set(data, treatment, outcome, graph)?;
        debug!(treatment, outcome, adjustment = %adjustment_set, "adjustment set selected");

        let sample = EstimationSample::extract(data, treatment, outcome, &adjustment_set)?;
        let estimator = select_estimator(self.config.effective_estimator(), &sample);
        let effect_estimate = estimator.estimate(&sample, &sample.all_rows())?;
        let interval = bootstrap_interval(
            estimator.as_ref(),
            &sample,
            self.config.effective_bootstrap_samples(),
            self.config.effective_confidence_level(),
            self.config.effective_seed(),
        )?;

        let method = estimator.method();
        info!(
            treatment,
            outcome,
            effect = effect_estimate,
            lower = interval.lower,
            upper = interval.upper,
            method = method.as_str(),
            rows = sample.len(),
            "effect estimated"
        );

        Ok(InterventionResult {
            treatment: treatment.to_string(),
            outcome: outcome.to_string(),
            adjustment_set,
            effect_estimate,
            confidence_interval: (interval.lower, interval.upper),
            method,
            sample_size: sample.len(),
            bootstrap_replicates: interval.replicates,
        })
    }
}

fn validate_query(
    data: &Dataset,
    treatment: &str,
    outcome: &str,
    graph: &CausalGraph,
) -> Result<(), InferenceError> {
    for name in [treatment, outcome] {
        if !graph.contains(name) {
            return Err(InferenceError::UnknownVariable {
                name: name.to_string(),
            });
        }
        if !data.contains(name) {
            return Err(InferenceError::UnobservedVariable {
                name: name.to_string(),
            });
        }
    }
    if treatment == outcome {
        return Err(InferenceError::TreatmentIsOutcome {
            name: treatment.to_string(),
        });
    }
    graph.require_oriented()?;
    if graph.is_ancestor(outcome, treatment) {
        return Err(InferenceError::OutcomePrecedesTreatment {
            treatment: treatment.to_string(),
            outcome: outcome.to_string(),
        });
    }
    Ok(())
}
