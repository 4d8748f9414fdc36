//! PC algorithm: skeleton search, then orientation.

pub mod orientation;
pub mod skeleton;

pub use orientation::Pdag;
pub use skeleton::Skeleton;

use tracing::info;

use causallm_core::config::DiscoveryConfig;
use causallm_core::errors::DiscoveryError;
use causallm_core::models::{Dataset, EdgeSource, Variable};
use causallm_core::traits::IndependenceTest;
use causallm_graph::CausalGraph;

use crate::independence::ConditionalIndependenceTest;
use skeleton::SkeletonSearch;

/// Tuning for one PC run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PcConfig {
    /// Significance threshold; independence is accepted when `p > alpha`.
    pub alpha: f64,
    /// Largest conditioning-set size; `None` runs until no pair qualifies.
    pub max_conditioning_size: Option<usize>,
    /// Test the pairs of one level on the rayon pool.
    pub parallel: bool,
}

impl Default for PcConfig {
    fn default() -> Self {
        Self::from(&DiscoveryConfig::default())
    }
}

impl From<&DiscoveryConfig> for PcConfig {
    fn from(config: &DiscoveryConfig) -> Self {
        Self {
            alpha: config.effective_significance(),
            max_conditioning_size: config.max_conditioning_size,
            parallel: config.effective_parallel(),
        }
    }
}

/// PC-stable over a pluggable independence test.
#[derive(Debug, Clone)]
pub struct PcAlgorithm<T: IndependenceTest = ConditionalIndependenceTest> {
    test: T,
    config: PcConfig,
}

impl PcAlgorithm<ConditionalIndependenceTest> {
    /// PC with the kind-driven test selection from `config`.
    pub fn from_config(config: &DiscoveryConfig) -> Self {
        Self::new(
            ConditionalIndependenceTest::new(config.effective_ci_test()),
            PcConfig::from(config),
        )
    }
}

impl<T: IndependenceTest> PcAlgorithm<T> {
    pub fn new(test: T, config: PcConfig) -> Self {
        Self { test, config }
    }

    pub fn config(&self) -> &PcConfig {
        &self.config
    }

    /// Skeleton search only.
    pub fn skeleton(&self, data: &Dataset, variables: &[Variable]) -> Skeleton {
        SkeletonSearch {
            test: &self.test,
            data,
            variables,
            alpha: self.config.alpha,
            max_conditioning_size: self.config.max_conditioning_size,
            parallel: self.config.parallel,
        }
        .run()
    }

    /// Skeleton plus orientation, before freezing.
    pub fn pdag(&self, data: &Dataset, variables: &[Variable]) -> Pdag {
        let skeleton = self.skeleton(data, variables);
        let mut pdag = Pdag::from_skeleton(variables, &skeleton);
        let colliders = pdag.orient_v_structures(&skeleton);
        let propagated = pdag.apply_meek_rules(EdgeSource::Statistical);
        info!(
            variables = variables.len(),
            ci_tests_run = skeleton.tests_run,
            edges = skeleton.edges().len(),
            colliders,
            propagated,
            undirected = pdag.undirected_pairs().len(),
            "pc finished"
        );
        pdag
    }

    /// Discover a graph over `variables` from `data`.
    ///
    /// Every variable must have a column in `data`. Edges PC cannot orient
    /// are returned as undirected residuals.
    pub fn discover(
        &self,
        data: &Dataset,
        variables: &[Variable],
    ) -> Result<CausalGraph, DiscoveryError> {
        if let Some(missing) = variables.iter().find(|v| !data.contains(v.name())) {
            return Err(DiscoveryError::UnknownVariable {
                name: missing.name().to_string(),
            });
        }
        Ok(self.pdag(data, variables).into_graph()?)
    }
}
