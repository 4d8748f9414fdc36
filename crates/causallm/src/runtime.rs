//! `CausalLlm`: owns the engines and exposes the four public operations.

use std::path::Path;

use tracing::{debug, info};

use causallm_core::config::{CausalConfig, ConfigOverrides};
use causallm_core::errors::CausalResult;
use causallm_core::models::{Dataset, DiscoveryMethod, GraphData, Intervention, InterventionResult};
use causallm_core::traits::{CancellationToken, CapabilityProvider, CausalOracle, NoOracle};
use causallm_discovery::CausalDiscoveryEngine;
use causallm_graph::{CausalGraph, DagParser};
use causallm_inference::{CounterfactualEngine, CounterfactualIter, DoOperator};

use crate::capability::{CommunityEdition, EnterpriseInfo};

/// Entry point for causal discovery and inference.
///
/// Holds no per-query state: every call works on the dataset and graph it is
/// given, so one handle can serve concurrent queries.
pub struct CausalLlm<O: CausalOracle = NoOracle> {
    parser: DagParser,
    discovery: CausalDiscoveryEngine<O>,
    do_operator: DoOperator,
    counterfactual: CounterfactualEngine,
    capabilities: Box<dyn CapabilityProvider>,
    config: CausalConfig,
}

impl CausalLlm<NoOracle> {
    /// Handle without an oracle; `llm` discovery abstains and `hybrid`
    /// discovery leaves residuals undirected.
    pub fn new(config: CausalConfig) -> Self {
        Self::with_oracle(NoOracle, config)
    }

    /// Load configuration from `root` (project file, user file, environment)
    /// and build an oracle-less handle.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> CausalResult<Self> {
        Ok(Self::new(CausalConfig::load(root, overrides)?))
    }
}

impl<O: CausalOracle> CausalLlm<O> {
    pub fn with_oracle(oracle: O, config: CausalConfig) -> Self {
        Self {
            parser: DagParser::new(),
            discovery: CausalDiscoveryEngine::new(oracle, config.clone()),
            do_operator: DoOperator::from_config(&config),
            counterfactual: CounterfactualEngine::new(),
            capabilities: Box::new(CommunityEdition),
            config,
        }
    }

    /// Replace the capability provider consulted by `enterprise_info`.
    pub fn with_capabilities(mut self, provider: impl CapabilityProvider + 'static) -> Self {
        self.capabilities = Box::new(provider);
        self
    }

    pub fn config(&self) -> &CausalConfig {
        &self.config
    }

    pub fn oracle(&self) -> &O {
        self.discovery.oracle()
    }

    /// Token that cancels in-flight and future discovery calls.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.discovery.cancellation_token()
    }

    /// Parse and validate a structural description into a DAG.
    pub fn parse_causal_graph(&self, graph: &GraphData) -> CausalResult<CausalGraph> {
        Ok(self.parser.parse(graph)?)
    }

    /// Parse a JSON structural description into a DAG.
    pub fn parse_causal_graph_json(&self, json: &str) -> CausalResult<CausalGraph> {
        Ok(self.parser.parse_json(json)?)
    }

    /// Discover a graph over `variables` (every column when `None`) with
    /// `method` (the configured default when `None`).
    pub async fn discover_causal_relationships(
        &self,
        data: &Dataset,
        variables: Option<&[String]>,
        method: Option<DiscoveryMethod>,
    ) -> CausalResult<CausalGraph> {
        let method = method.unwrap_or_else(|| self.config.discovery.effective_default_method());
        Ok(self
            .discovery
            .discover_relationships(data, variables, method)
            .await?)
    }

    /// Estimate the effect of `do(treatment)` on `outcome`.
    ///
    /// Without a graph, one is discovered over every column first; a
    /// discovered graph that still has undirected edges is rejected.
    pub async fn estimate_causal_effect(
        &self,
        data: &Dataset,
        treatment: &str,
        outcome: &str,
        graph: Option<&CausalGraph>,
    ) -> CausalResult<InterventionResult> {
        let discovered;
        let graph = match graph {
            Some(g) => g,
            None => {
                discovered = self.discover_for_query(data).await?;
                &discovered
            }
        };
        let result = self
            .do_operator
            .estimate_effect(data, treatment, outcome, graph)?;
        info!(treatment, outcome, effect = result.effect_estimate, "causal effect ready");
        Ok(result)
    }

    /// Counterfactual replay of the intervention's units.
    ///
    /// Without a graph, one is discovered over every column first.
    pub async fn generate_counterfactuals<'a>(
        &self,
        data: &'a Dataset,
        intervention: &Intervention,
        graph: Option<&CausalGraph>,
    ) -> CausalResult<CounterfactualIter<'a>> {
        let discovered;
        let graph = match graph {
            Some(g) => g,
            None => {
                discovered = self.discover_for_query(data).await?;
                &discovered
            }
        };
        Ok(self
            .counterfactual
            .generate_counterfactuals(data, intervention, graph)?)
    }

    /// Capability report; has no effect on any algorithm.
    pub fn enterprise_info(&self) -> EnterpriseInfo {
        EnterpriseInfo::from_provider(self.capabilities.as_ref())
    }

    async fn discover_for_query(&self, data: &Dataset) -> CausalResult<CausalGraph> {
        let method = self.config.discovery.effective_default_method();
        debug!(discovery_method = %method, "no graph supplied, discovering one");
        self.discover_causal_relationships(data, None, Some(method))
            .await
    }
}
