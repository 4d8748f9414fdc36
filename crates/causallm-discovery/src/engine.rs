//! One entry point for statistical, oracle-only and hybrid discovery.

use std::future::Future;

use tracing::{debug, info, warn};

use causallm_core::config::CausalConfig;
use causallm_core::constants::DEFAULT_ORACLE_CONFIDENCE;
use causallm_core::errors::DiscoveryError;
use causallm_core::models::{
    Dataset, DiscoveryMethod, EdgeSource, EdgeSpec, GraphData, NodeSpec, Variable,
};
use causallm_core::traits::{
    Cancellable, CancellationToken, CausalOracle, NoOracle, OracleQuestion, OracleRequest,
    OracleResponse, Orientation, VariableDescriptor,
};
use causallm_graph::{CausalGraph, DagParser};

use crate::pc::{PcAlgorithm, Pdag};

/// Discovers causal graphs from data, optionally consulting an oracle.
///
/// The oracle is never trusted blindly: its proposals go through the parser
/// and its orientations only fill in edges the data left undirected.
pub struct CausalDiscoveryEngine<O: CausalOracle = NoOracle> {
    oracle: O,
    config: CausalConfig,
    cancel: CancellationToken,
}

impl CausalDiscoveryEngine<NoOracle> {
    /// Engine without an oracle; `llm` discovery always abstains.
    pub fn statistical_only(config: CausalConfig) -> Self {
        Self::new(NoOracle, config)
    }
}

impl<O: CausalOracle> CausalDiscoveryEngine<O> {
    pub fn new(oracle: O, config: CausalConfig) -> Self {
        Self {
            oracle,
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Share an externally owned cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn config(&self) -> &CausalConfig {
        &self.config
    }

    /// Discover a graph over `variables` (all dataset columns when `None`).
    pub async fn discover_relationships(
        &self,
        data: &Dataset,
        variables: Option<&[String]>,
        method: DiscoveryMethod,
    ) -> Result<CausalGraph, DiscoveryError> {
        self.check_cancelled()?;
        let variables = resolve_variables(data, variables)?;
        info!(discovery_method = %method, variables = variables.len(), rows = data.n_rows(), "discovery started");

        let graph = match method {
            DiscoveryMethod::Statistical => self.statistical(data, &variables).await?,
            DiscoveryMethod::Llm => self.oracle_proposal(&variables).await?,
            DiscoveryMethod::Hybrid => self.hybrid(data, &variables).await?,
        };

        info!(
            discovery_method = %method,
            edges = graph.edge_count(),
            undirected = graph.undirected_count(),
            "discovery finished"
        );
        Ok(graph)
    }

    async fn statistical(
        &self,
        data: &Dataset,
        variables: &[Variable],
    ) -> Result<CausalGraph, DiscoveryError> {
        let pdag = self.run_pc(data, variables).await?;
        Ok(pdag.into_graph()?)
    }

    /// Run PC on the blocking pool so the CI tests never stall the executor.
    ///
    /// Cancellation returns at once; the abandoned search finishes in the
    /// background and its result is dropped.
    async fn run_pc(
        &self,
        data: &Dataset,
        variables: &[Variable],
    ) -> Result<Pdag, DiscoveryError> {
        self.check_cancelled()?;
        if let Some(missing) = variables.iter().find(|v| !data.contains(v.name())) {
            return Err(DiscoveryError::UnknownVariable {
                name: missing.name().to_string(),
            });
        }
        let pc = PcAlgorithm::from_config(&self.config.discovery);
        let (data, variables) = (data.clone(), variables.to_vec());
        let search = tokio::task::spawn_blocking(move || pc.pdag(&data, &variables));

        let pdag = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(DiscoveryError::Cancelled),
            joined = search => joined.map_err(|e| DiscoveryError::WorkerFailed {
                message: e.to_string(),
            })?,
        };
        self.check_cancelled()?;
        Ok(pdag)
    }

    /// Oracle-only discovery: the proposal must parse as a DAG.
    async fn oracle_proposal(&self, variables: &[Variable]) -> Result<CausalGraph, DiscoveryError> {
        let request = OracleRequest {
            variables: variables.iter().map(VariableDescriptor::from).collect(),
            known_edges: Vec::new(),
            question: OracleQuestion::ProposeGraph,
        };
        let response = self.consult(self.oracle.propose_graph(&request)).await?;
        let OracleResponse::Edges(proposed) = response else {
            warn!("oracle abstained from proposing a graph");
            return Err(DiscoveryError::OracleAbstained);
        };

        let min_confidence = self.config.oracle.effective_min_confidence();
        let total = proposed.len();
        let edges: Vec<EdgeSpec> = proposed
            .into_iter()
            .filter_map(|e| {
                let confidence = e.confidence.unwrap_or(DEFAULT_ORACLE_CONFIDENCE);
                (confidence >= min_confidence).then(|| {
                    EdgeSpec::new(e.source, e.target)
                        .with_confidence(confidence)
                        .with_origin(EdgeSource::Llm)
                })
            })
            .collect();
        debug!(proposed = total, kept = edges.len(), min_confidence, "oracle proposal filtered");

        let data = GraphData {
            nodes: variables
                .iter()
                .map(|v| NodeSpec {
                    name: v.name().to_string(),
                    kind: v.kind(),
                    description: v.description().map(str::to_string),
                })
                .collect(),
            edges,
        };
        Ok(DagParser::new().parse(&data)?)
    }

    /// PC, then ask the oracle about each edge the data left undirected.
    async fn hybrid(&self, data: &Dataset, variables: &[Variable]) -> Result<CausalGraph, DiscoveryError> {
        let mut pdag = self.run_pc(data, variables).await?;

        let descriptors: Vec<VariableDescriptor> =
            variables.iter().map(VariableDescriptor::from).collect();
        let mut abstentions = 0usize;
        let mut applied = 0usize;

        for (a, b) in pdag.undirected_pairs() {
            // Earlier answers may already have settled this pair through Meek.
            if !pdag.is_undirected(a, b) {
                continue;
            }
            let (name_a, name_b) = (variables[a].name(), variables[b].name());
            let request = OracleRequest {
                variables: descriptors.clone(),
                known_edges: known_edges(&pdag),
                question: OracleQuestion::OrientEdge {
                    a: name_a.to_string(),
                    b: name_b.to_string(),
                },
            };
            let response = self.consult(self.oracle.orient_edge(&request)).await?;
            let (from, to) = match response {
                OracleResponse::Orientation {
                    orientation: Orientation::Forward,
                    ..
                } => (a, b),
                OracleResponse::Orientation {
                    orientation: Orientation::Backward,
                    ..
                } => (b, a),
                _ => {
                    abstentions += 1;
                    debug!(a = name_a, b = name_b, "oracle left edge undirected");
                    continue;
                }
            };
            if pdag.orient(from, to, EdgeSource::Llm) {
                applied += 1;
                pdag.apply_meek_rules(EdgeSource::Llm);
            } else {
                warn!(
                    from = variables[from].name(),
                    to = variables[to].name(),
                    "oracle orientation would close a cycle, ignored"
                );
            }
        }

        info!(oracle_orientations = applied, oracle_abstentions = abstentions, "hybrid merge done");
        revalidate(pdag)
    }

    /// Await an oracle call under the configured timeout and the
    /// cancellation token. A timeout counts as abstention.
    async fn consult<F>(&self, call: F) -> Result<OracleResponse, DiscoveryError>
    where
        F: Future<Output = OracleResponse>,
    {
        self.check_cancelled()?;
        let timeout = self.config.oracle.effective_timeout();
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(DiscoveryError::Cancelled),
            answer = tokio::time::timeout(timeout, call) => match answer {
                Ok(response) => {
                    let answered = !response.is_undetermined();
                    let response = response.sanitized();
                    if answered && response.is_undetermined() {
                        warn!("malformed oracle response treated as undetermined");
                    }
                    Ok(response)
                }
                Err(_) => {
                    warn!(timeout_ms = timeout.as_millis() as u64, "oracle call timed out");
                    Ok(OracleResponse::Undetermined)
                }
            },
        }
    }

    fn check_cancelled(&self) -> Result<(), DiscoveryError> {
        if self.cancel.is_cancelled() {
            Err(DiscoveryError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Freeze the merged PDAG, then re-check the frozen graph for cycles.
fn revalidate(pdag: Pdag) -> Result<CausalGraph, DiscoveryError> {
    let graph = pdag.into_graph().map_err(DiscoveryError::HybridMerge)?;
    graph.topological_order().map_err(DiscoveryError::HybridMerge)?;
    Ok(graph)
}

fn known_edges(pdag: &Pdag) -> Vec<(String, String)> {
    let vars = pdag.variables();
    (0..vars.len())
        .flat_map(|a| (0..vars.len()).map(move |b| (a, b)))
        .filter(|&(a, b)| pdag.is_directed(a, b))
        .map(|(a, b)| (vars[a].name().to_string(), vars[b].name().to_string()))
        .collect()
}

fn resolve_variables(
    data: &Dataset,
    names: Option<&[String]>,
) -> Result<Vec<Variable>, DiscoveryError> {
    match names {
        None => Ok(data.variables().to_vec()),
        Some(names) => names
            .iter()
            .map(|n| {
                data.variable(n)
                    .cloned()
                    .ok_or_else(|| DiscoveryError::UnknownVariable { name: n.clone() })
            })
            .collect(),
    }
}
