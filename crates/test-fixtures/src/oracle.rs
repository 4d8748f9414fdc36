//! Deterministic oracles for discovery tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use causallm_core::traits::{
    CausalOracle, OracleQuestion, OracleRequest, OracleResponse, Orientation, ProposedEdge,
};

/// Answers from a fixed script and records what it was asked.
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    proposal: Option<Vec<ProposedEdge>>,
    orientations: HashSet<(String, String)>,
    raw_orientation: Option<String>,
    calls: AtomicUsize,
    asked: Mutex<Vec<(String, String)>>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Propose `source -> target` with the given confidence.
    pub fn proposes(mut self, source: &str, target: &str, confidence: f64) -> Self {
        self.proposal.get_or_insert_with(Vec::new).push(ProposedEdge {
            source: source.to_string(),
            target: target.to_string(),
            confidence: Some(confidence),
        });
        self
    }

    /// When asked about the pair, answer `cause -> effect`.
    pub fn orients(mut self, cause: &str, effect: &str) -> Self {
        self.orientations
            .insert((cause.to_string(), effect.to_string()));
        self
    }

    /// Answer every orientation question with this raw payload.
    pub fn raw_orientation(mut self, payload: &str) -> Self {
        self.raw_orientation = Some(payload.to_string());
        self
    }

    /// Total oracle calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Orientation questions asked so far, in order.
    pub fn asked(&self) -> Vec<(String, String)> {
        self.asked.lock().map(|a| a.clone()).unwrap_or_default()
    }
}

impl CausalOracle for ScriptedOracle {
    async fn propose_graph(&self, _request: &OracleRequest) -> OracleResponse {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.proposal {
            Some(edges) => OracleResponse::Edges(edges.clone()),
            None => OracleResponse::Undetermined,
        }
    }

    async fn orient_edge(&self, request: &OracleRequest) -> OracleResponse {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let OracleQuestion::OrientEdge { a, b } = &request.question else {
            return OracleResponse::Undetermined;
        };
        if let Ok(mut asked) = self.asked.lock() {
            asked.push((a.clone(), b.clone()));
        }
        if let Some(raw) = &self.raw_orientation {
            return OracleResponse::from_json(raw);
        }
        let orientation = if self.orientations.contains(&(a.clone(), b.clone())) {
            Orientation::Forward
        } else if self.orientations.contains(&(b.clone(), a.clone())) {
            Orientation::Backward
        } else {
            return OracleResponse::Undetermined;
        };
        OracleResponse::Orientation {
            orientation,
            confidence: Some(0.9),
        }
    }
}

/// Delays every answer, for timeout and cancellation tests.
#[derive(Debug)]
pub struct SlowOracle {
    delay: Duration,
    inner: ScriptedOracle,
    started: AtomicUsize,
}

impl SlowOracle {
    pub fn new(delay: Duration, inner: ScriptedOracle) -> Self {
        Self {
            delay,
            inner,
            started: AtomicUsize::new(0),
        }
    }

    /// Calls started, including ones cut off before answering.
    pub fn calls(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

impl CausalOracle for SlowOracle {
    async fn propose_graph(&self, request: &OracleRequest) -> OracleResponse {
        self.started.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.inner.propose_graph(request).await
    }

    async fn orient_edge(&self, request: &OracleRequest) -> OracleResponse {
        self.started.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.inner.orient_edge(request).await
    }
}
