//! Partially directed graphs and the orientation phase of PC.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use causallm_core::errors::GraphValidationError;
use causallm_core::models::{EdgeMeta, EdgeSource, Variable};
use causallm_graph::{CausalGraph, CausalGraphBuilder};

use super::skeleton::{ordered, Skeleton};

/// A PDAG over variable positions.
///
/// Every adjacent pair is either directed or undirected, never both. The
/// directed part stays acyclic: `orient` refuses any edge that would close
/// a directed cycle.
#[derive(Debug, Clone)]
pub struct Pdag {
    variables: Vec<Variable>,
    directed: BTreeSet<(usize, usize)>,
    undirected: BTreeSet<(usize, usize)>,
    meta: BTreeMap<(usize, usize), EdgeMeta>,
}

impl Pdag {
    /// Every skeleton edge undirected, with its statistical confidence.
    pub fn from_skeleton(variables: &[Variable], skeleton: &Skeleton) -> Self {
        let edges = skeleton.edges();
        let meta = edges
            .iter()
            .map(|&p| {
                let c = skeleton.confidence.get(&p).copied().unwrap_or(0.0);
                (p, EdgeMeta::statistical(c))
            })
            .collect();
        Self {
            variables: variables.to_vec(),
            directed: BTreeSet::new(),
            undirected: edges.into_iter().collect(),
            meta,
        }
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn is_directed(&self, a: usize, b: usize) -> bool {
        self.directed.contains(&(a, b))
    }

    pub fn is_undirected(&self, a: usize, b: usize) -> bool {
        self.undirected.contains(&ordered(a, b))
    }

    pub fn is_adjacent(&self, a: usize, b: usize) -> bool {
        self.is_undirected(a, b) || self.is_directed(a, b) || self.is_directed(b, a)
    }

    /// Undirected pairs, ascending.
    pub fn undirected_pairs(&self) -> Vec<(usize, usize)> {
        self.undirected.iter().copied().collect()
    }

    fn adjacent(&self, a: usize) -> Vec<usize> {
        (0..self.variables.len())
            .filter(|&b| b != a && self.is_adjacent(a, b))
            .collect()
    }

    fn has_directed_path(&self, from: usize, to: usize) -> bool {
        let mut stack = vec![from];
        let mut seen = BTreeSet::from([from]);
        while let Some(node) = stack.pop() {
            if node == to {
                return true;
            }
            for &(s, t) in self.directed.range((node, 0)..(node + 1, 0)) {
                debug_assert_eq!(s, node);
                if seen.insert(t) {
                    stack.push(t);
                }
            }
        }
        false
    }

    /// Orient the undirected edge `a - b` as `a -> b`.
    ///
    /// Returns `false` (and changes nothing) when the edge is not undirected
    /// or the orientation would create a directed cycle.
    pub fn orient(&mut self, a: usize, b: usize, source: EdgeSource) -> bool {
        if !self.is_undirected(a, b) || self.has_directed_path(b, a) {
            return false;
        }
        self.undirected.remove(&ordered(a, b));
        self.directed.insert((a, b));
        if let Some(m) = self.meta.get_mut(&ordered(a, b)) {
            m.source = source;
        }
        true
    }

    /// Orient colliders `i -> k <- j` for non-adjacent `i, j` whose
    /// separating set excludes `k`.
    pub fn orient_v_structures(&mut self, skeleton: &Skeleton) -> usize {
        let n = self.variables.len();
        let mut oriented = 0;
        for k in 0..n {
            let neighbours = self.adjacent(k);
            for (idx, &i) in neighbours.iter().enumerate() {
                for &j in &neighbours[idx + 1..] {
                    if self.is_adjacent(i, j) {
                        continue;
                    }
                    let separated_without_k = skeleton
                        .sepset(i, j)
                        .is_some_and(|s| !s.contains(&k));
                    if !separated_without_k {
                        continue;
                    }
                    // Either side may already point into k; neither may point out of it.
                    if self.is_directed(k, i) || self.is_directed(k, j) {
                        debug!(collider = self.variables[k].name(), "conflicting v-structure skipped");
                        continue;
                    }
                    let mut applied = false;
                    for side in [i, j] {
                        if self.is_undirected(side, k) {
                            applied |= self.orient(side, k, EdgeSource::Statistical);
                        }
                    }
                    if applied {
                        oriented += 1;
                    }
                }
            }
        }
        oriented
    }

    /// Apply Meek rules R1-R3 until nothing changes.
    pub fn apply_meek_rules(&mut self, source: EdgeSource) -> usize {
        let mut total = 0;
        loop {
            let mut changed = 0;
            for (a, b) in self.undirected_pairs() {
                if !self.is_undirected(a, b) {
                    continue;
                }
                if self.meek_implies(a, b) {
                    changed += usize::from(self.orient(a, b, source));
                } else if self.meek_implies(b, a) {
                    changed += usize::from(self.orient(b, a, source));
                }
            }
            if changed == 0 {
                return total;
            }
            total += changed;
        }
    }

    /// Whether R1, R2 or R3 forces the undirected `x - y` to be `x -> y`.
    fn meek_implies(&self, x: usize, y: usize) -> bool {
        let n = self.variables.len();

        // R1: w -> x - y with w, y non-adjacent.
        let r1 = (0..n).any(|w| self.is_directed(w, x) && !self.is_adjacent(w, y));
        if r1 {
            return true;
        }

        // R2: x -> w -> y.
        let r2 = (0..n).any(|w| self.is_directed(x, w) && self.is_directed(w, y));
        if r2 {
            return true;
        }

        // R3: x - c -> y and x - d -> y with c, d non-adjacent.
        let spouses: Vec<usize> = (0..n)
            .filter(|&c| self.is_undirected(x, c) && self.is_directed(c, y))
            .collect();
        spouses.iter().enumerate().any(|(i, &c)| {
            spouses[i + 1..]
                .iter()
                .any(|&d| !self.is_adjacent(c, d))
        })
    }

    /// Freeze into a `CausalGraph`; remaining undirected pairs become residuals.
    pub fn into_graph(self) -> Result<CausalGraph, GraphValidationError> {
        let mut builder = CausalGraphBuilder::new();
        for v in &self.variables {
            builder.add_variable(v.clone())?;
        }
        for &(a, b) in &self.directed {
            let meta = self.meta.get(&ordered(a, b)).copied().unwrap_or_default();
            builder.add_edge(self.variables[a].name(), self.variables[b].name(), meta)?;
        }
        for &(a, b) in &self.undirected {
            let meta = self.meta.get(&(a, b)).copied().unwrap_or_default();
            builder.add_undirected_edge(self.variables[a].name(), self.variables[b].name(), meta)?;
        }
        Ok(builder.build())
    }
}
