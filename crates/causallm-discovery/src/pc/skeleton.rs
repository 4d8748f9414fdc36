//! PC-stable skeleton search.
//!
//! Each level `k` tests every adjacent pair against size-`k` subsets of its
//! neighbours, read from a snapshot taken at the start of the level. Removals
//! are applied only after the whole level has run, which makes the result
//! independent of evaluation order and lets pairs run in parallel.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use rayon::prelude::*;
use tracing::{debug, warn};

use causallm_core::constants::UNTESTED_EDGE_CONFIDENCE;
use causallm_core::models::{Dataset, Variable};
use causallm_core::stats::Combinations;
use causallm_core::traits::IndependenceTest;

/// Undirected skeleton plus the separating sets that removed edges.
#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    /// Neighbour sets by variable position.
    pub adjacency: Vec<BTreeSet<usize>>,
    /// Separating set for each removed pair `(i, j)`, `i < j`.
    pub sepsets: BTreeMap<(usize, usize), Vec<usize>>,
    /// Confidence for each surviving pair `(i, j)`, `i < j`.
    pub confidence: BTreeMap<(usize, usize), f64>,
    /// Independence tests run.
    pub tests_run: usize,
}

impl Skeleton {
    pub fn is_adjacent(&self, a: usize, b: usize) -> bool {
        self.adjacency[a].contains(&b)
    }

    pub fn sepset(&self, a: usize, b: usize) -> Option<&[usize]> {
        self.sepsets.get(&ordered(a, b)).map(Vec::as_slice)
    }

    /// Surviving pairs `(i, j)` with `i < j`, ascending.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(i, ns)| ns.iter().filter(move |&&j| i < j).map(move |&j| (i, j)))
            .collect()
    }
}

pub(crate) fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Running evidence for one pair across levels.
#[derive(Debug, Clone, Copy, Default)]
struct Evidence {
    max_p: f64,
    tested: bool,
    failed: bool,
}

/// What one level decided for one pair.
struct PairOutcome {
    pair: (usize, usize),
    separated_by: Option<Vec<usize>>,
    max_p: f64,
    tested: usize,
    failed: usize,
}

pub(crate) struct SkeletonSearch<'a, T: IndependenceTest> {
    pub test: &'a T,
    pub data: &'a Dataset,
    pub variables: &'a [Variable],
    pub alpha: f64,
    pub max_conditioning_size: Option<usize>,
    pub parallel: bool,
}

impl<T: IndependenceTest> SkeletonSearch<'_, T> {
    pub fn run(&self) -> Skeleton {
        let n = self.variables.len();
        let mut skeleton = Skeleton {
            adjacency: (0..n)
                .map(|i| (0..n).filter(|&j| j != i).collect())
                .collect(),
            ..Default::default()
        };
        let mut evidence: BTreeMap<(usize, usize), Evidence> = BTreeMap::new();

        let mut level = 0usize;
        loop {
            if self.max_conditioning_size.is_some_and(|max| level > max) {
                break;
            }
            let snapshot = skeleton.adjacency.clone();
            let pairs: Vec<(usize, usize)> = skeleton
                .edges()
                .into_iter()
                .filter(|&(i, j)| snapshot[i].len() > level || snapshot[j].len() > level)
                .collect();
            if pairs.is_empty() {
                break;
            }

            let outcomes: Vec<PairOutcome> = if self.parallel {
                pairs
                    .par_iter()
                    .map(|&pair| self.test_pair(pair, level, &snapshot))
                    .collect()
            } else {
                pairs
                    .iter()
                    .map(|&pair| self.test_pair(pair, level, &snapshot))
                    .collect()
            };

            let mut removed = 0usize;
            for outcome in outcomes {
                let (i, j) = outcome.pair;
                skeleton.tests_run += outcome.tested + outcome.failed;
                let ev = evidence.entry(outcome.pair).or_default();
                ev.max_p = ev.max_p.max(outcome.max_p);
                ev.tested |= outcome.tested > 0;
                ev.failed |= outcome.failed > 0;
                if let Some(sepset) = outcome.separated_by {
                    debug!(
                        x = self.variables[i].name(),
                        y = self.variables[j].name(),
                        sepset = ?sepset.iter().map(|&s| self.variables[s].name()).collect::<Vec<_>>(),
                        "edge removed"
                    );
                    skeleton.adjacency[i].remove(&j);
                    skeleton.adjacency[j].remove(&i);
                    skeleton.sepsets.insert(outcome.pair, sepset);
                    removed += 1;
                }
            }
            debug!(pc_level = level, pairs = pairs.len(), edges_removed = removed, "skeleton level done");
            level += 1;
        }

        for (i, j) in skeleton.edges() {
            let ev = evidence.get(&(i, j)).copied().unwrap_or_default();
            let confidence = if ev.failed || !ev.tested {
                warn!(
                    x = self.variables[i].name(),
                    y = self.variables[j].name(),
                    "edge kept without a complete set of tests"
                );
                UNTESTED_EDGE_CONFIDENCE
            } else {
                1.0 - ev.max_p
            };
            skeleton.confidence.insert((i, j), confidence);
        }
        skeleton
    }

    /// Test one pair against every size-`level` subset of its neighbours,
    /// x's side first, stopping at the first separating subset.
    fn test_pair(
        &self,
        (i, j): (usize, usize),
        level: usize,
        snapshot: &[BTreeSet<usize>],
    ) -> PairOutcome {
        let mut outcome = PairOutcome {
            pair: (i, j),
            separated_by: None,
            max_p: 0.0,
            tested: 0,
            failed: 0,
        };
        let mut seen: HashSet<Vec<usize>> = HashSet::new();

        for (a, b) in [(i, j), (j, i)] {
            let pool: Vec<usize> = snapshot[a].iter().copied().filter(|&v| v != b).collect();
            if pool.len() < level {
                continue;
            }
            for subset in Combinations::new(&pool, level) {
                if !seen.insert(subset.clone()) {
                    continue;
                }
                let conditioning: Vec<&Variable> =
                    subset.iter().map(|&s| &self.variables[s]).collect();
                match self.test.test(
                    &self.variables[i],
                    &self.variables[j],
                    &conditioning,
                    self.data,
                ) {
                    Ok(stat) => {
                        outcome.tested += 1;
                        outcome.max_p = outcome.max_p.max(stat.p_value);
                        if stat.p_value > self.alpha {
                            outcome.separated_by = Some(subset);
                            return outcome;
                        }
                    }
                    Err(e) => {
                        outcome.failed += 1;
                        debug!(
                            x = self.variables[i].name(),
                            y = self.variables[j].name(),
                            error = %e,
                            "independence test skipped"
                        );
                    }
                }
            }
        }
        outcome
    }
}
