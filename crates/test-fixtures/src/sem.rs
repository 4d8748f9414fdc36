//! Seeded linear structural-equation sampler.

use rand::distributions::Distribution;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use statrs::distribution::Normal;

use causallm_core::models::Dataset;

#[derive(Debug, Clone)]
enum Scale {
    Continuous,
    /// 1 when the latent linear value exceeds the threshold, else 0.
    Binary { threshold: f64 },
}

#[derive(Debug, Clone)]
struct SemNode {
    name: String,
    parents: Vec<(String, f64)>,
    intercept: f64,
    noise_sd: f64,
    scale: Scale,
}

/// Linear SEM with Gaussian noise. Nodes must be declared parents-first.
///
/// ```ignore
/// let sem = LinearSem::new()
///     .root("A", 1.0)
///     .root("B", 1.0)
///     .node("C", &[("A", 0.8), ("B", 0.8)], 1.0);
/// let data = sem.sample(2000, 7);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LinearSem {
    nodes: Vec<SemNode>,
}

impl LinearSem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exogenous continuous node with the given noise standard deviation.
    pub fn root(self, name: &str, noise_sd: f64) -> Self {
        self.node(name, &[], noise_sd)
    }

    /// Continuous node: `sum(coef * parent) + noise`.
    pub fn node(mut self, name: &str, parents: &[(&str, f64)], noise_sd: f64) -> Self {
        self.nodes.push(SemNode {
            name: name.to_string(),
            parents: parents.iter().map(|(p, c)| (p.to_string(), *c)).collect(),
            intercept: 0.0,
            noise_sd,
            scale: Scale::Continuous,
        });
        self
    }

    /// Binary categorical node thresholding `sum(coef * parent) + noise`.
    pub fn binary(mut self, name: &str, parents: &[(&str, f64)], threshold: f64) -> Self {
        self.nodes.push(SemNode {
            name: name.to_string(),
            parents: parents.iter().map(|(p, c)| (p.to_string(), *c)).collect(),
            intercept: 0.0,
            noise_sd: 1.0,
            scale: Scale::Binary { threshold },
        });
        self
    }

    /// Set the intercept of the most recently declared node.
    pub fn intercept(mut self, value: f64) -> Self {
        if let Some(last) = self.nodes.last_mut() {
            last.intercept = value;
        }
        self
    }

    /// Sample `n` rows with every node observed.
    pub fn sample(&self, n: usize, seed: u64) -> Dataset {
        self.sample_hiding(n, seed, &[])
    }

    /// Sample `n` rows, leaving the `hidden` nodes out of the dataset.
    ///
    /// # Panics
    /// Panics on a parent referenced before declaration.
    pub fn sample_hiding(&self, n: usize, seed: u64, hidden: &[&str]) -> Dataset {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut values: Vec<Vec<f64>> = Vec::with_capacity(self.nodes.len());

        for node in &self.nodes {
            let noise = Normal::new(0.0, node.noise_sd).expect("noise sd must be positive");
            let parents: Vec<(usize, f64)> = node
                .parents
                .iter()
                .map(|(p, c)| {
                    let idx = self
                        .nodes
                        .iter()
                        .position(|m| &m.name == p)
                        .filter(|&i| i < values.len())
                        .unwrap_or_else(|| panic!("parent {p} of {} not declared first", node.name));
                    (idx, *c)
                })
                .collect();

            let column = (0..n)
                .map(|row| {
                    let linear: f64 = node.intercept
                        + parents.iter().map(|&(i, c)| c * values[i][row]).sum::<f64>()
                        + noise.sample(&mut rng);
                    match node.scale {
                        Scale::Continuous => linear,
                        Scale::Binary { threshold } => {
                            if linear > threshold {
                                1.0
                            } else {
                                0.0
                            }
                        }
                    }
                })
                .collect();
            values.push(column);
        }

        let mut builder = Dataset::builder();
        for (node, column) in self.nodes.iter().zip(values) {
            if hidden.contains(&node.name.as_str()) {
                continue;
            }
            builder = match node.scale {
                Scale::Continuous => builder.continuous(&node.name, column),
                Scale::Binary { .. } => builder.categorical(&node.name, column),
            };
        }
        builder.build().expect("sampled columns are rectangular")
    }
}

/// The same rows in a seeded random order.
pub fn permute_rows(data: &Dataset, seed: u64) -> Dataset {
    let mut rows: Vec<usize> = (0..data.n_rows()).collect();
    rows.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));
    data.select_rows(&rows)
}
