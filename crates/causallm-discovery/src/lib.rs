//! # causallm-discovery
//!
//! Data to validated causal graph.
//!
//! - `independence`: Fisher-z partial correlation, G-test and chi-squared
//! - `pc`: PC-stable skeleton search and PDAG orientation (v-structures, Meek)
//! - `engine`: statistical, oracle-only and hybrid discovery behind one async call

pub mod engine;
pub mod independence;
pub mod pc;

pub use engine::CausalDiscoveryEngine;
pub use independence::ConditionalIndependenceTest;
pub use pc::{PcAlgorithm, PcConfig};
