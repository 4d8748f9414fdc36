//! Shared constants for the CausalLLM engine.

/// CausalLLM version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ---- Discovery ----

/// Default significance threshold for independence judgments.
pub const DEFAULT_SIGNIFICANCE: f64 = 0.05;

/// Confidence assigned to an edge kept because its tests could not be computed.
pub const UNTESTED_EDGE_CONFIDENCE: f64 = 0.1;

/// Default confidence for edges declared in parsed structural input.
pub const DEFAULT_PRIOR_CONFIDENCE: f64 = 1.0;

/// Clamp applied to partial correlations before the Fisher z transform.
pub const MAX_ABS_CORRELATION: f64 = 1.0 - 1e-12;

/// Relative spectral size below which a matrix is treated as singular.
pub const SINGULARITY_EPSILON: f64 = 1e-10;

/// Variance below which a column is treated as constant.
pub const ZERO_VARIANCE_EPSILON: f64 = 1e-12;

// ---- Estimation ----

/// Default number of bootstrap replicates for effect intervals.
pub const DEFAULT_BOOTSTRAP_SAMPLES: usize = 200;

/// Default two-sided confidence level for effect intervals.
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// Default seed for bootstrap resampling.
pub const DEFAULT_BOOTSTRAP_SEED: u64 = 42;

/// Largest adjustment-set size enumerated exhaustively.
pub const DEFAULT_MAX_ADJUSTMENT_SET_SIZE: usize = 8;

// ---- Oracle ----

/// Default per-call oracle timeout in milliseconds.
pub const DEFAULT_ORACLE_TIMEOUT_MS: u64 = 30_000;

/// Default minimum confidence for oracle-proposed edges.
pub const DEFAULT_ORACLE_MIN_CONFIDENCE: f64 = 0.0;

/// Confidence assumed when the oracle omits one.
pub const DEFAULT_ORACLE_CONFIDENCE: f64 = 0.5;

// ---- Config ----

/// Project-level config file name.
pub const PROJECT_CONFIG_FILE: &str = "causallm.toml";

/// User-level config directory name (under `$HOME`).
pub const USER_CONFIG_DIR: &str = ".causallm";

/// Environment variable holding the log filter.
pub const LOG_ENV_VAR: &str = "CAUSALLM_LOG";

/// Default log filter when `CAUSALLM_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "causallm=info";
