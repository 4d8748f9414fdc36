//! Top-level CausalLLM configuration with 4-layer resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{CiTestSelection, DiscoveryConfig, EstimationConfig, EstimatorKind, OracleConfig};
use crate::constants;
use crate::errors::ConfigError;
use crate::models::DiscoveryMethod;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Programmatic overrides (applied via `apply_overrides`)
/// 2. Environment variables (`CAUSALLM_*`)
/// 3. Project config (`causallm.toml` in the project root)
/// 4. User config (`~/.causallm/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CausalConfig {
    pub discovery: DiscoveryConfig,
    pub estimation: EstimationConfig,
    pub oracle: OracleConfig,
}

/// Programmatic overrides applied on top of every other layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub significance: Option<f64>,
    pub default_method: Option<DiscoveryMethod>,
    pub bootstrap_samples: Option<usize>,
    pub seed: Option<u64>,
    pub oracle_timeout_ms: Option<u64>,
}

impl CausalConfig {
    /// Load configuration with 4-layer resolution rooted at `root`.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(path = %user_config_path.display(), error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join(constants::PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): programmatic overrides
        if let Some(overrides) = overrides {
            Self::apply_overrides(&mut config, overrides);
        }

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &CausalConfig) -> Result<(), ConfigError> {
        if let Some(alpha) = config.discovery.significance {
            if !(alpha > 0.0 && alpha < 1.0) {
                return Err(invalid("discovery.significance", "must be in (0, 1)"));
            }
        }
        if let Some(level) = config.estimation.confidence_level {
            if !(level > 0.0 && level < 1.0) {
                return Err(invalid("estimation.confidence_level", "must be in (0, 1)"));
            }
        }
        if config.estimation.bootstrap_samples == Some(0) {
            return Err(invalid(
                "estimation.bootstrap_samples",
                "must be greater than 0",
            ));
        }
        if let Some(min) = config.oracle.min_confidence {
            if !(0.0..=1.0).contains(&min) {
                return Err(invalid("oracle.min_confidence", "must be between 0.0 and 1.0"));
            }
        }
        if config.oracle.timeout_ms == Some(0) {
            return Err(invalid("oracle.timeout_ms", "must be greater than 0"));
        }
        Ok(())
    }

    /// Returns the user config path: `~/.causallm/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(constants::USER_CONFIG_DIR).join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut CausalConfig, path: &Path) -> Result<(), ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
                path: path.display().to_string(),
            })?;

        let file_config: CausalConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins wherever it has a value.
    fn merge(base: &mut CausalConfig, other: &CausalConfig) {
        // Discovery
        if other.discovery.significance.is_some() {
            base.discovery.significance = other.discovery.significance;
        }
        if other.discovery.max_conditioning_size.is_some() {
            base.discovery.max_conditioning_size = other.discovery.max_conditioning_size;
        }
        if other.discovery.parallel.is_some() {
            base.discovery.parallel = other.discovery.parallel;
        }
        if other.discovery.ci_test.is_some() {
            base.discovery.ci_test = other.discovery.ci_test;
        }
        if other.discovery.default_method.is_some() {
            base.discovery.default_method = other.discovery.default_method;
        }

        // Estimation
        if other.estimation.bootstrap_samples.is_some() {
            base.estimation.bootstrap_samples = other.estimation.bootstrap_samples;
        }
        if other.estimation.confidence_level.is_some() {
            base.estimation.confidence_level = other.estimation.confidence_level;
        }
        if other.estimation.seed.is_some() {
            base.estimation.seed = other.estimation.seed;
        }
        if other.estimation.estimator.is_some() {
            base.estimation.estimator = other.estimation.estimator;
        }
        if other.estimation.max_adjustment_set_size.is_some() {
            base.estimation.max_adjustment_set_size =
                other.estimation.max_adjustment_set_size;
        }

        // Oracle
        if other.oracle.timeout_ms.is_some() {
            base.oracle.timeout_ms = other.oracle.timeout_ms;
        }
        if other.oracle.min_confidence.is_some() {
            base.oracle.min_confidence = other.oracle.min_confidence;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `CAUSALLM_DISCOVERY_SIGNIFICANCE`, `CAUSALLM_ORACLE_TIMEOUT_MS`, etc.
    fn apply_env_overrides(config: &mut CausalConfig) {
        if let Some(v) = env_parse::<f64>("CAUSALLM_DISCOVERY_SIGNIFICANCE") {
            config.discovery.significance = Some(v);
        }
        if let Some(v) = env_parse::<usize>("CAUSALLM_DISCOVERY_MAX_CONDITIONING_SIZE") {
            config.discovery.max_conditioning_size = Some(v);
        }
        if let Some(v) = env_parse::<bool>("CAUSALLM_DISCOVERY_PARALLEL") {
            config.discovery.parallel = Some(v);
        }
        if let Ok(val) = std::env::var("CAUSALLM_DISCOVERY_CI_TEST") {
            if let Some(v) = parse_ci_test(&val) {
                config.discovery.ci_test = Some(v);
            }
        }
        if let Ok(val) = std::env::var("CAUSALLM_DISCOVERY_METHOD") {
            if let Ok(v) = val.parse::<DiscoveryMethod>() {
                config.discovery.default_method = Some(v);
            }
        }
        if let Some(v) = env_parse::<usize>("CAUSALLM_ESTIMATION_BOOTSTRAP_SAMPLES") {
            config.estimation.bootstrap_samples = Some(v);
        }
        if let Some(v) = env_parse::<f64>("CAUSALLM_ESTIMATION_CONFIDENCE_LEVEL") {
            config.estimation.confidence_level = Some(v);
        }
        if let Some(v) = env_parse::<u64>("CAUSALLM_ESTIMATION_SEED") {
            config.estimation.seed = Some(v);
        }
        if let Ok(val) = std::env::var("CAUSALLM_ESTIMATION_ESTIMATOR") {
            if let Some(v) = parse_estimator(&val) {
                config.estimation.estimator = Some(v);
            }
        }
        if let Some(v) = env_parse::<u64>("CAUSALLM_ORACLE_TIMEOUT_MS") {
            config.oracle.timeout_ms = Some(v);
        }
        if let Some(v) = env_parse::<f64>("CAUSALLM_ORACLE_MIN_CONFIDENCE") {
            config.oracle.min_confidence = Some(v);
        }
    }

    /// Apply programmatic overrides (highest priority).
    fn apply_overrides(config: &mut CausalConfig, overrides: &ConfigOverrides) {
        if let Some(v) = overrides.significance {
            config.discovery.significance = Some(v);
        }
        if let Some(v) = overrides.default_method {
            config.discovery.default_method = Some(v);
        }
        if let Some(v) = overrides.bootstrap_samples {
            config.estimation.bootstrap_samples = Some(v);
        }
        if let Some(v) = overrides.seed {
            config.estimation.seed = Some(v);
        }
        if let Some(v) = overrides.oracle_timeout_ms {
            config.oracle.timeout_ms = Some(v);
        }
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

fn parse_ci_test(value: &str) -> Option<CiTestSelection> {
    match value.trim().to_ascii_lowercase().as_str() {
        "auto" => Some(CiTestSelection::Auto),
        "partial_correlation" | "fisher_z" => Some(CiTestSelection::PartialCorrelation),
        "g_test" | "gtest" => Some(CiTestSelection::GTest),
        "chi_squared" | "chisq" => Some(CiTestSelection::ChiSquared),
        _ => None,
    }
}

fn parse_estimator(value: &str) -> Option<EstimatorKind> {
    match value.trim().to_ascii_lowercase().as_str() {
        "auto" => Some(EstimatorKind::Auto),
        "regression" => Some(EstimatorKind::Regression),
        "stratification" => Some(EstimatorKind::Stratification),
        _ => None,
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
