//! Configuration management for envprobe
//!
//! Settings are loaded from environment variables with sensible defaults.
//!
//! # Environment Variables
//!
//! - `ENVPROBE_FAILURE_POLICY`: how detector failures are handled
//!   (isolate|abort) - default: "isolate"
//! - `ENVPROBE_SCRATCH_DIR`: directory for probe scratch files - default:
//!   system temp dir + "envprobe"
//! - `ENVPROBE_LOG_LEVEL`: logging level - default: "info"

use crate::engine::FailurePolicy;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_SCRATCH_SUBDIR: &str = "envprobe";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failure policy value not recognized
    #[error("invalid ENVPROBE_FAILURE_POLICY: {0}")]
    InvalidPolicy(String),

    /// Configuration validation failed
    #[error("configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Main configuration structure for envprobe
#[derive(Debug, Clone)]
pub struct EnvprobeConfig {
    /// How detector evaluation failures are handled
    pub failure_policy: FailurePolicy,

    /// Directory the filesystem probes use for scratch files
    pub scratch_dir: PathBuf,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for EnvprobeConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::default(),
            scratch_dir: env::temp_dir().join(DEFAULT_SCRATCH_SUBDIR),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl EnvprobeConfig {
    /// Loads configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(policy) = env::var("ENVPROBE_FAILURE_POLICY") {
            config.failure_policy = policy.parse().map_err(ConfigError::InvalidPolicy)?;
        }
        if let Ok(dir) = env::var("ENVPROBE_SCRATCH_DIR") {
            if !dir.is_empty() {
                config.scratch_dir = PathBuf::from(dir);
            }
        }
        if let Ok(level) = env::var("ENVPROBE_LOG_LEVEL") {
            if !level.is_empty() {
                config.log_level = level;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks invariants that cannot be encoded in the types.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scratch_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "scratch directory must not be empty".to_string(),
            ));
        }
        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(ConfigError::ValidationFailed(format!(
                "invalid log level '{}', valid levels: trace, debug, info, warn, error",
                other
            ))),
        }
    }
}
