//! Engine configuration
//!
//! Settings are read from an optional file (format picked by extension)
//! and overridden by `STEPWISE_`-prefixed environment variables, with `__`
//! separating nested keys:
//!
//! ```text
//! STEPWISE_DRY_RUN=true
//! STEPWISE_MAX_RESOLUTION_ROUNDS=32
//! STEPWISE_BATCH_VARIABLES__HOST=localhost
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ::config::{Config, Environment, File};
use serde::Deserialize;
use stepwise_application::DEFAULT_MAX_ROUNDS;
use stepwise_application::variable_resolver::{DEFAULT_MAX_PASSES, DEFAULT_MAX_RESOLVED_LEN};
use stepwise_domain::Value;
use thiserror::Error;

const ENV_PREFIX: &str = "STEPWISE";
const ENV_SEPARATOR: &str = "__";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration sources could not be read or deserialized.
    #[error("Configuration error: {0}")]
    Load(#[from] ::config::ConfigError),

    /// A loaded value is out of range.
    #[error("Invalid configuration value for '{key}': {reason}")]
    Invalid {
        /// The offending key.
        key: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Settings of the resolution engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Skip dynamic variables and expressions.
    pub dry_run: bool,
    /// Ceiling on variable/expression rounds of the placeholder resolver.
    pub max_resolution_rounds: usize,
    /// Ceiling on substitution passes of the variable resolver.
    pub max_variable_passes: usize,
    /// Byte budget for text produced while resolving one argument.
    pub max_resolved_len: usize,
    /// Base directory examples table resources are loaded from.
    pub resource_root: PathBuf,
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Seed of the batch variable scope.
    pub batch_variables: HashMap<String, serde_json::Value>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            max_resolution_rounds: DEFAULT_MAX_ROUNDS,
            max_variable_passes: DEFAULT_MAX_PASSES,
            max_resolved_len: DEFAULT_MAX_RESOLVED_LEN,
            resource_root: PathBuf::from("."),
            log_filter: "info".to_string(),
            batch_variables: HashMap::new(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from environment variables only.
    ///
    /// # Errors
    /// Returns an error if a variable cannot be deserialized or a ceiling
    /// is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Loads configuration from `path` (if it exists) overridden by
    /// environment variables.
    ///
    /// # Errors
    /// Returns an error if the file is malformed, a value cannot be
    /// deserialized or a ceiling is zero.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }
        let config: Self = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        config.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.max_resolution_rounds == 0 {
            return Err(ConfigError::Invalid {
                key: "max_resolution_rounds",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_variable_passes == 0 {
            return Err(ConfigError::Invalid {
                key: "max_variable_passes",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_resolved_len == 0 {
            return Err(ConfigError::Invalid {
                key: "max_resolved_len",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(self)
    }

    /// Returns the batch variables as engine values.
    #[must_use]
    pub fn batch_values(&self) -> HashMap<String, Value> {
        self.batch_variables
            .iter()
            .map(|(key, value)| (key.clone(), Value::from(value.clone())))
            .collect()
    }
}
