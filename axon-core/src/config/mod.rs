//! Typed configuration for the orchestration engine.
//!
//! Loaded once at startup from TOML and validated eagerly: an out-of-range
//! threshold or contradictory weight fails fast with [`ConfigError`] instead
//! of being discovered lazily per request.

mod guardrail_config;
mod lifecycle_config;
mod retrieval_config;
mod routing_config;

pub use guardrail_config::{DomainRule, GuardrailConfig, RuleAction, RuleKind};
pub use lifecycle_config::LifecycleConfig;
pub use retrieval_config::{ChunkingStrategy, RetrievalConfig};
pub use routing_config::RoutingConfig;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Root configuration. Every section has complete defaults so an empty TOML
/// document yields a working configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AxonConfig {
    pub retrieval: RetrievalConfig,
    pub routing: RoutingConfig,
    pub guardrails: GuardrailConfig,
    pub lifecycle: LifecycleConfig,
}

impl AxonConfig {
    /// Parse from a TOML string and validate.
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: AxonConfig = toml::from_str(input).map_err(|e| ConfigError::ParseFailed {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section. Called by `from_toml`; exposed for configs
    /// built programmatically.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.retrieval.validate()?;
        self.routing.validate()?;
        self.guardrails.validate()?;
        self.lifecycle.validate()?;
        Ok(())
    }
}

pub(crate) fn check_unit_range(field: &str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::OutOfRange {
            field: field.to_string(),
            value,
            constraint: "must be in [0, 1]".to_string(),
        });
    }
    Ok(())
}
