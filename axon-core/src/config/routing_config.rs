use serde::{Deserialize, Serialize};

use super::check_unit_range;
use crate::errors::ConfigError;

/// Intent router configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Decisions below this confidence are overridden to the clarification
    /// specialist with retrieval disabled.
    pub confidence_threshold: f64,
    /// Specialist id used for the low-confidence override.
    pub clarification_specialist: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.6,
            clarification_specialist: "clarify".to_string(),
        }
    }
}

impl RoutingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit_range("routing.confidence_threshold", self.confidence_threshold)?;
        if self.clarification_specialist.is_empty() {
            return Err(ConfigError::Contradiction {
                reason: "routing.clarification_specialist must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
