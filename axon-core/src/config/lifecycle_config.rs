use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Lifecycle orchestrator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Maximum guardrail-rejection retries before the safe fallback answer.
    pub max_retries: u32,
    /// Bounded timeout for one specialist executor call.
    pub executor_timeout_ms: u64,
    /// External deadline for the whole message lifecycle.
    pub request_timeout_ms: u64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            executor_timeout_ms: 10_000,
            request_timeout_ms: 30_000,
        }
    }
}

impl LifecycleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.executor_timeout_ms == 0 {
            return Err(ConfigError::OutOfRange {
                field: "lifecycle.executor_timeout_ms".to_string(),
                value: 0.0,
                constraint: "must be positive".to_string(),
            });
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::OutOfRange {
                field: "lifecycle.request_timeout_ms".to_string(),
                value: 0.0,
                constraint: "must be positive".to_string(),
            });
        }
        if self.executor_timeout_ms > self.request_timeout_ms {
            return Err(ConfigError::Contradiction {
                reason: format!(
                    "executor_timeout_ms ({}) exceeds request_timeout_ms ({})",
                    self.executor_timeout_ms, self.request_timeout_ms
                ),
            });
        }
        Ok(())
    }
}
