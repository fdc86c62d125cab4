//! Error taxonomy for the Axon engine.
//!
//! Every anticipated failure mode (classification uncertainty, retrieval
//! degradation, guardrail rejection, executor timeout) is handled inside the
//! lifecycle and never reaches the caller as a raw error. Only the variants
//! marked fatal below abort a message.

mod config_error;
mod guardrail_error;
mod lifecycle_error;
mod routing_error;
mod search_error;

pub use config_error::ConfigError;
pub use guardrail_error::GuardrailError;
pub use lifecycle_error::LifecycleError;
pub use routing_error::RoutingError;
pub use search_error::{IndexError, SearchError};

/// Umbrella error for all Axon subsystems.
#[derive(Debug, thiserror::Error)]
pub enum AxonError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error(transparent)]
    Guardrail(#[from] GuardrailError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Truly unexpected conditions only. Fatal to the current message.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Workspace-wide result alias.
pub type AxonResult<T> = Result<T, AxonError>;
