//! # axon-core
//!
//! Foundation crate for the Axon orchestration engine.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod telemetry;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::AxonConfig;
pub use errors::{AxonError, AxonResult};
pub use models::{
    Chunk, DocumentInput, ExecutionContext, GuardrailVerdict, ResponseEnvelope, RetrievalMethod,
    RoutingDecision, SearchResult, TenantContext, VerdictChain, VerdictOutcome,
};
