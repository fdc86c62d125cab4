//! # axon-lifecycle
//!
//! Drives one message through `Created → Routed → Executed → Verified →
//! Responded`, with bounded verification retries and an external request
//! deadline. The orchestrator always produces a [`ResponseEnvelope`]; every
//! failure mode folds into a degraded response.
//!
//! [`ResponseEnvelope`]: axon_core::models::ResponseEnvelope

pub mod orchestrator;
pub mod state;

pub use orchestrator::Orchestrator;
pub use state::Lifecycle;
