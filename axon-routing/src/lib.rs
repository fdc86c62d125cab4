//! # axon-routing
//!
//! Maps an incoming message to a specialist: keyword fast-path first, then
//! the constrained classifier, with every decision validated and a
//! clarification override for low-confidence classifications.

pub mod registry;
pub mod router;

pub use registry::{SpecialistProfile, SpecialistRegistry};
pub use router::IntentRouter;
