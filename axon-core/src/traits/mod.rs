//! Collaborator traits at the engine's seams.
//!
//! The generation, classification, and judging capabilities are external:
//! the engine invokes them as opaque functions and never trusts their output
//! without validation.

mod classifier;
mod embedding;
mod executor;
mod judge;
mod reranker;

pub use classifier::IIntentClassifier;
pub use embedding::IEmbeddingProvider;
pub use executor::ISpecialistExecutor;
pub use judge::IJudge;
pub use reranker::IReranker;
