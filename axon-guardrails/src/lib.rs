//! # axon-guardrails
//!
//! Verification pipeline for candidate responses. Four ordered layers
//! (confidence gate, grounding check, domain rules, LLM judge), each
//! producing a verdict; the pipeline short-circuits on the first reject and
//! records flags as advisory metadata.

pub mod layers;
pub mod pipeline;

pub use pipeline::GuardrailPipeline;
