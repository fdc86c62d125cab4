//! The individual guardrail layers, in pipeline order.

pub mod confidence;
pub mod grounding;
pub mod judge;
pub mod rules;
