//! Layer 1: confidence gate. The specialist's self-reported confidence must
//! clear the per-vertical threshold; below it the candidate is rejected
//! outright.

use axon_core::models::{GuardrailLayer, GuardrailVerdict, SpecialistOutput};

pub fn check(output: &SpecialistOutput, threshold: f64) -> GuardrailVerdict {
    if output.confidence < threshold {
        GuardrailVerdict::reject(
            GuardrailLayer::ConfidenceGate,
            format!(
                "self-reported confidence {:.2} below threshold {:.2}",
                output.confidence, threshold
            ),
        )
        .with_score("confidence", output.confidence)
    } else {
        GuardrailVerdict::pass(GuardrailLayer::ConfidenceGate, "confidence above threshold")
            .with_score("confidence", output.confidence)
    }
}
