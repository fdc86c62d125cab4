/// Guardrail pipeline errors.
///
/// A `Reject` verdict is normal control flow, not an error; these variants
/// cover the layers themselves failing to evaluate.
#[derive(Debug, thiserror::Error)]
pub enum GuardrailError {
    #[error("judge call failed: {reason}")]
    JudgeFailed { reason: String },

    #[error("judge timed out after {timeout_ms}ms")]
    JudgeTimeout { timeout_ms: u64 },

    #[error("invalid rule {rule}: {reason}")]
    InvalidRule { rule: String, reason: String },
}
