use serde::{Deserialize, Serialize};

use super::verdict::GuardrailVerdict;

/// Terminal artifact returned to the caller. The lifecycle always produces
/// one of these, never a raw error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub answer: String,
    pub confidence: f64,
    /// Chunk ids backing the answer, tier 1-3 retrieval only.
    pub sources: Vec<String>,
    pub trace_id: String,
    /// True for fallback answers: routing failure, exhausted retries,
    /// external cancellation.
    pub degraded: bool,
    /// Advisory guardrail flags from the accepted attempt.
    #[serde(default)]
    pub flags: Vec<GuardrailVerdict>,
}
