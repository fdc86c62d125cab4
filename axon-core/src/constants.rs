/// Axon system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fixed answer returned when every verification attempt was rejected.
pub const UNVERIFIED_FALLBACK_ANSWER: &str =
    "I could not produce an answer that passed verification. \
     Please rephrase your question or try again later.";

/// Fixed answer returned when intent classification fails.
pub const CLARIFICATION_ANSWER: &str =
    "I'm not sure what you're asking for. Could you rephrase your question \
     with a bit more detail?";

/// Fixed answer returned when the request deadline cancels the lifecycle.
pub const CANCELLED_ANSWER: &str =
    "The request took too long to process and was cancelled. Please try again.";

/// Disclaimer appended to degraded responses.
pub const LOW_CONFIDENCE_DISCLAIMER: &str =
    "Note: this answer was produced in degraded mode and may be incomplete.";

/// Confidence multiplier applied when the answer was grounded on
/// reduced-quality (tier 3-4) retrieval.
pub const REDUCED_QUALITY_CONFIDENCE_WEIGHT: f64 = 0.9;

/// BM25 term-frequency saturation parameter.
pub const BM25_K1: f64 = 1.2;

/// BM25 length-normalization parameter.
pub const BM25_B: f64 = 0.75;
