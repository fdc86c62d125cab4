/// Configuration validation errors. Raised eagerly at load time, never
/// lazily per request.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    #[error("{field} = {value} is out of range: {constraint}")]
    OutOfRange {
        field: String,
        value: f64,
        constraint: String,
    },

    #[error("contradictory configuration: {reason}")]
    Contradiction { reason: String },
}
