/// Intent routing errors. All variants are recovered by the lifecycle with a
/// clarification fallback; they never surface to the caller.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error("classifier call failed: {reason}")]
    ClassifierFailed { reason: String },

    #[error("invalid routing output: {reason}")]
    InvalidRoutingOutput { reason: String },

    #[error("unknown specialist: {specialist_id}")]
    UnknownSpecialist { specialist_id: String },
}
