/// Retrieval subsystem errors.
///
/// A single sub-search failing is not an error at this level; the engine
/// degrades to the next tier. `AllTiersExhausted` is the only terminal case.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("tenant isolation violation: chunk {chunk_id} belongs to {actual}, query scoped to {expected}")]
    TenantViolation {
        chunk_id: String,
        expected: String,
        actual: String,
    },

    #[error("empty tenant id on search request")]
    MissingTenant,

    #[error("all retrieval tiers exhausted: {reason}")]
    AllTiersExhausted { reason: String },

    #[error("query embedding failed: {reason}")]
    EmbeddingFailed { reason: String },
}

/// Indexing-side errors.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("document {document_id} has empty text")]
    EmptyDocument { document_id: String },

    #[error("document {document_id} has empty tenant id")]
    MissingTenant { document_id: String },

    #[error("embedding failed for document {document_id}: {reason}")]
    EmbeddingFailed {
        document_id: String,
        reason: String,
    },
}
