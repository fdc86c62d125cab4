//! Per-tenant index implementations.
//!
//! All three stores apply the tenant filter at the storage layer: chunk sets
//! live under the tenant key, and a chunk whose `tenant_id` disagrees with
//! the querying tenant fails the request with
//! [`SearchError::TenantViolation`] instead of being silently scoped out.
//!
//! Mutation is append/replace-only under `(tenant_id, document_id)`;
//! replacement swaps the whole chunk set for a document atomically, so
//! concurrent readers see either the old set or the new set, never a mix.
//!
//! [`SearchError::TenantViolation`]: axon_core::errors::SearchError

mod dense;
mod fallback;
mod sparse;

pub use dense::DenseIndex;
pub use fallback::FallbackStore;
pub use sparse::SparseIndex;

use axon_core::errors::SearchError;
use axon_core::models::Chunk;

/// Storage-layer tenant check. Returns `TenantViolation` on the first chunk
/// that does not belong to the querying tenant.
pub(crate) fn check_tenant(chunk: &Chunk, expected: &str) -> Result<(), SearchError> {
    if chunk.tenant_id != expected {
        return Err(SearchError::TenantViolation {
            chunk_id: chunk.id.clone(),
            expected: expected.to_string(),
            actual: chunk.tenant_id.clone(),
        });
    }
    Ok(())
}

/// Sort scored chunks by score descending, breaking ties by chunk id so the
/// ordering is deterministic and reproducible.
pub(crate) fn sort_scored(results: &mut [(Chunk, f64)]) {
    results.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.id.cmp(&b.0.id))
    });
}

/// Lowercased alphanumeric tokens.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
