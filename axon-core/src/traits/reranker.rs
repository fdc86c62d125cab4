use crate::errors::AxonResult;

/// Cross-encoder style pair scorer for the reranking stage.
///
/// Takes `(query, candidate_text)` and produces a direct relevance score.
/// Unavailability degrades the search engine to tier 2 (fused order without
/// reranking) rather than failing the query.
pub trait IReranker: Send + Sync {
    fn score(&self, query: &str, candidate: &str) -> AxonResult<f64>;
    fn name(&self) -> &str;
    fn is_available(&self) -> bool {
        true
    }
}
