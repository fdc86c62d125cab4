//! Cross-encoder style reranking over the fused candidate set.
//!
//! Purely additive reordering: the reranker rescores candidates that fusion
//! already selected and never introduces new ones.

use axon_core::errors::AxonResult;
use axon_core::models::Chunk;
use axon_core::traits::IReranker;

/// Rescore `(query, candidate_text)` pairs and return the candidates ordered
/// by reranker score descending, truncated to `rerank_top_k`. Ties break by
/// chunk id.
pub fn rerank(
    reranker: &dyn IReranker,
    query: &str,
    candidates: Vec<Chunk>,
    rerank_top_k: usize,
) -> AxonResult<Vec<(Chunk, f64)>> {
    let mut scored = Vec::with_capacity(candidates.len());
    for chunk in candidates {
        let score = reranker.score(query, &chunk.text)?.clamp(0.0, 1.0);
        scored.push((chunk, score));
    }
    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.id.cmp(&b.0.id))
    });
    scored.truncate(rerank_top_k);
    Ok(scored)
}

/// Default reranker: lexical overlap between query and candidate terms.
///
/// Stands in when no cross-encoder model is wired up; the trait boundary
/// lets a model-backed scorer drop in without engine changes.
pub struct TermOverlapReranker;

impl IReranker for TermOverlapReranker {
    fn score(&self, query: &str, candidate: &str) -> AxonResult<f64> {
        let query_terms: std::collections::HashSet<String> =
            crate::index::tokenize(query).into_iter().collect();
        if query_terms.is_empty() {
            return Ok(0.0);
        }
        let candidate_terms: std::collections::HashSet<String> =
            crate::index::tokenize(candidate).into_iter().collect();
        let overlap = query_terms.intersection(&candidate_terms).count();
        Ok(overlap as f64 / query_terms.len() as f64)
    }

    fn name(&self) -> &str {
        "term-overlap"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn chunk(id: &str, text: &str) -> Chunk {
        Chunk {
            id: id.to_string(),
            tenant_id: "t1".to_string(),
            text: text.to_string(),
            embedding: Vec::new(),
            metadata: BTreeMap::new(),
            source_document_id: "d1".to_string(),
            position: 0,
            content_hash: Chunk::compute_content_hash(text),
        }
    }

    #[test]
    fn reorders_by_pair_score() {
        let reranker = TermOverlapReranker;
        let out = rerank(
            &reranker,
            "refund policy window",
            vec![
                chunk("a", "shipping times vary"),
                chunk("b", "the refund policy window is thirty days"),
            ],
            2,
        )
        .unwrap();
        assert_eq!(out[0].0.id, "b");
    }

    #[test]
    fn never_introduces_candidates() {
        let reranker = TermOverlapReranker;
        let out = rerank(&reranker, "q", vec![chunk("a", "text")], 5).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn truncates_to_top_k() {
        let reranker = TermOverlapReranker;
        let out = rerank(
            &reranker,
            "alpha",
            vec![
                chunk("a", "alpha"),
                chunk("b", "alpha"),
                chunk("c", "alpha"),
            ],
            2,
        )
        .unwrap();
        assert_eq!(out.len(), 2);
        // Equal scores: lexicographic id order.
        assert_eq!(out[0].0.id, "a");
        assert_eq!(out[1].0.id, "b");
    }
}
