//! Reciprocal Rank Fusion: score = Σ 1/(k + rank_i)
//!
//! Combines the sparse and dense ranked lists into a single fused ranking
//! using only rank positions; no score calibration between methods is
//! needed, which makes fusion robust to the heterogeneous scoring scales of
//! BM25 and cosine similarity.

use std::collections::HashMap;

/// A candidate after RRF fusion.
#[derive(Debug, Clone, PartialEq)]
pub struct FusedCandidate {
    pub chunk_id: String,
    /// Raw RRF score (higher = more relevant).
    pub score: f64,
    /// 1-indexed rank in the dense list, if present. First tie-break key.
    pub dense_rank: Option<usize>,
    /// 1-indexed rank in the sparse list, if present.
    pub sparse_rank: Option<usize>,
}

/// Fuse the sparse and dense ranked id lists.
///
/// `k` is the smoothing constant (default 60). Higher k reduces the
/// influence of high-ranking items from any single list. A candidate absent
/// from a method contributes 0 for that method.
///
/// Ties in fused score break by the better (lower) dense rank, then
/// lexicographically by chunk id, so the output order is fully deterministic.
pub fn fuse(sparse_ranked: &[String], dense_ranked: &[String], k: u32) -> Vec<FusedCandidate> {
    let k = f64::from(k);
    let mut candidates: HashMap<&str, FusedCandidate> = HashMap::new();

    for (i, id) in sparse_ranked.iter().enumerate() {
        let rank = i + 1;
        let entry = candidates.entry(id).or_insert_with(|| FusedCandidate {
            chunk_id: id.clone(),
            score: 0.0,
            dense_rank: None,
            sparse_rank: None,
        });
        entry.score += 1.0 / (k + rank as f64);
        entry.sparse_rank = Some(rank);
    }
    for (i, id) in dense_ranked.iter().enumerate() {
        let rank = i + 1;
        let entry = candidates.entry(id).or_insert_with(|| FusedCandidate {
            chunk_id: id.clone(),
            score: 0.0,
            dense_rank: None,
            sparse_rank: None,
        });
        entry.score += 1.0 / (k + rank as f64);
        entry.dense_rank = Some(rank);
    }

    let mut fused: Vec<FusedCandidate> = candidates.into_values().collect();
    fused.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                let ar = a.dense_rank.unwrap_or(usize::MAX);
                let br = b.dense_rank.unwrap_or(usize::MAX);
                ar.cmp(&br)
            })
            .then_with(|| a.chunk_id.cmp(&b.chunk_id))
    });
    fused
}

/// Maximum possible fused score for two methods: appearing at rank 1 in
/// both lists. Used to normalize fused scores into [0, 1].
pub fn max_fused_score(k: u32) -> f64 {
    2.0 / (f64::from(k) + 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn candidate_in_both_lists_outranks_single_method() {
        let fused = fuse(&ids(&["a", "b"]), &ids(&["a", "c"]), 60);
        assert_eq!(fused[0].chunk_id, "a");
        assert!(fused[0].score > fused[1].score);
    }

    #[test]
    fn absent_method_contributes_zero() {
        let fused = fuse(&ids(&["a"]), &[], 60);
        assert_eq!(fused.len(), 1);
        assert!((fused[0].score - 1.0 / 61.0).abs() < 1e-12);
        assert_eq!(fused[0].dense_rank, None);
    }

    #[test]
    fn equal_scores_break_by_dense_rank_then_id() {
        // b and c each appear only once at the same rank position, so their
        // fused scores are exactly equal.
        let fused = fuse(&ids(&["a", "b"]), &ids(&["a", "c"]), 60);
        // c has dense rank 2, b has none: c wins the tie.
        assert_eq!(fused[1].chunk_id, "c");
        assert_eq!(fused[2].chunk_id, "b");
    }

    #[test]
    fn equal_scores_and_ranks_break_lexicographically() {
        let fused = fuse(&ids(&["x"]), &ids(&["y"]), 60);
        // Same fused score; x has no dense rank, y has dense rank 1.
        assert_eq!(fused[0].chunk_id, "y");
        // Two sparse-only candidates at the same rank cannot exist in one
        // list, so exercise the id tie-break with symmetric inputs.
        let fused = fuse(&[], &ids(&["b", "a"]), 60);
        assert_eq!(fused[0].chunk_id, "b");
    }

    #[test]
    fn higher_k_flattens_rank_influence() {
        let low_k = fuse(&ids(&["a", "b"]), &[], 1);
        let high_k = fuse(&ids(&["a", "b"]), &[], 1000);
        let low_gap = low_k[0].score - low_k[1].score;
        let high_gap = high_k[0].score - high_k[1].score;
        assert!(low_gap > high_gap);
    }
}
