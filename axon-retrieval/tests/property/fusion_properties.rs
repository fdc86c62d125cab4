//! Property tests for reciprocal rank fusion.

use std::collections::HashSet;

use proptest::prelude::*;

use axon_retrieval::fusion::{fuse, max_fused_score};

fn ranked_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set("[a-z]{1,6}", 0..20).prop_map(|set| set.into_iter().collect())
}

proptest! {
    /// Fusion is deterministic: same inputs, same output order.
    #[test]
    fn fusion_is_deterministic(sparse in ranked_list(), dense in ranked_list(), k in 1u32..200) {
        let first = fuse(&sparse, &dense, k);
        let second = fuse(&sparse, &dense, k);
        prop_assert_eq!(first, second);
    }

    /// Every input id appears exactly once in the fused output, and nothing
    /// else does.
    #[test]
    fn fusion_preserves_the_candidate_set(sparse in ranked_list(), dense in ranked_list(), k in 1u32..200) {
        let fused = fuse(&sparse, &dense, k);
        let expected: HashSet<&str> = sparse
            .iter()
            .chain(dense.iter())
            .map(String::as_str)
            .collect();
        let actual: HashSet<&str> = fused.iter().map(|f| f.chunk_id.as_str()).collect();
        prop_assert_eq!(fused.len(), actual.len());
        prop_assert_eq!(actual, expected);
    }

    /// Output is sorted by fused score descending, and all scores are
    /// bounded by the best possible two-list score.
    #[test]
    fn fusion_output_is_sorted_and_bounded(sparse in ranked_list(), dense in ranked_list(), k in 1u32..200) {
        let fused = fuse(&sparse, &dense, k);
        for pair in fused.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
        let bound = max_fused_score(k);
        for candidate in &fused {
            prop_assert!(candidate.score > 0.0);
            prop_assert!(candidate.score <= bound + 1e-12);
        }
    }

    /// A candidate at the top of both lists dominates every other candidate.
    #[test]
    fn rank_one_in_both_lists_wins(mut sparse in ranked_list(), mut dense in ranked_list(), k in 1u32..200) {
        sparse.retain(|id| id != "winner");
        dense.retain(|id| id != "winner");
        sparse.insert(0, "winner".to_string());
        dense.insert(0, "winner".to_string());
        let fused = fuse(&sparse, &dense, k);
        prop_assert_eq!(fused[0].chunk_id.as_str(), "winner");
    }

    /// Fusion only reads rank positions: reversing one list changes scores
    /// but never invents or drops candidates.
    #[test]
    fn reversing_a_list_keeps_the_candidate_set(sparse in ranked_list(), dense in ranked_list(), k in 1u32..200) {
        let forward = fuse(&sparse, &dense, k);
        let mut reversed_dense = dense.clone();
        reversed_dense.reverse();
        let reversed = fuse(&sparse, &reversed_dense, k);
        let forward_ids: HashSet<&str> = forward.iter().map(|f| f.chunk_id.as_str()).collect();
        let reversed_ids: HashSet<&str> = reversed.iter().map(|f| f.chunk_id.as_str()).collect();
        prop_assert_eq!(forward_ids, reversed_ids);
    }
}
