use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// How documents are split into chunks at index time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ChunkingStrategy {
    /// Recursive split on paragraph, then sentence, then word boundaries,
    /// with a character budget and overlap between adjacent chunks.
    FixedSize { max_chars: usize, overlap: usize },
    /// Each sentence becomes a chunk carrying `window` sentences of
    /// surrounding context on each side.
    SentenceWindow { window: usize },
    /// Split on markdown-style header lines.
    HeaderDelimited,
    /// Split on blank-line paragraph boundaries.
    Paragraph,
}

impl Default for ChunkingStrategy {
    fn default() -> Self {
        ChunkingStrategy::FixedSize {
            max_chars: 800,
            overlap: 100,
        }
    }
}

/// Hybrid search engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Candidate pool size per retrieval method before fusion.
    pub top_k: usize,
    /// Final result count after reranking (or fused truncation).
    pub rerank_top_k: usize,
    /// RRF smoothing constant. Higher k reduces the influence of
    /// high-ranking items from any single list.
    pub rrf_k: u32,
    /// Informational weight for the sparse method. Not consumed by RRF,
    /// which is rank-based; validated non-negative.
    pub bm25_weight: f64,
    /// Informational weight for the dense method. See `bm25_weight`.
    pub dense_weight: f64,
    /// Per-sub-search timeout. A timed-out sub-search counts as unavailable
    /// for degradation purposes.
    pub search_timeout_ms: u64,
    pub chunking: ChunkingStrategy,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            rerank_top_k: 5,
            rrf_k: 60,
            bm25_weight: 0.4,
            dense_weight: 0.6,
            search_timeout_ms: 2_000,
            chunking: ChunkingStrategy::default(),
        }
    }
}

impl RetrievalConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::OutOfRange {
                field: "retrieval.top_k".to_string(),
                value: 0.0,
                constraint: "must be positive".to_string(),
            });
        }
        if self.rerank_top_k == 0 {
            return Err(ConfigError::OutOfRange {
                field: "retrieval.rerank_top_k".to_string(),
                value: 0.0,
                constraint: "must be positive".to_string(),
            });
        }
        if self.rerank_top_k > self.top_k {
            return Err(ConfigError::Contradiction {
                reason: format!(
                    "rerank_top_k ({}) exceeds top_k ({})",
                    self.rerank_top_k, self.top_k
                ),
            });
        }
        if self.bm25_weight < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "retrieval.bm25_weight".to_string(),
                value: self.bm25_weight,
                constraint: "must be non-negative".to_string(),
            });
        }
        if self.dense_weight < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "retrieval.dense_weight".to_string(),
                value: self.dense_weight,
                constraint: "must be non-negative".to_string(),
            });
        }
        if self.search_timeout_ms == 0 {
            return Err(ConfigError::OutOfRange {
                field: "retrieval.search_timeout_ms".to_string(),
                value: 0.0,
                constraint: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}
