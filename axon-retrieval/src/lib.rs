//! # axon-retrieval
//!
//! The hybrid search pipeline: chunking, per-tenant sparse (BM25) and dense
//! (vector) indices, reciprocal rank fusion, reranking, and the four-tier
//! graceful-degradation ladder.

pub mod chunking;
pub mod engine;
pub mod fusion;
pub mod index;
pub mod rerank;

pub use engine::HybridSearchEngine;
pub use index::{DenseIndex, FallbackStore, SparseIndex};
