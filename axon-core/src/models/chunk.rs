use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A document submitted for indexing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInput {
    pub id: String,
    pub tenant_id: String,
    pub text: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

/// An indexed fragment of a document. Immutable once indexed; removed only
/// by explicit re-indexing or removal of its parent document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// `{document_id}#{position}`, stable across re-indexing.
    pub id: String,
    pub tenant_id: String,
    pub text: String,
    pub embedding: Vec<f32>,
    pub metadata: BTreeMap<String, String>,
    pub source_document_id: String,
    /// Zero-based position within the parent document's chunk sequence.
    pub position: usize,
    /// blake3 hash of the chunk text, used for idempotent re-indexing.
    pub content_hash: String,
}

impl Chunk {
    /// Compute the blake3 content hash of a chunk's text.
    pub fn compute_content_hash(text: &str) -> String {
        blake3::hash(text.as_bytes()).to_hex().to_string()
    }

    /// Stable chunk id from parent document id and position.
    pub fn make_id(document_id: &str, position: usize) -> String {
        format!("{document_id}#{position}")
    }
}

/// Statistics from one indexing call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexStats {
    /// Documents processed.
    pub documents: usize,
    /// Chunks written across all indices.
    pub chunks: usize,
    /// Documents whose prior chunk set was replaced (content changed).
    pub replaced: usize,
    /// Documents skipped because content was unchanged.
    pub unchanged: usize,
}
