//! Per-tenant vector index over chunk embeddings.
//!
//! Exact cosine scan; the persisted layout is opaque to the core, which
//! only requires vector similarity search keyed by tenant. An ANN backend
//! can replace the scan without touching the engine.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;

use axon_core::errors::SearchError;
use axon_core::models::Chunk;

use super::{check_tenant, sort_scored};

#[derive(Default)]
struct TenantVectors {
    by_doc: HashMap<String, Vec<Chunk>>,
}

/// Nearest-neighbor search over chunk embeddings, scoped by tenant at the
/// storage layer.
pub struct DenseIndex {
    tenants: DashMap<String, TenantVectors>,
    available: AtomicBool,
}

impl Default for DenseIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl DenseIndex {
    pub fn new() -> Self {
        Self {
            tenants: DashMap::new(),
            available: AtomicBool::new(true),
        }
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Relaxed);
    }

    /// Replace the chunk set for `(tenant, document)` atomically.
    pub fn replace_document(&self, tenant_id: &str, document_id: &str, chunks: &[Chunk]) {
        let mut vectors = self.tenants.entry(tenant_id.to_string()).or_default();
        vectors
            .by_doc
            .insert(document_id.to_string(), chunks.to_vec());
    }

    pub fn remove_document(&self, tenant_id: &str, document_id: &str) {
        if let Some(mut vectors) = self.tenants.get_mut(tenant_id) {
            vectors.by_doc.remove(document_id);
        }
    }

    pub fn chunk_count(&self, tenant_id: &str) -> usize {
        self.tenants
            .get(tenant_id)
            .map(|v| v.by_doc.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    /// Cosine-similarity ranking against the query embedding. Scores are
    /// clamped to [0, 1].
    pub fn search(
        &self,
        tenant_id: &str,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<(Chunk, f64)>, SearchError> {
        let Some(vectors) = self.tenants.get(tenant_id) else {
            return Ok(Vec::new());
        };

        let mut results: Vec<(Chunk, f64)> = Vec::new();
        for chunk in vectors.by_doc.values().flatten() {
            check_tenant(chunk, tenant_id)?;
            let score = cosine(query_embedding, &chunk.embedding).clamp(0.0, 1.0);
            if score > 0.0 {
                results.push((chunk.clone(), score));
            }
        }

        sort_scored(&mut results);
        results.truncate(top_k);
        Ok(results)
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        dot += f64::from(*x) * f64::from(*y);
        norm_a += f64::from(*x) * f64::from(*x);
        norm_b += f64::from(*y) * f64::from(*y);
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
