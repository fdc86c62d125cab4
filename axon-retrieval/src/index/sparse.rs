//! Per-tenant BM25 inverted index over document chunks.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;

use axon_core::constants::{BM25_B, BM25_K1};
use axon_core::errors::SearchError;
use axon_core::models::Chunk;

use super::{check_tenant, sort_scored, tokenize};

struct IndexedChunk {
    chunk: Chunk,
    term_freq: HashMap<String, usize>,
    len: usize,
}

#[derive(Default)]
struct TenantPostings {
    /// chunk_id → indexed chunk.
    chunks: HashMap<String, IndexedChunk>,
    /// document_id → chunk ids, for atomic replacement.
    by_doc: HashMap<String, Vec<String>>,
    total_len: usize,
}

/// Term-frequency index supporting BM25 keyword ranking, scoped by tenant at
/// the storage layer.
pub struct SparseIndex {
    tenants: DashMap<String, TenantPostings>,
    available: AtomicBool,
}

impl Default for SparseIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl SparseIndex {
    pub fn new() -> Self {
        Self {
            tenants: DashMap::new(),
            available: AtomicBool::new(true),
        }
    }

    /// Health probe consulted by the degradation ladder.
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }

    /// Simulate or recover from an outage (operational toggle, also used by
    /// degradation tests).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Relaxed);
    }

    /// Replace the chunk set for `(tenant, document)`. The swap happens under
    /// the tenant entry lock, so readers see the old set until the new set
    /// has fully committed.
    pub fn replace_document(&self, tenant_id: &str, document_id: &str, chunks: &[Chunk]) {
        let mut postings = self.tenants.entry(tenant_id.to_string()).or_default();
        if let Some(old_ids) = postings.by_doc.remove(document_id) {
            for id in old_ids {
                if let Some(entry) = postings.chunks.remove(&id) {
                    postings.total_len -= entry.len;
                }
            }
        }
        let mut ids = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let tokens = tokenize(&chunk.text);
            let len = tokens.len();
            let mut term_freq: HashMap<String, usize> = HashMap::new();
            for token in tokens {
                *term_freq.entry(token).or_default() += 1;
            }
            postings.total_len += len;
            ids.push(chunk.id.clone());
            postings.chunks.insert(
                chunk.id.clone(),
                IndexedChunk {
                    chunk: chunk.clone(),
                    term_freq,
                    len,
                },
            );
        }
        postings.by_doc.insert(document_id.to_string(), ids);
    }

    /// Remove a document's chunks.
    pub fn remove_document(&self, tenant_id: &str, document_id: &str) {
        if let Some(mut postings) = self.tenants.get_mut(tenant_id) {
            if let Some(old_ids) = postings.by_doc.remove(document_id) {
                for id in old_ids {
                    if let Some(entry) = postings.chunks.remove(&id) {
                        postings.total_len -= entry.len;
                    }
                }
            }
        }
    }

    /// Number of chunks indexed for a tenant.
    pub fn chunk_count(&self, tenant_id: &str) -> usize {
        self.tenants
            .get(tenant_id)
            .map(|p| p.chunks.len())
            .unwrap_or(0)
    }

    /// BM25 ranking of the tenant's chunks against the query. Results carry
    /// raw BM25 scores (non-negative, unbounded); the engine normalizes.
    pub fn search(
        &self,
        tenant_id: &str,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<(Chunk, f64)>, SearchError> {
        let query_terms = tokenize(query);
        if query_terms.is_empty() {
            return Ok(Vec::new());
        }
        let Some(postings) = self.tenants.get(tenant_id) else {
            return Ok(Vec::new());
        };

        let n = postings.chunks.len();
        if n == 0 {
            return Ok(Vec::new());
        }
        let avgdl = postings.total_len as f64 / n as f64;

        // Document frequency per query term.
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for term in &query_terms {
            let df = postings
                .chunks
                .values()
                .filter(|c| c.term_freq.contains_key(term))
                .count();
            doc_freq.insert(term.as_str(), df);
        }

        let mut results: Vec<(Chunk, f64)> = Vec::new();
        for entry in postings.chunks.values() {
            check_tenant(&entry.chunk, tenant_id)?;
            let mut score = 0.0;
            for term in &query_terms {
                let df = doc_freq[term.as_str()];
                if df == 0 {
                    continue;
                }
                let tf = *entry.term_freq.get(term).unwrap_or(&0) as f64;
                if tf == 0.0 {
                    continue;
                }
                let idf = (((n as f64 - df as f64 + 0.5) / (df as f64 + 0.5)) + 1.0).ln();
                let norm = tf * (BM25_K1 + 1.0)
                    / (tf + BM25_K1 * (1.0 - BM25_B + BM25_B * entry.len as f64 / avgdl));
                score += idf * norm;
            }
            if score > 0.0 {
                results.push((entry.chunk.clone(), score));
            }
        }

        sort_scored(&mut results);
        results.truncate(top_k);
        Ok(results)
    }
}
