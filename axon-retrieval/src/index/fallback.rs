//! Tier-4 emergency store: substring/keyword match over an in-memory copy
//! of the corpus. Last resort when both real indices are down.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;

use axon_core::errors::SearchError;
use axon_core::models::Chunk;

use super::{check_tenant, sort_scored, tokenize};

#[derive(Default)]
struct TenantDocs {
    by_doc: HashMap<String, Vec<Chunk>>,
}

/// Keyword fallback store. Scores by the fraction of query terms appearing
/// as substrings of the chunk text.
pub struct FallbackStore {
    tenants: DashMap<String, TenantDocs>,
    available: AtomicBool,
}

impl Default for FallbackStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FallbackStore {
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

    pub fn replace_document(&self, tenant_id: &str, document_id: &str, chunks: &[Chunk]) {
        let mut docs = self.tenants.entry(tenant_id.to_string()).or_default();
        docs.by_doc.insert(document_id.to_string(), chunks.to_vec());
    }

    pub fn remove_document(&self, tenant_id: &str, document_id: &str) {
        if let Some(mut docs) = self.tenants.get_mut(tenant_id) {
            docs.by_doc.remove(document_id);
        }
    }

    pub fn search(
        &self,
        tenant_id: &str,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<(Chunk, f64)>, SearchError> {
        let terms = tokenize(query);
        if terms.is_empty() {
            return Ok(Vec::new());
        }
        let Some(docs) = self.tenants.get(tenant_id) else {
            return Ok(Vec::new());
        };

        let mut results: Vec<(Chunk, f64)> = Vec::new();
        for chunk in docs.by_doc.values().flatten() {
            check_tenant(chunk, tenant_id)?;
            let haystack = chunk.text.to_lowercase();
            let matched = terms.iter().filter(|t| haystack.contains(t.as_str())).count();
            if matched > 0 {
                results.push((chunk.clone(), matched as f64 / terms.len() as f64));
            }
        }

        sort_scored(&mut results);
        results.truncate(top_k);
        Ok(results)
    }
}
