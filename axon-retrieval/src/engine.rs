//! The hybrid search engine and its four-tier degradation ladder.
//!
//! Tier 1: sparse + dense fused with RRF, then reranked.
//! Tier 2: sparse + dense fused, reranker unavailable.
//! Tier 3: a single surviving method (sparse or dense).
//! Tier 4: keyword fallback store.
//!
//! Every tier transition is recorded as a [`DegradationEvent`] and logged as
//! a warning. Only tier-4 exhaustion is an error; a tenant isolation
//! violation at any tier fails the request immediately.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use dashmap::DashMap;
use tracing::{debug, warn};

use axon_core::config::RetrievalConfig;
use axon_core::errors::{IndexError, SearchError};
use axon_core::models::{Chunk, DegradationEvent, DocumentInput, IndexStats, RetrievalMethod, SearchResult};
use axon_core::traits::{IEmbeddingProvider, IReranker};

use crate::chunking;
use crate::fusion::{self, FusedCandidate};
use crate::index::{DenseIndex, FallbackStore, SparseIndex};
use crate::rerank;

/// Outcome of one sub-search: `None` means the method was unavailable or
/// degraded for this query; the error case is reserved for tenant violations.
type SubOutcome = Result<Option<Vec<(Chunk, f64)>>, SearchError>;

pub struct HybridSearchEngine {
    sparse: Arc<SparseIndex>,
    dense: Arc<DenseIndex>,
    fallback: Arc<FallbackStore>,
    embedder: Arc<dyn IEmbeddingProvider>,
    reranker: Arc<dyn IReranker>,
    config: RetrievalConfig,
    /// `(tenant, document)` → ordered chunk content hashes, for idempotent
    /// re-indexing.
    manifest: DashMap<String, Vec<String>>,
    degradations: Mutex<Vec<DegradationEvent>>,
}

impl HybridSearchEngine {
    pub fn new(
        embedder: Arc<dyn IEmbeddingProvider>,
        reranker: Arc<dyn IReranker>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            sparse: Arc::new(SparseIndex::new()),
            dense: Arc::new(DenseIndex::new()),
            fallback: Arc::new(FallbackStore::new()),
            embedder,
            reranker,
            config,
            manifest: DashMap::new(),
            degradations: Mutex::new(Vec::new()),
        }
    }

    /// The sparse index, exposed for operational toggling.
    pub fn sparse_index(&self) -> &SparseIndex {
        &self.sparse
    }

    /// The dense index, exposed for operational toggling.
    pub fn dense_index(&self) -> &DenseIndex {
        &self.dense
    }

    /// The tier-4 fallback store.
    pub fn fallback_store(&self) -> &FallbackStore {
        &self.fallback
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Degradation events recorded since the last drain.
    pub fn drain_degradations(&self) -> Vec<DegradationEvent> {
        self.degradations
            .lock()
            .map(|mut events| events.drain(..).collect())
            .unwrap_or_default()
    }

    fn record_degradation(&self, component: &str, failure: &str, fallback_used: &str) {
        warn!(
            component,
            failure,
            fallback = fallback_used,
            "retrieval degraded"
        );
        if let Ok(mut events) = self.degradations.lock() {
            events.push(DegradationEvent::now(component, failure, fallback_used));
        }
    }

    /// Index (or re-index) a batch of documents across all three stores.
    ///
    /// Idempotent: a document whose chunk content hashes match the last
    /// indexed state is skipped. Changed documents have their whole chunk set
    /// replaced atomically per store.
    pub fn index(&self, documents: Vec<DocumentInput>) -> Result<IndexStats, IndexError> {
        let mut stats = IndexStats::default();
        for doc in documents {
            if doc.tenant_id.trim().is_empty() {
                return Err(IndexError::MissingTenant {
                    document_id: doc.id,
                });
            }
            if doc.text.trim().is_empty() {
                return Err(IndexError::EmptyDocument {
                    document_id: doc.id,
                });
            }
            stats.documents += 1;

            let fragments = chunking::split(&self.config.chunking, &doc.text);
            let hashes: Vec<String> = fragments
                .iter()
                .map(|f| Chunk::compute_content_hash(f))
                .collect();
            let key = manifest_key(&doc.tenant_id, &doc.id);
            if self.manifest.get(&key).is_some_and(|prior| *prior == hashes) {
                debug!(document = %doc.id, "content unchanged, skipping re-index");
                stats.unchanged += 1;
                continue;
            }
            let replacing = self.manifest.contains_key(&key);

            let mut chunks = Vec::with_capacity(fragments.len());
            for (position, fragment) in fragments.iter().enumerate() {
                let embedding =
                    self.embedder
                        .embed(fragment)
                        .map_err(|e| IndexError::EmbeddingFailed {
                            document_id: doc.id.clone(),
                            reason: e.to_string(),
                        })?;
                chunks.push(Chunk {
                    id: Chunk::make_id(&doc.id, position),
                    tenant_id: doc.tenant_id.clone(),
                    text: fragment.clone(),
                    embedding,
                    metadata: doc.metadata.clone(),
                    source_document_id: doc.id.clone(),
                    position,
                    content_hash: hashes[position].clone(),
                });
            }

            self.sparse.replace_document(&doc.tenant_id, &doc.id, &chunks);
            self.dense.replace_document(&doc.tenant_id, &doc.id, &chunks);
            self.fallback
                .replace_document(&doc.tenant_id, &doc.id, &chunks);
            self.manifest.insert(key, hashes);

            stats.chunks += chunks.len();
            if replacing {
                stats.replaced += 1;
            }
            debug!(
                document = %doc.id,
                chunks = chunks.len(),
                replaced = replacing,
                "document indexed"
            );
        }
        Ok(stats)
    }

    /// Remove a document from all stores and the idempotency manifest.
    pub fn remove_document(&self, tenant_id: &str, document_id: &str) {
        self.sparse.remove_document(tenant_id, document_id);
        self.dense.remove_document(tenant_id, document_id);
        self.fallback.remove_document(tenant_id, document_id);
        self.manifest.remove(&manifest_key(tenant_id, document_id));
    }

    /// Search with the configured result limit.
    pub async fn search(
        &self,
        tenant_id: &str,
        query: &str,
        filters: &BTreeMap<String, String>,
    ) -> Result<Vec<SearchResult>, SearchError> {
        self.search_with_limit(tenant_id, query, filters, self.config.rerank_top_k)
            .await
    }

    /// Search returning up to `limit` results, walking the degradation
    /// ladder as methods fail.
    pub async fn search_with_limit(
        &self,
        tenant_id: &str,
        query: &str,
        filters: &BTreeMap<String, String>,
        limit: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        if tenant_id.trim().is_empty() {
            return Err(SearchError::MissingTenant);
        }
        // Candidate pool per method; widened when the caller asks for more
        // results than the configured final count.
        let pool = limit.max(self.config.top_k);

        let (sparse_outcome, dense_outcome) =
            tokio::join!(self.sparse_sub_search(tenant_id, query, pool), self.dense_sub_search(tenant_id, query, pool));
        // Filters narrow the candidate pool before fusion and truncation, so
        // a matching chunk is never lost to the result cut.
        let sparse_results = sparse_outcome?.map(|r| retain_matching(r, filters));
        let dense_results = dense_outcome?.map(|r| retain_matching(r, filters));

        let results = match (sparse_results, dense_results) {
            (Some(sparse), Some(dense)) => self.fuse_and_rank(query, sparse, dense, limit)?,
            (None, Some(dense)) => {
                self.record_degradation("sparse_index", "unavailable", "dense-only search");
                label_results(dense, RetrievalMethod::Dense, limit)
            }
            (Some(sparse), None) => {
                self.record_degradation("dense_index", "unavailable", "sparse-only search");
                label_results(normalize_by_max(sparse), RetrievalMethod::Sparse, limit)
            }
            (None, None) => {
                self.record_degradation(
                    "hybrid_search",
                    "both retrieval methods unavailable",
                    "keyword fallback",
                );
                self.keyword_fallback(tenant_id, query, filters, limit)?
            }
        };

        debug!(
            tenant = tenant_id,
            results = results.len(),
            "search completed"
        );
        Ok(results)
    }

    async fn sparse_sub_search(&self, tenant_id: &str, query: &str, pool: usize) -> SubOutcome {
        if !self.sparse.is_available() {
            return Ok(None);
        }
        let index = Arc::clone(&self.sparse);
        let tenant = tenant_id.to_string();
        let query = query.to_string();
        self.run_sub_search("sparse_index", move || index.search(&tenant, &query, pool))
            .await
    }

    async fn dense_sub_search(&self, tenant_id: &str, query: &str, pool: usize) -> SubOutcome {
        if !self.dense.is_available() || !self.embedder.is_available() {
            return Ok(None);
        }
        let embedding = match self.embedder.embed(query) {
            Ok(embedding) => embedding,
            Err(e) => {
                let failure = SearchError::EmbeddingFailed {
                    reason: e.to_string(),
                };
                self.record_degradation(
                    "embedding_provider",
                    &failure.to_string(),
                    "dense method skipped",
                );
                return Ok(None);
            }
        };
        let index = Arc::clone(&self.dense);
        let tenant = tenant_id.to_string();
        self.run_sub_search("dense_index", move || {
            index.search(&tenant, &embedding, pool)
        })
        .await
    }

    /// Run one blocking sub-search under the per-method timeout. A timed-out
    /// or failed sub-search counts as unavailable; tenant violations abort
    /// the whole request.
    async fn run_sub_search<F>(&self, component: &str, search: F) -> SubOutcome
    where
        F: FnOnce() -> Result<Vec<(Chunk, f64)>, SearchError> + Send + 'static,
    {
        let timeout = Duration::from_millis(self.config.search_timeout_ms);
        match tokio::time::timeout(timeout, tokio::task::spawn_blocking(search)).await {
            Ok(Ok(Ok(results))) => Ok(Some(results)),
            Ok(Ok(Err(violation @ SearchError::TenantViolation { .. }))) => Err(violation),
            Ok(Ok(Err(e))) => {
                self.record_degradation(component, &e.to_string(), "next tier");
                Ok(None)
            }
            Ok(Err(join_err)) => {
                self.record_degradation(component, &join_err.to_string(), "next tier");
                Ok(None)
            }
            Err(_) => {
                self.record_degradation(component, "sub-search timed out", "next tier");
                Ok(None)
            }
        }
    }

    /// Tier 1/2: fuse the two ranked lists, then rerank if the reranker is
    /// up, otherwise fall back to normalized fused order.
    fn fuse_and_rank(
        &self,
        query: &str,
        sparse: Vec<(Chunk, f64)>,
        dense: Vec<(Chunk, f64)>,
        limit: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let sparse_ids: Vec<String> = sparse.iter().map(|(c, _)| c.id.clone()).collect();
        let dense_ids: Vec<String> = dense.iter().map(|(c, _)| c.id.clone()).collect();
        let mut by_id: HashMap<String, Chunk> = HashMap::new();
        for (chunk, _) in sparse.into_iter().chain(dense) {
            by_id.entry(chunk.id.clone()).or_insert(chunk);
        }

        let fused = fusion::fuse(&sparse_ids, &dense_ids, self.config.rrf_k);

        if self.reranker.is_available() {
            // Rerank pairs are drawn from the fused top-k only.
            let candidates: Vec<Chunk> = fused
                .iter()
                .take(self.config.top_k)
                .filter_map(|f| by_id.get(&f.chunk_id).cloned())
                .collect();
            match rerank::rerank(self.reranker.as_ref(), query, candidates, limit) {
                Ok(reranked) => {
                    return Ok(reranked
                        .into_iter()
                        .take(limit)
                        .map(|(chunk, score)| to_result(chunk, score, RetrievalMethod::Hybrid))
                        .collect());
                }
                Err(e) => {
                    self.record_degradation("reranker", &e.to_string(), "fused order");
                }
            }
        } else {
            self.record_degradation("reranker", "unavailable", "fused order");
        }

        // Tier 2: fused order, scores normalized by the best possible fused
        // score so they land in [0, 1].
        let max_score = fusion::max_fused_score(self.config.rrf_k);
        Ok(fused
            .into_iter()
            .filter_map(|FusedCandidate { chunk_id, score, .. }| {
                by_id.remove(&chunk_id).map(|chunk| {
                    to_result(chunk, (score / max_score).clamp(0.0, 1.0), RetrievalMethod::Hybrid)
                })
            })
            .take(limit)
            .collect())
    }

    /// Tier 4. Failure here is terminal.
    fn keyword_fallback(
        &self,
        tenant_id: &str,
        query: &str,
        filters: &BTreeMap<String, String>,
        limit: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        if !self.fallback.is_available() {
            return Err(SearchError::AllTiersExhausted {
                reason: "keyword fallback store unavailable".to_string(),
            });
        }
        let results = self
            .fallback
            .search(tenant_id, query, usize::MAX)
            .map_err(|e| match e {
                violation @ SearchError::TenantViolation { .. } => violation,
                other => SearchError::AllTiersExhausted {
                    reason: other.to_string(),
                },
            })?;
        Ok(label_results(
            retain_matching(results, filters),
            RetrievalMethod::Keyword,
            limit,
        ))
    }
}

fn manifest_key(tenant_id: &str, document_id: &str) -> String {
    format!("{tenant_id}\u{1}{document_id}")
}

fn matches_filters(metadata: &BTreeMap<String, String>, filters: &BTreeMap<String, String>) -> bool {
    filters
        .iter()
        .all(|(key, value)| metadata.get(key) == Some(value))
}

fn retain_matching(
    results: Vec<(Chunk, f64)>,
    filters: &BTreeMap<String, String>,
) -> Vec<(Chunk, f64)> {
    if filters.is_empty() {
        return results;
    }
    results
        .into_iter()
        .filter(|(chunk, _)| matches_filters(&chunk.metadata, filters))
        .collect()
}

fn to_result(chunk: Chunk, score: f64, method: RetrievalMethod) -> SearchResult {
    SearchResult {
        chunk_id: chunk.id,
        text: chunk.text,
        score,
        metadata: chunk.metadata,
        retrieval_method: method,
    }
}

fn label_results(
    results: Vec<(Chunk, f64)>,
    method: RetrievalMethod,
    limit: usize,
) -> Vec<SearchResult> {
    results
        .into_iter()
        .take(limit)
        .map(|(chunk, score)| to_result(chunk, score.clamp(0.0, 1.0), method))
        .collect()
}

/// Normalize raw BM25 scores by the maximum score in the set, preserving
/// order while mapping into [0, 1].
fn normalize_by_max(results: Vec<(Chunk, f64)>) -> Vec<(Chunk, f64)> {
    let max = results
        .iter()
        .map(|(_, s)| *s)
        .fold(0.0f64, f64::max);
    if max <= 0.0 {
        return results;
    }
    results
        .into_iter()
        .map(|(chunk, score)| (chunk, score / max))
        .collect()
}
