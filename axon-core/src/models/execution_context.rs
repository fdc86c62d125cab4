use serde::{Deserialize, Serialize};

use super::search_result::SearchResult;
use super::tenant::TenantContext;

/// Per-message execution state, owned exclusively by the orchestrator for
/// the duration of one message.
///
/// `retry_count` is the sole mutable field; it is monotonically
/// non-decreasing and bounded by the configured maximum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionContext {
    pub tenant: TenantContext,
    pub composed_prompt: String,
    pub retrieved: Vec<SearchResult>,
    /// Opaque session memory carried into the specialist prompt.
    #[serde(default)]
    pub memory_snapshot: Vec<String>,
    pub retry_count: u32,
}

impl ExecutionContext {
    pub fn new(tenant: TenantContext, composed_prompt: String) -> Self {
        Self {
            tenant,
            composed_prompt,
            retrieved: Vec::new(),
            memory_snapshot: Vec::new(),
            retry_count: 0,
        }
    }

    /// Record one guardrail rejection. Increment only, never reset.
    pub fn record_retry(&mut self) {
        self.retry_count += 1;
    }

    /// Concatenated retrieved texts, in rank order, for prompt composition
    /// and grounding checks.
    pub fn retrieved_texts(&self) -> Vec<&str> {
        self.retrieved.iter().map(|r| r.text.as_str()).collect()
    }

    /// Whether any retrieved result came from a reduced-quality tier.
    pub fn has_reduced_quality_context(&self) -> bool {
        self.retrieved
            .iter()
            .any(|r| !r.retrieval_method.full_quality())
    }
}
