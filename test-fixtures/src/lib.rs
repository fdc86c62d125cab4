//! Deterministic mock collaborators for integration tests.
//!
//! Every mock here is fully deterministic so tests that assert on ranking,
//! retries, and verdicts are reproducible without any model access.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use axon_core::errors::{AxonError, AxonResult};
use axon_core::models::{
    DocumentInput, ExecutionContext, JudgeScores, RoutingDecision, SpecialistOutput,
};
use axon_core::traits::{
    IEmbeddingProvider, IIntentClassifier, IJudge, IReranker, ISpecialistExecutor,
};

/// Deterministic bag-of-words embedder: each token increments a hashed slot
/// of a fixed-width vector. Similar texts share slots, so cosine similarity
/// behaves sensibly for ranking assertions.
pub struct MockEmbedder {
    dimensions: usize,
    available: AtomicBool,
    fail: AtomicBool,
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self {
            dimensions: 64,
            available: AtomicBool::new(true),
            fail: AtomicBool::new(false),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Relaxed);
    }

    /// Make `embed` return an error without reporting unavailability.
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::Relaxed);
    }
}

impl IEmbeddingProvider for MockEmbedder {
    fn embed(&self, text: &str) -> AxonResult<Vec<f32>> {
        if self.fail.load(Ordering::Relaxed) {
            return Err(AxonError::Internal("embedder offline".to_string()));
        }
        let mut vector = vec![0.0f32; self.dimensions];
        for token in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let mut hash: u64 = 1469598103934665603;
            for byte in token.as_bytes() {
                hash ^= u64::from(*byte);
                hash = hash.wrapping_mul(1099511628211);
            }
            vector[(hash % self.dimensions as u64) as usize] += 1.0;
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "mock-embedder"
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }
}

/// Reranker scoring by query-term overlap, with an availability toggle for
/// degradation-ladder tests.
pub struct MockReranker {
    available: AtomicBool,
}

impl Default for MockReranker {
    fn default() -> Self {
        Self::new()
    }
}

impl MockReranker {
    pub fn new() -> Self {
        Self {
            available: AtomicBool::new(true),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Relaxed);
    }
}

impl IReranker for MockReranker {
    fn score(&self, query: &str, candidate: &str) -> AxonResult<f64> {
        let query_terms: Vec<String> = query
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if query_terms.is_empty() {
            return Ok(0.0);
        }
        let candidate = candidate.to_lowercase();
        let matched = query_terms.iter().filter(|t| candidate.contains(*t)).count();
        Ok(matched as f64 / query_terms.len() as f64)
    }

    fn name(&self) -> &str {
        "mock-reranker"
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }
}

/// Classifier returning a pre-programmed decision (or error).
pub struct MockClassifier {
    decision: Mutex<Option<RoutingDecision>>,
    calls: AtomicUsize,
}

impl MockClassifier {
    pub fn returning(decision: RoutingDecision) -> Self {
        Self {
            decision: Mutex::new(Some(decision)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            decision: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl IIntentClassifier for MockClassifier {
    async fn classify(&self, _message: &str, _history: &[String]) -> AxonResult<RoutingDecision> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        match self.decision.lock().ok().and_then(|d| d.clone()) {
            Some(decision) => Ok(decision),
            None => Err(AxonError::Internal("classifier offline".to_string())),
        }
    }
}

/// Executor that pops scripted outputs in order. When the script is down to
/// its last output it repeats it; an empty script errors. An optional delay
/// simulates a slow specialist for timeout tests.
pub struct ScriptedExecutor {
    outputs: Mutex<Vec<SpecialistOutput>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl ScriptedExecutor {
    pub fn new(outputs: Vec<SpecialistOutput>) -> Self {
        Self {
            outputs: Mutex::new(outputs),
            calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    pub fn with_delay(outputs: Vec<SpecialistOutput>, delay: Duration) -> Self {
        Self {
            outputs: Mutex::new(outputs),
            calls: AtomicUsize::new(0),
            delay: Some(delay),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ISpecialistExecutor for ScriptedExecutor {
    async fn execute(
        &self,
        _specialist_id: &str,
        _prompt: &str,
        _ctx: &ExecutionContext,
    ) -> AxonResult<SpecialistOutput> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let mut outputs = self
            .outputs
            .lock()
            .map_err(|_| AxonError::Internal("executor script poisoned".to_string()))?;
        if outputs.is_empty() {
            return Err(AxonError::Internal("executor script empty".to_string()));
        }
        if outputs.len() == 1 {
            Ok(outputs[0].clone())
        } else {
            Ok(outputs.remove(0))
        }
    }
}

/// Judge returning the same scores every time.
pub struct StaticJudge {
    scores: JudgeScores,
    delay: Option<Duration>,
}

impl StaticJudge {
    pub fn new(scores: JudgeScores) -> Self {
        Self {
            scores,
            delay: None,
        }
    }

    /// All dimensions at the given score.
    pub fn uniform(score: f64) -> Self {
        Self::new(JudgeScores {
            accuracy: score,
            completeness: score,
            safety: score,
            consistency: score,
        })
    }

    pub fn with_delay(scores: JudgeScores, delay: Duration) -> Self {
        Self {
            scores,
            delay: Some(delay),
        }
    }
}

#[async_trait]
impl IJudge for StaticJudge {
    async fn judge(&self, _answer: &str, _context: &[String]) -> AxonResult<JudgeScores> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.scores)
    }
}

/// Specialist output with sensible defaults for tests.
pub fn output(answer: &str, confidence: f64) -> SpecialistOutput {
    SpecialistOutput {
        answer: answer.to_string(),
        confidence,
        sources: Vec::new(),
        reasoning: None,
    }
}

/// Document with empty metadata.
pub fn document(id: &str, tenant_id: &str, text: &str) -> DocumentInput {
    DocumentInput {
        id: id.to_string(),
        tenant_id: tenant_id.to_string(),
        text: text.to_string(),
        metadata: BTreeMap::new(),
    }
}

/// Document carrying metadata key/value pairs.
pub fn document_with_metadata(
    id: &str,
    tenant_id: &str,
    text: &str,
    metadata: &[(&str, &str)],
) -> DocumentInput {
    DocumentInput {
        id: id.to_string(),
        tenant_id: tenant_id.to_string(),
        text: text.to_string(),
        metadata: metadata
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}
