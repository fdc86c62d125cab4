use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Which retrieval tier produced a result.
///
/// `Hybrid` is tier 1/2 (fused sparse + dense), `Dense` and `Sparse` are the
/// single-method degradations, and `Keyword` is the tier-4 emergency
/// substring match. Callers must treat `Sparse` and `Keyword` as
/// reduced-quality signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalMethod {
    Hybrid,
    Dense,
    Sparse,
    Keyword,
}

impl RetrievalMethod {
    /// Whether results from this method may be cited in the response
    /// envelope. Tier-4 keyword matches are excluded; citing them would
    /// imply semantic grounding that did not occur.
    pub fn citable(self) -> bool {
        !matches!(self, RetrievalMethod::Keyword)
    }

    /// Whether this method carries full retrieval quality. Tier-3/4 results
    /// get a lower confidence weighting downstream.
    pub fn full_quality(self) -> bool {
        matches!(self, RetrievalMethod::Hybrid | RetrievalMethod::Dense)
    }
}

/// A single retrieval hit. Produced fresh per query; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk_id: String,
    pub text: String,
    /// Normalized relevance score in [0, 1].
    pub score: f64,
    pub metadata: BTreeMap<String, String>,
    pub retrieval_method: RetrievalMethod,
}
