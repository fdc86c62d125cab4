use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The four ordered guardrail layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardrailLayer {
    ConfidenceGate,
    GroundingCheck,
    DomainValidator,
    Judge,
}

/// Outcome of one guardrail layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictOutcome {
    Pass,
    /// Recorded as advisory metadata; does not block delivery.
    Flag,
    /// Short-circuits the pipeline and triggers the retry path.
    Reject,
}

/// One layer's verdict over a candidate response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardrailVerdict {
    pub layer: GuardrailLayer,
    pub outcome: VerdictOutcome,
    pub reason: String,
    #[serde(default)]
    pub scores: BTreeMap<String, f64>,
}

impl GuardrailVerdict {
    pub fn pass(layer: GuardrailLayer, reason: impl Into<String>) -> Self {
        Self {
            layer,
            outcome: VerdictOutcome::Pass,
            reason: reason.into(),
            scores: BTreeMap::new(),
        }
    }

    pub fn flag(layer: GuardrailLayer, reason: impl Into<String>) -> Self {
        Self {
            layer,
            outcome: VerdictOutcome::Flag,
            reason: reason.into(),
            scores: BTreeMap::new(),
        }
    }

    pub fn reject(layer: GuardrailLayer, reason: impl Into<String>) -> Self {
        Self {
            layer,
            outcome: VerdictOutcome::Reject,
            reason: reason.into(),
            scores: BTreeMap::new(),
        }
    }

    pub fn with_score(mut self, name: impl Into<String>, value: f64) -> Self {
        self.scores.insert(name.into(), value);
        self
    }
}

/// Ordered sequence of verdicts for one verification attempt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerdictChain {
    pub verdicts: Vec<GuardrailVerdict>,
}

impl VerdictChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, verdict: GuardrailVerdict) {
        self.verdicts.push(verdict);
    }

    /// Aggregate outcome: reject if any layer rejects, otherwise pass.
    /// Flags never block delivery.
    pub fn overall(&self) -> VerdictOutcome {
        if self
            .verdicts
            .iter()
            .any(|v| v.outcome == VerdictOutcome::Reject)
        {
            VerdictOutcome::Reject
        } else {
            VerdictOutcome::Pass
        }
    }

    /// Advisory flags raised during the attempt.
    pub fn flags(&self) -> Vec<&GuardrailVerdict> {
        self.verdicts
            .iter()
            .filter(|v| v.outcome == VerdictOutcome::Flag)
            .collect()
    }

    /// Whether any non-pass verdict came from the grounding layer. A retry
    /// re-runs retrieval (with an expanded candidate pool) only in this case.
    pub fn implicates_grounding(&self) -> bool {
        self.verdicts.iter().any(|v| {
            v.layer == GuardrailLayer::GroundingCheck && v.outcome != VerdictOutcome::Pass
        })
    }

    /// Human-readable summary of failures, fed back to the specialist on
    /// retry.
    pub fn feedback_summary(&self) -> String {
        let failures: Vec<String> = self
            .verdicts
            .iter()
            .filter(|v| v.outcome != VerdictOutcome::Pass)
            .map(|v| format!("{:?}: {}", v.layer, v.reason))
            .collect();
        if failures.is_empty() {
            "no issues".to_string()
        } else {
            failures.join("; ")
        }
    }
}
