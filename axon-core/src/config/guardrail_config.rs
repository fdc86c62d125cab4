use serde::{Deserialize, Serialize};

use super::check_unit_range;
use crate::errors::ConfigError;

/// What a matching domain rule does to the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Flag,
    Reject,
}

/// Deterministic rule predicate for the domain validator layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleKind {
    /// Regex match against the candidate answer.
    Pattern { pattern: String },
    /// Case-insensitive forbidden substring.
    ForbiddenTerm { term: String },
    /// Structured predicate: answer length cap.
    MaxAnswerChars { limit: usize },
}

/// One configured domain rule, evaluated in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainRule {
    pub name: String,
    #[serde(flatten)]
    pub kind: RuleKind,
    pub action: RuleAction,
}

/// Guardrail pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardrailConfig {
    /// Per-vertical confidence gate threshold.
    pub confidence_threshold: f64,
    /// Minimum fraction of factual sentences that must be grounded in the
    /// retrieved context; below this the grounding layer flags (not rejects).
    pub min_grounded_ratio: f64,
    /// Cosine similarity above which a sentence counts as grounded.
    pub grounding_similarity_threshold: f64,
    /// Judge dimension floors; any dimension below its floor rejects.
    pub judge_accuracy_floor: f64,
    pub judge_completeness_floor: f64,
    pub judge_safety_floor: f64,
    pub judge_consistency_floor: f64,
    pub judge_timeout_ms: u64,
    /// Ordered domain rule set for the validator layer.
    pub rules: Vec<DomainRule>,
}

impl Default for GuardrailConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.7,
            min_grounded_ratio: 0.8,
            grounding_similarity_threshold: 0.5,
            judge_accuracy_floor: 0.6,
            judge_completeness_floor: 0.6,
            judge_safety_floor: 0.6,
            judge_consistency_floor: 0.6,
            judge_timeout_ms: 5_000,
            rules: Vec::new(),
        }
    }
}

impl GuardrailConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit_range("guardrails.confidence_threshold", self.confidence_threshold)?;
        check_unit_range("guardrails.min_grounded_ratio", self.min_grounded_ratio)?;
        check_unit_range(
            "guardrails.grounding_similarity_threshold",
            self.grounding_similarity_threshold,
        )?;
        check_unit_range("guardrails.judge_accuracy_floor", self.judge_accuracy_floor)?;
        check_unit_range(
            "guardrails.judge_completeness_floor",
            self.judge_completeness_floor,
        )?;
        check_unit_range("guardrails.judge_safety_floor", self.judge_safety_floor)?;
        check_unit_range(
            "guardrails.judge_consistency_floor",
            self.judge_consistency_floor,
        )?;
        if self.judge_timeout_ms == 0 {
            return Err(ConfigError::OutOfRange {
                field: "guardrails.judge_timeout_ms".to_string(),
                value: 0.0,
                constraint: "must be positive".to_string(),
            });
        }
        for rule in &self.rules {
            if rule.name.is_empty() {
                return Err(ConfigError::Contradiction {
                    reason: "guardrails.rules entries must be named".to_string(),
                });
            }
        }
        Ok(())
    }
}
