//! Layer 3: domain validator. Deterministic, cheap, and evaluated in the
//! configured order; the only layer with no model in the loop.

use regex::Regex;

use axon_core::config::{DomainRule, RuleAction, RuleKind};
use axon_core::errors::GuardrailError;
use axon_core::models::{GuardrailLayer, GuardrailVerdict};

#[derive(Debug)]
enum CompiledKind {
    Pattern(Regex),
    ForbiddenTerm(String),
    MaxAnswerChars(usize),
}

#[derive(Debug)]
struct CompiledRule {
    name: String,
    kind: CompiledKind,
    action: RuleAction,
}

impl CompiledRule {
    fn matches(&self, answer: &str) -> bool {
        match &self.kind {
            CompiledKind::Pattern(pattern) => pattern.is_match(answer),
            CompiledKind::ForbiddenTerm(term) => answer.to_lowercase().contains(term),
            CompiledKind::MaxAnswerChars(limit) => answer.chars().count() > *limit,
        }
    }
}

/// Rule set compiled once at pipeline construction, so bad patterns fail
/// fast instead of at verification time.
#[derive(Debug)]
pub struct CompiledRules {
    rules: Vec<CompiledRule>,
}

impl CompiledRules {
    pub fn new(rules: &[DomainRule]) -> Result<Self, GuardrailError> {
        let mut compiled = Vec::with_capacity(rules.len());
        for rule in rules {
            let kind = match &rule.kind {
                RuleKind::Pattern { pattern } => CompiledKind::Pattern(
                    Regex::new(pattern).map_err(|e| GuardrailError::InvalidRule {
                        rule: rule.name.clone(),
                        reason: e.to_string(),
                    })?,
                ),
                RuleKind::ForbiddenTerm { term } => {
                    CompiledKind::ForbiddenTerm(term.to_lowercase())
                }
                RuleKind::MaxAnswerChars { limit } => CompiledKind::MaxAnswerChars(*limit),
            };
            compiled.push(CompiledRule {
                name: rule.name.clone(),
                kind,
                action: rule.action,
            });
        }
        Ok(Self { rules: compiled })
    }

    /// Evaluate every rule against the candidate answer. A matching
    /// reject-action rule rejects; matching flag-action rules flag; no
    /// matches pass.
    pub fn evaluate(&self, answer: &str) -> GuardrailVerdict {
        let mut flagged: Vec<&str> = Vec::new();
        for rule in &self.rules {
            if !rule.matches(answer) {
                continue;
            }
            match rule.action {
                RuleAction::Reject => {
                    return GuardrailVerdict::reject(
                        GuardrailLayer::DomainValidator,
                        format!("rule '{}' matched", rule.name),
                    );
                }
                RuleAction::Flag => flagged.push(&rule.name),
            }
        }
        if flagged.is_empty() {
            GuardrailVerdict::pass(GuardrailLayer::DomainValidator, "no rules matched")
        } else {
            GuardrailVerdict::flag(
                GuardrailLayer::DomainValidator,
                format!("rules matched: {}", flagged.join(", ")),
            )
        }
    }
}
