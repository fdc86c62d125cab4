//! Specialist registry and the keyword fast-path triggers.

use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use axon_core::errors::RoutingError;
use axon_core::models::{RoutingDecision, SkillLevel};

/// Confidence assigned to an exact keyword trigger match.
const KEYWORD_TRIGGER_CONFIDENCE: f64 = 0.9;
/// Confidence assigned to a regex trigger match.
const PATTERN_TRIGGER_CONFIDENCE: f64 = 0.85;

/// A registered specialist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialistProfile {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub min_skill_level: SkillLevel,
}

struct KeywordTrigger {
    keyword: String,
    intent: String,
    specialist_id: String,
    requires_retrieval: bool,
}

struct PatternTrigger {
    pattern: Regex,
    intent: String,
    specialist_id: String,
    requires_retrieval: bool,
}

/// Per-request routing surface: the set of specialists a message may be
/// dispatched to, plus fast-path triggers that bypass the classifier.
///
/// The clarification specialist is always registered, so the low-confidence
/// override can never produce an unroutable decision.
pub struct SpecialistRegistry {
    specialists: HashMap<String, SpecialistProfile>,
    keyword_triggers: Vec<KeywordTrigger>,
    pattern_triggers: Vec<PatternTrigger>,
    clarification_specialist: String,
}

impl SpecialistRegistry {
    pub fn new(clarification_specialist: impl Into<String>) -> Self {
        let clarification_specialist = clarification_specialist.into();
        let mut specialists = HashMap::new();
        specialists.insert(
            clarification_specialist.clone(),
            SpecialistProfile {
                id: clarification_specialist.clone(),
                description: "asks the user to restate an ambiguous request".to_string(),
                min_skill_level: SkillLevel::L0,
            },
        );
        Self {
            specialists,
            keyword_triggers: Vec::new(),
            pattern_triggers: Vec::new(),
            clarification_specialist,
        }
    }

    pub fn register(&mut self, profile: SpecialistProfile) {
        self.specialists.insert(profile.id.clone(), profile);
    }

    pub fn contains(&self, specialist_id: &str) -> bool {
        self.specialists.contains_key(specialist_id)
    }

    pub fn get(&self, specialist_id: &str) -> Option<&SpecialistProfile> {
        self.specialists.get(specialist_id)
    }

    pub fn clarification_specialist(&self) -> &str {
        &self.clarification_specialist
    }

    /// Register an exact-keyword trigger. The target specialist must already
    /// be registered.
    pub fn register_keyword_trigger(
        &mut self,
        keyword: &str,
        intent: &str,
        specialist_id: &str,
        requires_retrieval: bool,
    ) -> Result<(), RoutingError> {
        if !self.contains(specialist_id) {
            return Err(RoutingError::UnknownSpecialist {
                specialist_id: specialist_id.to_string(),
            });
        }
        self.keyword_triggers.push(KeywordTrigger {
            keyword: keyword.to_lowercase(),
            intent: intent.to_string(),
            specialist_id: specialist_id.to_string(),
            requires_retrieval,
        });
        Ok(())
    }

    /// Register a regex trigger. The pattern is matched case-insensitively
    /// against the raw message.
    pub fn register_pattern_trigger(
        &mut self,
        pattern: &str,
        intent: &str,
        specialist_id: &str,
        requires_retrieval: bool,
    ) -> Result<(), RoutingError> {
        if !self.contains(specialist_id) {
            return Err(RoutingError::UnknownSpecialist {
                specialist_id: specialist_id.to_string(),
            });
        }
        let pattern = Regex::new(&format!("(?i){pattern}")).map_err(|e| {
            RoutingError::InvalidRoutingOutput {
                reason: format!("invalid trigger pattern: {e}"),
            }
        })?;
        self.pattern_triggers.push(PatternTrigger {
            pattern,
            intent: intent.to_string(),
            specialist_id: specialist_id.to_string(),
            requires_retrieval,
        });
        Ok(())
    }

    /// Check the fast-path triggers in registration order: keywords first,
    /// then patterns. Returns a ready decision on the first match.
    pub(crate) fn fast_path(&self, message: &str) -> Option<RoutingDecision> {
        let lowered = message.to_lowercase();
        for trigger in &self.keyword_triggers {
            if lowered.contains(&trigger.keyword) {
                return Some(RoutingDecision {
                    intent: trigger.intent.clone(),
                    confidence: KEYWORD_TRIGGER_CONFIDENCE,
                    specialist_id: trigger.specialist_id.clone(),
                    requires_retrieval: trigger.requires_retrieval,
                    min_skill_level: self
                        .get(&trigger.specialist_id)
                        .map(|p| p.min_skill_level)
                        .unwrap_or_default(),
                });
            }
        }
        for trigger in &self.pattern_triggers {
            if trigger.pattern.is_match(message) {
                return Some(RoutingDecision {
                    intent: trigger.intent.clone(),
                    confidence: PATTERN_TRIGGER_CONFIDENCE,
                    specialist_id: trigger.specialist_id.clone(),
                    requires_retrieval: trigger.requires_retrieval,
                    min_skill_level: self
                        .get(&trigger.specialist_id)
                        .map(|p| p.min_skill_level)
                        .unwrap_or_default(),
                });
            }
        }
        None
    }
}
