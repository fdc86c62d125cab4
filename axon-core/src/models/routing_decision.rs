use serde::{Deserialize, Serialize};

/// Minimum specialist capability a routed message requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkillLevel {
    L0,
    L1,
    L2,
}

impl Default for SkillLevel {
    fn default() -> Self {
        SkillLevel::L0
    }
}

/// Output of intent classification. Created once per message, consumed once,
/// not mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub intent: String,
    /// Classifier confidence in [0, 1], validated by the router.
    pub confidence: f64,
    pub specialist_id: String,
    pub requires_retrieval: bool,
    #[serde(default)]
    pub min_skill_level: SkillLevel,
}
