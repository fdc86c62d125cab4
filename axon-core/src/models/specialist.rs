use serde::{Deserialize, Serialize};

/// Structured answer returned by a specialist executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialistOutput {
    pub answer: String,
    /// Self-reported confidence in [0, 1]. Verified by the guardrail
    /// pipeline, not trusted.
    pub confidence: f64,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

/// Per-dimension scores from the LLM-as-judge collaborator, each in [0, 1].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct JudgeScores {
    pub accuracy: f64,
    pub completeness: f64,
    pub safety: f64,
    pub consistency: f64,
}

impl JudgeScores {
    /// Iterate (dimension name, score) pairs in a fixed order.
    pub fn dimensions(&self) -> [(&'static str, f64); 4] {
        [
            ("accuracy", self.accuracy),
            ("completeness", self.completeness),
            ("safety", self.safety),
            ("consistency", self.consistency),
        ]
    }
}
