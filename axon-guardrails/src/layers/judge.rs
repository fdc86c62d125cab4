//! Layer 4: LLM-as-judge. An independent model scores the answer on four
//! dimensions; any dimension under its configured floor rejects. The judge
//! call is fail-closed: a timeout or error also rejects.

use std::time::Duration;

use axon_core::config::GuardrailConfig;
use axon_core::errors::GuardrailError;
use axon_core::models::{GuardrailLayer, GuardrailVerdict, JudgeScores};
use axon_core::traits::IJudge;

pub async fn check(
    judge: &dyn IJudge,
    answer: &str,
    context: &[String],
    config: &GuardrailConfig,
) -> GuardrailVerdict {
    match score(judge, answer, context, config.judge_timeout_ms).await {
        Ok(scores) => apply_floors(scores, config),
        Err(e) => GuardrailVerdict::reject(GuardrailLayer::Judge, e.to_string()),
    }
}

async fn score(
    judge: &dyn IJudge,
    answer: &str,
    context: &[String],
    timeout_ms: u64,
) -> Result<JudgeScores, GuardrailError> {
    let timeout = Duration::from_millis(timeout_ms);
    match tokio::time::timeout(timeout, judge.judge(answer, context)).await {
        Ok(Ok(scores)) => Ok(scores),
        Ok(Err(e)) => Err(GuardrailError::JudgeFailed {
            reason: e.to_string(),
        }),
        Err(_) => Err(GuardrailError::JudgeTimeout { timeout_ms }),
    }
}

fn apply_floors(scores: JudgeScores, config: &GuardrailConfig) -> GuardrailVerdict {
    let floors = [
        ("accuracy", scores.accuracy, config.judge_accuracy_floor),
        (
            "completeness",
            scores.completeness,
            config.judge_completeness_floor,
        ),
        ("safety", scores.safety, config.judge_safety_floor),
        (
            "consistency",
            scores.consistency,
            config.judge_consistency_floor,
        ),
    ];

    let mut verdict = None;
    for (dimension, value, floor) in floors {
        if value < floor {
            verdict = Some(GuardrailVerdict::reject(
                GuardrailLayer::Judge,
                format!("{dimension} {value:.2} below floor {floor:.2}"),
            ));
            break;
        }
    }
    let mut verdict = verdict
        .unwrap_or_else(|| GuardrailVerdict::pass(GuardrailLayer::Judge, "all dimensions above floors"));
    for (dimension, value) in scores.dimensions() {
        verdict = verdict.with_score(dimension, value);
    }
    verdict
}

#[cfg(test)]
mod tests {
    use super::*;
    use axon_core::models::VerdictOutcome;

    #[test]
    fn floor_violation_names_the_dimension() {
        let config = GuardrailConfig::default();
        let verdict = apply_floors(
            JudgeScores {
                accuracy: 0.9,
                completeness: 0.4,
                safety: 0.9,
                consistency: 0.9,
            },
            &config,
        );
        assert_eq!(verdict.outcome, VerdictOutcome::Reject);
        assert!(verdict.reason.contains("completeness"));
        assert_eq!(verdict.scores.len(), 4);
    }

    #[test]
    fn all_dimensions_above_floors_pass() {
        let config = GuardrailConfig::default();
        let verdict = apply_floors(
            JudgeScores {
                accuracy: 0.8,
                completeness: 0.8,
                safety: 0.8,
                consistency: 0.8,
            },
            &config,
        );
        assert_eq!(verdict.outcome, VerdictOutcome::Pass);
    }
}
