//! Pipeline-level guardrail tests with deterministic collaborators.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use axon_core::config::{DomainRule, GuardrailConfig, RuleAction, RuleKind};
use axon_core::models::{
    ExecutionContext, GuardrailLayer, JudgeScores, RetrievalMethod, SearchResult, TenantContext,
    VerdictOutcome,
};
use axon_guardrails::GuardrailPipeline;
use test_fixtures::{output, MockEmbedder, StaticJudge};

fn pipeline_with(config: GuardrailConfig, judge: StaticJudge) -> GuardrailPipeline {
    GuardrailPipeline::new(Arc::new(MockEmbedder::new()), Arc::new(judge), config).unwrap()
}

fn ctx_with_context(texts: &[&str]) -> ExecutionContext {
    let mut ctx = ExecutionContext::new(
        TenantContext::new("acme", "session-1"),
        "prompt".to_string(),
    );
    ctx.retrieved = texts
        .iter()
        .enumerate()
        .map(|(i, text)| SearchResult {
            chunk_id: format!("doc#{i}"),
            text: text.to_string(),
            score: 0.9,
            metadata: BTreeMap::new(),
            retrieval_method: RetrievalMethod::Hybrid,
        })
        .collect();
    ctx
}

#[tokio::test]
async fn well_grounded_confident_answer_passes_all_layers() {
    let pipeline = pipeline_with(GuardrailConfig::default(), StaticJudge::uniform(0.9));
    let ctx = ctx_with_context(&["Refunds are issued within thirty days of purchase."]);
    let candidate = output("Refunds are issued within thirty days of purchase.", 0.95);

    let chain = pipeline.verify(&candidate, &ctx, true).await.unwrap();
    assert_eq!(chain.overall(), VerdictOutcome::Pass);
    assert_eq!(chain.verdicts.len(), 4);
    assert!(chain.flags().is_empty());
}

#[tokio::test]
async fn low_confidence_rejects_before_any_other_layer() {
    let pipeline = pipeline_with(GuardrailConfig::default(), StaticJudge::uniform(0.9));
    let ctx = ctx_with_context(&["Some context."]);
    let candidate = output("An answer given with hesitation here.", 0.3);

    let chain = pipeline.verify(&candidate, &ctx, true).await.unwrap();
    assert_eq!(chain.overall(), VerdictOutcome::Reject);
    assert_eq!(chain.verdicts.len(), 1);
    assert_eq!(chain.verdicts[0].layer, GuardrailLayer::ConfidenceGate);
}

#[tokio::test]
async fn ungrounded_answer_is_flagged_not_rejected() {
    let pipeline = pipeline_with(GuardrailConfig::default(), StaticJudge::uniform(0.9));
    let ctx = ctx_with_context(&["Shipping takes five business days to arrive."]);
    // No lexical overlap with the context, so the bag-of-words embedder
    // scores the sentence as ungrounded.
    let candidate = output("Quantum tunneling explains our pricing model structure.", 0.95);

    let chain = pipeline.verify(&candidate, &ctx, true).await.unwrap();
    assert_eq!(chain.overall(), VerdictOutcome::Pass);
    let flags = chain.flags();
    assert_eq!(flags.len(), 1);
    assert_eq!(flags[0].layer, GuardrailLayer::GroundingCheck);
    assert!(chain.implicates_grounding());
}

#[tokio::test]
async fn reject_rule_short_circuits_the_judge() {
    let mut config = GuardrailConfig::default();
    config.rules.push(DomainRule {
        name: "no-guarantees".to_string(),
        kind: RuleKind::ForbiddenTerm {
            term: "guaranteed".to_string(),
        },
        action: RuleAction::Reject,
    });
    // A judge that would reject everything; it must never be consulted.
    let pipeline = pipeline_with(config, StaticJudge::uniform(0.0));
    let ctx = ctx_with_context(&["Returns guaranteed refund policy thirty days."]);
    let candidate = output("Your refund is guaranteed within thirty days.", 0.95);

    let chain = pipeline.verify(&candidate, &ctx, true).await.unwrap();
    assert_eq!(chain.overall(), VerdictOutcome::Reject);
    assert_eq!(chain.verdicts.len(), 3);
    assert_eq!(chain.verdicts[2].layer, GuardrailLayer::DomainValidator);
}

#[tokio::test]
async fn judge_floor_violation_rejects() {
    let pipeline = pipeline_with(
        GuardrailConfig::default(),
        StaticJudge::new(JudgeScores {
            accuracy: 0.5,
            completeness: 0.9,
            safety: 0.9,
            consistency: 0.9,
        }),
    );
    let ctx = ctx_with_context(&["Refunds are issued within thirty days of purchase."]);
    let candidate = output("Refunds are issued within thirty days of purchase.", 0.95);

    let chain = pipeline.verify(&candidate, &ctx, true).await.unwrap();
    assert_eq!(chain.overall(), VerdictOutcome::Reject);
    let last = chain.verdicts.last().unwrap();
    assert_eq!(last.layer, GuardrailLayer::Judge);
    assert!(last.reason.contains("accuracy"));
}

#[tokio::test(start_paused = true)]
async fn judge_timeout_is_a_reject_verdict() {
    let mut config = GuardrailConfig::default();
    config.judge_timeout_ms = 50;
    let pipeline = pipeline_with(
        config,
        StaticJudge::with_delay(
            JudgeScores {
                accuracy: 0.9,
                completeness: 0.9,
                safety: 0.9,
                consistency: 0.9,
            },
            Duration::from_secs(60),
        ),
    );
    let ctx = ctx_with_context(&["Refunds are issued within thirty days of purchase."]);
    let candidate = output("Refunds are issued within thirty days of purchase.", 0.95);

    let chain = pipeline.verify(&candidate, &ctx, true).await.unwrap();
    assert_eq!(chain.overall(), VerdictOutcome::Reject);
    let last = chain.verdicts.last().unwrap();
    assert_eq!(last.layer, GuardrailLayer::Judge);
    assert!(last.reason.contains("timed out"));
}

#[tokio::test]
async fn missing_context_without_sources_is_flagged() {
    let pipeline = pipeline_with(GuardrailConfig::default(), StaticJudge::uniform(0.9));
    let ctx = ExecutionContext::new(
        TenantContext::new("acme", "session-1"),
        "prompt".to_string(),
    );
    let candidate = output("A substantive claim with no backing evidence.", 0.95);

    let chain = pipeline.verify(&candidate, &ctx, true).await.unwrap();
    assert!(chain.implicates_grounding());
    assert_eq!(chain.overall(), VerdictOutcome::Pass);
}

#[tokio::test]
async fn missing_context_passes_when_retrieval_not_required() {
    let pipeline = pipeline_with(GuardrailConfig::default(), StaticJudge::uniform(0.9));
    let ctx = ExecutionContext::new(
        TenantContext::new("acme", "session-1"),
        "prompt".to_string(),
    );
    let candidate = output("Hello! How can I help you today with anything?", 0.95);

    let chain = pipeline.verify(&candidate, &ctx, false).await.unwrap();
    assert!(!chain.implicates_grounding());
    assert_eq!(chain.overall(), VerdictOutcome::Pass);
}
