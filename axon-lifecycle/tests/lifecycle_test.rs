//! Orchestrator tests: the full route → retrieve → execute → verify loop
//! with deterministic collaborators.

use std::sync::Arc;
use std::time::Duration;

use axon_core::config::{GuardrailConfig, LifecycleConfig, RetrievalConfig, RoutingConfig};
use axon_core::constants::{
    CANCELLED_ANSWER, CLARIFICATION_ANSWER, REDUCED_QUALITY_CONFIDENCE_WEIGHT,
    UNVERIFIED_FALLBACK_ANSWER,
};
use axon_core::models::{RoutingDecision, SkillLevel};
use axon_core::traits::{IEmbeddingProvider, IReranker, ISpecialistExecutor};
use axon_guardrails::GuardrailPipeline;
use axon_lifecycle::Orchestrator;
use axon_retrieval::HybridSearchEngine;
use axon_routing::{IntentRouter, SpecialistProfile, SpecialistRegistry};
use test_fixtures::{
    document, output, MockClassifier, MockEmbedder, MockReranker, ScriptedExecutor, StaticJudge,
};

struct Harness {
    engine: Arc<HybridSearchEngine>,
    executor: Arc<ScriptedExecutor>,
}

fn decision(confidence: f64) -> RoutingDecision {
    RoutingDecision {
        intent: "billing_question".to_string(),
        confidence,
        specialist_id: "billing".to_string(),
        requires_retrieval: true,
        min_skill_level: SkillLevel::L1,
    }
}

fn build(
    executor: ScriptedExecutor,
    classifier: MockClassifier,
    lifecycle: LifecycleConfig,
) -> (Orchestrator, Harness) {
    axon_core::telemetry::init_tracing("warn");
    let embedder = Arc::new(MockEmbedder::new());
    let engine = Arc::new(HybridSearchEngine::new(
        Arc::clone(&embedder) as Arc<dyn IEmbeddingProvider>,
        Arc::new(MockReranker::new()) as Arc<dyn IReranker>,
        RetrievalConfig::default(),
    ));
    engine
        .index(vec![document(
            "refunds",
            "acme",
            "Refunds are issued within thirty days of purchase to the original \
             payment method.",
        )])
        .unwrap();

    let mut registry = SpecialistRegistry::new("clarify");
    registry.register(SpecialistProfile {
        id: "billing".to_string(),
        description: "billing and refunds".to_string(),
        min_skill_level: SkillLevel::L1,
    });

    let executor = Arc::new(executor);
    let guardrails = GuardrailPipeline::new(
        Arc::clone(&embedder) as Arc<dyn IEmbeddingProvider>,
        Arc::new(StaticJudge::uniform(0.9)),
        GuardrailConfig::default(),
    )
    .unwrap();

    let orchestrator = Orchestrator::new(
        Arc::clone(&engine),
        IntentRouter::new(Arc::new(classifier), RoutingConfig::default()),
        registry,
        Arc::clone(&executor) as Arc<dyn ISpecialistExecutor>,
        guardrails,
        lifecycle,
    );
    (orchestrator, Harness { engine, executor })
}

#[tokio::test]
async fn verified_answer_is_returned_with_citations() {
    let (orchestrator, harness) = build(
        ScriptedExecutor::new(vec![output(
            "Refunds are issued within thirty days of purchase.",
            0.95,
        )]),
        MockClassifier::returning(decision(0.9)),
        LifecycleConfig::default(),
    );

    let envelope = orchestrator
        .handle_message("acme", "session-1", "what is the refund window")
        .await;
    assert!(!envelope.degraded);
    assert!(envelope.answer.contains("thirty days"));
    assert!(!envelope.sources.is_empty());
    assert!(envelope.sources.iter().all(|s| s.starts_with("refunds#")));
    assert!((envelope.confidence - 0.95).abs() < 1e-9);
    assert_eq!(harness.executor.calls(), 1);
}

#[tokio::test]
async fn rejected_answers_retry_up_to_the_bound_then_degrade() {
    // Self-reported confidence 0.5 never clears the 0.7 gate, so every
    // attempt is rejected: 1 initial + 2 retries = 3 executor calls.
    let (orchestrator, harness) = build(
        ScriptedExecutor::new(vec![output("An answer below the gate threshold.", 0.5)]),
        MockClassifier::returning(decision(0.9)),
        LifecycleConfig::default(),
    );

    let envelope = orchestrator
        .handle_message("acme", "session-1", "what is the refund window")
        .await;
    assert!(envelope.degraded);
    assert!(envelope.answer.contains(UNVERIFIED_FALLBACK_ANSWER));
    assert_eq!(envelope.confidence, 0.0);
    assert_eq!(harness.executor.calls(), 3);
}

#[tokio::test]
async fn a_retry_can_succeed_within_the_bound() {
    let (orchestrator, harness) = build(
        ScriptedExecutor::new(vec![
            output("First attempt, below the gate.", 0.5),
            output("Refunds are issued within thirty days of purchase.", 0.9),
        ]),
        MockClassifier::returning(decision(0.9)),
        LifecycleConfig::default(),
    );

    let envelope = orchestrator
        .handle_message("acme", "session-1", "what is the refund window")
        .await;
    assert!(!envelope.degraded);
    assert_eq!(harness.executor.calls(), 2);
}

#[tokio::test]
async fn routing_failure_degrades_to_clarification() {
    let (orchestrator, harness) = build(
        ScriptedExecutor::new(vec![output("never called", 0.9)]),
        MockClassifier::failing(),
        LifecycleConfig::default(),
    );

    let envelope = orchestrator
        .handle_message("acme", "session-1", "question")
        .await;
    assert!(envelope.degraded);
    assert!(envelope.answer.contains(CLARIFICATION_ANSWER));
    assert_eq!(harness.executor.calls(), 0);
}

#[tokio::test]
async fn low_routing_confidence_runs_the_clarification_specialist() {
    let (orchestrator, harness) = build(
        ScriptedExecutor::new(vec![output(
            "Could you share which order you mean exactly?",
            0.9,
        )]),
        MockClassifier::returning(decision(0.3)),
        LifecycleConfig::default(),
    );

    let envelope = orchestrator
        .handle_message("acme", "session-1", "it broke")
        .await;
    // The clarification specialist runs without retrieval, so there is
    // nothing to cite, but the response is a normal verified one.
    assert!(!envelope.degraded);
    assert!(envelope.sources.is_empty());
    assert_eq!(harness.executor.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn request_deadline_cancels_without_retrying() {
    let (orchestrator, harness) = build(
        ScriptedExecutor::with_delay(
            vec![output("much too slow", 0.9)],
            Duration::from_secs(3600),
        ),
        MockClassifier::returning(decision(0.9)),
        LifecycleConfig {
            max_retries: 2,
            // The per-call executor timeout matches the request deadline, so
            // the deadline always fires first: cancellation, not a retry.
            executor_timeout_ms: 30_000,
            request_timeout_ms: 30_000,
        },
    );

    let envelope = orchestrator
        .handle_message("acme", "session-1", "what is the refund window")
        .await;
    assert!(envelope.degraded);
    assert!(envelope.answer.contains(CANCELLED_ANSWER));
    // Cancellation preempts the retry budget: the full three-attempt
    // sequence never runs.
    assert!(harness.executor.calls() < 3);
}

#[tokio::test(start_paused = true)]
async fn executor_timeouts_count_toward_the_retry_budget() {
    let (orchestrator, harness) = build(
        ScriptedExecutor::with_delay(vec![output("slow", 0.9)], Duration::from_millis(500)),
        MockClassifier::returning(decision(0.9)),
        LifecycleConfig {
            max_retries: 2,
            executor_timeout_ms: 100,
            request_timeout_ms: 60_000,
        },
    );

    let envelope = orchestrator
        .handle_message("acme", "session-1", "what is the refund window")
        .await;
    assert!(envelope.degraded);
    assert!(envelope.answer.contains(UNVERIFIED_FALLBACK_ANSWER));
    assert_eq!(harness.executor.calls(), 3);
}

#[tokio::test]
async fn executor_failures_count_toward_the_retry_budget() {
    // An empty script makes every executor call fail, so each attempt is
    // force-rejected until the budget runs out.
    let (orchestrator, harness) = build(
        ScriptedExecutor::new(Vec::new()),
        MockClassifier::returning(decision(0.9)),
        LifecycleConfig::default(),
    );

    let envelope = orchestrator
        .handle_message("acme", "session-1", "what is the refund window")
        .await;
    assert!(envelope.degraded);
    assert!(envelope.answer.contains(UNVERIFIED_FALLBACK_ANSWER));
    assert_eq!(harness.executor.calls(), 3);
}

#[tokio::test]
async fn reduced_quality_retrieval_lowers_response_confidence() {
    let (orchestrator, harness) = build(
        ScriptedExecutor::new(vec![output(
            "Refunds are issued within thirty days of purchase.",
            1.0,
        )]),
        MockClassifier::returning(decision(0.9)),
        LifecycleConfig::default(),
    );
    harness.engine.dense_index().set_available(false);

    let envelope = orchestrator
        .handle_message("acme", "session-1", "what is the refund window")
        .await;
    assert!(!envelope.degraded);
    assert!((envelope.confidence - REDUCED_QUALITY_CONFIDENCE_WEIGHT).abs() < 1e-9);
    // Sparse results are still citable.
    assert!(!envelope.sources.is_empty());
}

#[tokio::test]
async fn keyword_fallback_results_are_not_cited() {
    let (orchestrator, harness) = build(
        ScriptedExecutor::new(vec![output(
            "Refunds are issued within thirty days of purchase.",
            1.0,
        )]),
        MockClassifier::returning(decision(0.9)),
        LifecycleConfig::default(),
    );
    harness.engine.sparse_index().set_available(false);
    harness.engine.dense_index().set_available(false);

    let envelope = orchestrator
        .handle_message("acme", "session-1", "refunds")
        .await;
    assert!(!envelope.degraded);
    assert!(envelope.sources.is_empty());
}

#[tokio::test]
async fn total_retrieval_outage_still_produces_an_answer() {
    let (orchestrator, harness) = build(
        ScriptedExecutor::new(vec![output(
            "Refunds are generally available; please check your order page.",
            0.9,
        )]),
        MockClassifier::returning(decision(0.9)),
        LifecycleConfig::default(),
    );
    harness.engine.sparse_index().set_available(false);
    harness.engine.dense_index().set_available(false);
    harness.engine.fallback_store().set_available(false);

    let envelope = orchestrator
        .handle_message("acme", "session-1", "what is the refund window")
        .await;
    // Search errored, context is empty, but the lifecycle still responds.
    assert!(!envelope.degraded);
    assert!(envelope.sources.is_empty());
    // Grounding flags the unbacked answer.
    assert!(!envelope.flags.is_empty());
}
