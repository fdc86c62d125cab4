//! The message orchestrator: route, retrieve, execute, verify, respond.
//!
//! Failure handling is total: routing failures become clarification
//! answers, retrieval failures become empty context, executor failures feed
//! the retry path, exhausted retries become the fixed fallback answer, and
//! the external deadline cancels into a degraded envelope. The caller never
//! sees an error.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use axon_core::config::LifecycleConfig;
use axon_core::errors::LifecycleError;
use axon_core::constants::{
    CANCELLED_ANSWER, CLARIFICATION_ANSWER, LOW_CONFIDENCE_DISCLAIMER,
    REDUCED_QUALITY_CONFIDENCE_WEIGHT, UNVERIFIED_FALLBACK_ANSWER,
};
use axon_core::models::{
    ExecutionContext, GuardrailLayer, GuardrailVerdict, LifecycleState, ResponseEnvelope,
    RoutingDecision, SpecialistOutput, TenantContext, VerdictChain, VerdictOutcome,
};
use axon_core::traits::ISpecialistExecutor;
use axon_guardrails::GuardrailPipeline;
use axon_retrieval::HybridSearchEngine;
use axon_routing::{IntentRouter, SpecialistRegistry};

use crate::state::Lifecycle;

pub struct Orchestrator {
    search: Arc<HybridSearchEngine>,
    router: IntentRouter,
    registry: SpecialistRegistry,
    executor: Arc<dyn ISpecialistExecutor>,
    guardrails: GuardrailPipeline,
    config: LifecycleConfig,
}

impl Orchestrator {
    pub fn new(
        search: Arc<HybridSearchEngine>,
        router: IntentRouter,
        registry: SpecialistRegistry,
        executor: Arc<dyn ISpecialistExecutor>,
        guardrails: GuardrailPipeline,
        config: LifecycleConfig,
    ) -> Self {
        Self {
            search,
            router,
            registry,
            executor,
            guardrails,
            config,
        }
    }

    /// Process one message end to end under the external request deadline.
    pub async fn handle_message(
        &self,
        tenant_id: &str,
        session_id: &str,
        message: &str,
    ) -> ResponseEnvelope {
        let tenant = TenantContext::new(tenant_id, session_id);
        let deadline = Duration::from_millis(self.config.request_timeout_ms);
        match tokio::time::timeout(deadline, self.run(&tenant, message)).await {
            Ok(envelope) => envelope,
            Err(_) => {
                warn!(
                    trace = %tenant.trace_id,
                    timeout_ms = self.config.request_timeout_ms,
                    "request deadline exceeded, cancelling lifecycle"
                );
                degraded_envelope(CANCELLED_ANSWER, &tenant, Vec::new())
            }
        }
    }

    async fn run(&self, tenant: &TenantContext, message: &str) -> ResponseEnvelope {
        let mut lifecycle = Lifecycle::new();

        let decision = match self
            .router
            .route(message, tenant, &self.registry, &[])
            .await
        {
            Ok(decision) => decision,
            Err(e) => {
                warn!(trace = %tenant.trace_id, error = %e, "routing failed, responding with clarification");
                self.advance(&mut lifecycle, LifecycleState::Routed);
                self.advance(&mut lifecycle, LifecycleState::Responded);
                return degraded_envelope(CLARIFICATION_ANSWER, tenant, Vec::new());
            }
        };
        self.advance(&mut lifecycle, LifecycleState::Routed);
        info!(
            trace = %tenant.trace_id,
            intent = %decision.intent,
            specialist = %decision.specialist_id,
            "message routed"
        );

        let mut ctx = ExecutionContext::new(tenant.clone(), String::new());
        if decision.requires_retrieval {
            self.retrieve(&mut ctx, message, None).await;
        }
        ctx.composed_prompt = compose_prompt(message, &ctx, None);

        loop {
            let candidate = self.execute(&decision, &ctx).await;
            self.advance(&mut lifecycle, LifecycleState::Executed);

            let chain = match &candidate {
                Ok(output) => match self
                    .guardrails
                    .verify(output, &ctx, decision.requires_retrieval)
                    .await
                {
                    Ok(chain) => chain,
                    Err(e) => forced_reject(format!("verification unavailable: {e}")),
                },
                Err(e) => forced_reject(e.to_string()),
            };
            self.advance(&mut lifecycle, LifecycleState::Verified);

            if chain.overall() == VerdictOutcome::Pass {
                if let Ok(output) = candidate {
                    self.advance(&mut lifecycle, LifecycleState::Responded);
                    return accepted_envelope(output, &chain, &ctx);
                }
            }

            if ctx.retry_count >= self.config.max_retries {
                let exhausted = LifecycleError::MaxRetriesExceeded {
                    retries: ctx.retry_count,
                };
                warn!(
                    trace = %tenant.trace_id,
                    error = %exhausted,
                    "verification retries exhausted, responding with fallback"
                );
                self.advance(&mut lifecycle, LifecycleState::Responded);
                return degraded_envelope(UNVERIFIED_FALLBACK_ANSWER, tenant, Vec::new());
            }

            ctx.record_retry();
            debug!(
                trace = %tenant.trace_id,
                retry = ctx.retry_count,
                feedback = %chain.feedback_summary(),
                "retrying after rejection"
            );
            // A grounding-implicated rejection widens the retrieval pool;
            // other rejections reuse the existing context.
            if chain.implicates_grounding() && decision.requires_retrieval {
                let widened = self.search.config().top_k * 2;
                self.retrieve(&mut ctx, message, Some(widened)).await;
            }
            let feedback = chain.feedback_summary();
            ctx.composed_prompt = compose_prompt(message, &ctx, Some(&feedback));
        }
    }

    /// Tenant-scoped retrieval; any search failure degrades to empty context.
    async fn retrieve(&self, ctx: &mut ExecutionContext, message: &str, limit: Option<usize>) {
        let filters = BTreeMap::new();
        let result = match limit {
            Some(limit) => {
                self.search
                    .search_with_limit(&ctx.tenant.tenant_id, message, &filters, limit)
                    .await
            }
            None => {
                self.search
                    .search(&ctx.tenant.tenant_id, message, &filters)
                    .await
            }
        };
        match result {
            Ok(results) => {
                debug!(
                    trace = %ctx.tenant.trace_id,
                    results = results.len(),
                    "retrieval completed"
                );
                ctx.retrieved = results;
            }
            Err(e) => {
                warn!(
                    trace = %ctx.tenant.trace_id,
                    error = %e,
                    "retrieval failed, proceeding with empty context"
                );
                ctx.retrieved = Vec::new();
            }
        }
    }

    /// One bounded executor call. Timeout and failure both yield a typed
    /// error that feeds the forced-reject retry path.
    async fn execute(
        &self,
        decision: &RoutingDecision,
        ctx: &ExecutionContext,
    ) -> Result<SpecialistOutput, LifecycleError> {
        let timeout = Duration::from_millis(self.config.executor_timeout_ms);
        match tokio::time::timeout(
            timeout,
            self.executor
                .execute(&decision.specialist_id, &ctx.composed_prompt, ctx),
        )
        .await
        {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => {
                warn!(trace = %ctx.tenant.trace_id, error = %e, "specialist execution failed");
                Err(LifecycleError::ExecutorFailure {
                    reason: e.to_string(),
                })
            }
            Err(_) => {
                warn!(
                    trace = %ctx.tenant.trace_id,
                    timeout_ms = self.config.executor_timeout_ms,
                    "specialist execution timed out"
                );
                Err(LifecycleError::ExecutorTimeout {
                    timeout_ms: self.config.executor_timeout_ms,
                })
            }
        }
    }

    /// Internal transitions follow the state machine by construction; a
    /// violation here is a bug, logged rather than surfaced.
    fn advance(&self, lifecycle: &mut Lifecycle, to: LifecycleState) {
        if let Err(e) = lifecycle.transition(to) {
            error!(error = %e, "lifecycle transition rejected");
        }
    }
}

/// Prompt assembly: message, then retrieved context in rank order, then
/// session memory, then retry feedback when present.
fn compose_prompt(message: &str, ctx: &ExecutionContext, feedback: Option<&str>) -> String {
    let mut prompt = String::new();
    prompt.push_str("User message:\n");
    prompt.push_str(message);
    if !ctx.retrieved.is_empty() {
        prompt.push_str("\n\nRetrieved context:\n");
        for (i, text) in ctx.retrieved_texts().iter().enumerate() {
            prompt.push_str(&format!("[{}] {text}\n", i + 1));
        }
    }
    if !ctx.memory_snapshot.is_empty() {
        prompt.push_str("\nSession memory:\n");
        for entry in &ctx.memory_snapshot {
            prompt.push_str(entry);
            prompt.push('\n');
        }
    }
    if let Some(feedback) = feedback {
        prompt.push_str("\nYour previous answer was rejected: ");
        prompt.push_str(feedback);
        prompt.push_str("\nAddress these issues in your next answer.");
    }
    prompt
}

fn forced_reject(reason: String) -> VerdictChain {
    let mut chain = VerdictChain::new();
    chain.push(GuardrailVerdict::reject(
        GuardrailLayer::ConfidenceGate,
        reason,
    ));
    chain
}

fn accepted_envelope(
    output: SpecialistOutput,
    chain: &VerdictChain,
    ctx: &ExecutionContext,
) -> ResponseEnvelope {
    let confidence = if ctx.has_reduced_quality_context() {
        output.confidence * REDUCED_QUALITY_CONFIDENCE_WEIGHT
    } else {
        output.confidence
    };
    let sources: Vec<String> = ctx
        .retrieved
        .iter()
        .filter(|r| r.retrieval_method.citable())
        .map(|r| r.chunk_id.clone())
        .collect();
    ResponseEnvelope {
        answer: output.answer,
        confidence,
        sources,
        trace_id: ctx.tenant.trace_id.clone(),
        degraded: false,
        flags: chain.flags().into_iter().cloned().collect(),
    }
}

fn degraded_envelope(
    answer: &str,
    tenant: &TenantContext,
    flags: Vec<GuardrailVerdict>,
) -> ResponseEnvelope {
    ResponseEnvelope {
        answer: format!("{answer}\n\n{LOW_CONFIDENCE_DISCLAIMER}"),
        confidence: 0.0,
        sources: Vec::new(),
        trace_id: tenant.trace_id.clone(),
        degraded: true,
        flags,
    }
}
