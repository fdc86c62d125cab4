//! The guardrail pipeline: runs the four layers in order, short-circuiting
//! on the first reject. Flags accumulate in the chain without blocking.

use std::sync::Arc;

use tracing::{debug, warn};

use axon_core::config::GuardrailConfig;
use axon_core::errors::AxonResult;
use axon_core::models::{ExecutionContext, SpecialistOutput, VerdictChain, VerdictOutcome};
use axon_core::traits::{IEmbeddingProvider, IJudge};

use crate::layers::{confidence, grounding, judge, rules};

pub struct GuardrailPipeline {
    embedder: Arc<dyn IEmbeddingProvider>,
    judge: Arc<dyn IJudge>,
    config: GuardrailConfig,
    rules: rules::CompiledRules,
}

impl GuardrailPipeline {
    /// Build the pipeline, compiling the configured domain rules. A bad rule
    /// pattern fails here rather than at verification time.
    pub fn new(
        embedder: Arc<dyn IEmbeddingProvider>,
        judge: Arc<dyn IJudge>,
        config: GuardrailConfig,
    ) -> AxonResult<Self> {
        let rules = rules::CompiledRules::new(&config.rules)?;
        Ok(Self {
            embedder,
            judge,
            config,
            rules,
        })
    }

    /// Verify a candidate response.
    ///
    /// Layer order is fixed: confidence gate, grounding check, domain rules,
    /// judge. The first reject stops evaluation; later layers never see a
    /// candidate an earlier layer has already rejected.
    pub async fn verify(
        &self,
        output: &SpecialistOutput,
        ctx: &ExecutionContext,
        retrieval_required: bool,
    ) -> AxonResult<VerdictChain> {
        let mut chain = VerdictChain::new();

        let verdict = confidence::check(output, self.config.confidence_threshold);
        let rejected = verdict.outcome == VerdictOutcome::Reject;
        chain.push(verdict);
        if rejected {
            self.log_outcome(ctx, &chain);
            return Ok(chain);
        }

        chain.push(grounding::check(
            output,
            ctx,
            self.embedder.as_ref(),
            &self.config,
            retrieval_required,
        ));

        let verdict = self.rules.evaluate(&output.answer);
        let rejected = verdict.outcome == VerdictOutcome::Reject;
        chain.push(verdict);
        if rejected {
            self.log_outcome(ctx, &chain);
            return Ok(chain);
        }

        let context: Vec<String> = ctx
            .retrieved_texts()
            .into_iter()
            .map(str::to_string)
            .collect();
        chain.push(judge::check(self.judge.as_ref(), &output.answer, &context, &self.config).await);

        self.log_outcome(ctx, &chain);
        Ok(chain)
    }

    fn log_outcome(&self, ctx: &ExecutionContext, chain: &VerdictChain) {
        match chain.overall() {
            VerdictOutcome::Reject => warn!(
                trace = %ctx.tenant.trace_id,
                layers = chain.verdicts.len(),
                reason = %chain.feedback_summary(),
                "candidate response rejected"
            ),
            _ => debug!(
                trace = %ctx.tenant.trace_id,
                flags = chain.flags().len(),
                "candidate response verified"
            ),
        }
    }
}
