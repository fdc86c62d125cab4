//! The intent router: fast-path triggers, constrained classification, and
//! the low-confidence clarification override.

use std::sync::Arc;

use tracing::{debug, info};

use axon_core::config::RoutingConfig;
use axon_core::errors::RoutingError;
use axon_core::models::{RoutingDecision, SkillLevel, TenantContext};
use axon_core::traits::IIntentClassifier;

use crate::registry::SpecialistRegistry;

pub struct IntentRouter {
    classifier: Arc<dyn IIntentClassifier>,
    config: RoutingConfig,
}

impl IntentRouter {
    pub fn new(classifier: Arc<dyn IIntentClassifier>, config: RoutingConfig) -> Self {
        Self { classifier, config }
    }

    /// Route a message to a specialist.
    ///
    /// Order of resolution:
    /// 1. Fast-path triggers (no classifier call).
    /// 2. Classifier, with its output validated: confidence must be a
    ///    finite value in [0, 1] and the specialist must be registered.
    /// 3. Low-confidence override: below the configured threshold the
    ///    decision is replaced with the clarification specialist and
    ///    retrieval is disabled.
    pub async fn route(
        &self,
        message: &str,
        tenant: &TenantContext,
        registry: &SpecialistRegistry,
        history: &[String],
    ) -> Result<RoutingDecision, RoutingError> {
        if let Some(decision) = registry.fast_path(message) {
            debug!(
                tenant = %tenant.tenant_id,
                intent = %decision.intent,
                specialist = %decision.specialist_id,
                "fast-path trigger matched"
            );
            return Ok(decision);
        }

        let decision = self
            .classifier
            .classify(message, history)
            .await
            .map_err(|e| RoutingError::ClassifierFailed {
                reason: e.to_string(),
            })?;

        if !decision.confidence.is_finite() || !(0.0..=1.0).contains(&decision.confidence) {
            return Err(RoutingError::InvalidRoutingOutput {
                reason: format!("confidence {} outside [0, 1]", decision.confidence),
            });
        }
        if !registry.contains(&decision.specialist_id) {
            return Err(RoutingError::UnknownSpecialist {
                specialist_id: decision.specialist_id,
            });
        }

        if decision.confidence < self.config.confidence_threshold {
            info!(
                tenant = %tenant.tenant_id,
                intent = %decision.intent,
                confidence = decision.confidence,
                threshold = self.config.confidence_threshold,
                "low-confidence classification, overriding to clarification"
            );
            return Ok(RoutingDecision {
                intent: decision.intent,
                confidence: decision.confidence,
                specialist_id: registry.clarification_specialist().to_string(),
                requires_retrieval: false,
                min_skill_level: SkillLevel::L0,
            });
        }

        debug!(
            tenant = %tenant.tenant_id,
            intent = %decision.intent,
            specialist = %decision.specialist_id,
            confidence = decision.confidence,
            "message routed"
        );
        Ok(decision)
    }
}
