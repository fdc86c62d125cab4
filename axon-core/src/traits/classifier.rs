use async_trait::async_trait;

use crate::errors::AxonResult;
use crate::models::RoutingDecision;

/// Constrained classification collaborator.
///
/// Must return a value conforming to the `RoutingDecision` schema; the
/// router validates the confidence range and specialist id; classifier
/// output is never trusted as-is.
#[async_trait]
pub trait IIntentClassifier: Send + Sync {
    async fn classify(&self, message: &str, history: &[String]) -> AxonResult<RoutingDecision>;
}
