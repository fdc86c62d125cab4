use async_trait::async_trait;

use crate::errors::AxonResult;
use crate::models::JudgeScores;

/// LLM-as-judge collaborator: a second, independent evaluation of a
/// candidate answer against its retrieved context.
#[async_trait]
pub trait IJudge: Send + Sync {
    async fn judge(&self, answer: &str, context: &[String]) -> AxonResult<JudgeScores>;
}
