use async_trait::async_trait;

use crate::errors::AxonResult;
use crate::models::{ExecutionContext, SpecialistOutput};

/// Specialist executor collaborator: the actual response generator.
///
/// Invoked as an opaque async call; the lifecycle enforces the bounded
/// timeout and treats timeout as a reject-equivalent outcome feeding the
/// retry path.
#[async_trait]
pub trait ISpecialistExecutor: Send + Sync {
    async fn execute(
        &self,
        specialist_id: &str,
        prompt: &str,
        ctx: &ExecutionContext,
    ) -> AxonResult<SpecialistOutput>;
}
