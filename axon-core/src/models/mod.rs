//! Shared data model for the orchestration engine.

mod chunk;
mod degradation;
mod envelope;
mod execution_context;
mod lifecycle_state;
mod routing_decision;
mod search_result;
mod specialist;
mod tenant;
mod verdict;

pub use chunk::{Chunk, DocumentInput, IndexStats};
pub use degradation::DegradationEvent;
pub use envelope::ResponseEnvelope;
pub use execution_context::ExecutionContext;
pub use lifecycle_state::{LifecycleState, TransitionRecord};
pub use routing_decision::{RoutingDecision, SkillLevel};
pub use search_result::{RetrievalMethod, SearchResult};
pub use specialist::{JudgeScores, SpecialistOutput};
pub use tenant::TenantContext;
pub use verdict::{GuardrailLayer, GuardrailVerdict, VerdictChain, VerdictOutcome};
