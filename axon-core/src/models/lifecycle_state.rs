use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle states for one message.
///
/// `Created → Routed → Executed → Verified → Responded`, with a retry edge
/// `Verified → Executed` (bounded by `max_retries`) and a fallback edge
/// `Verified → Responded` when retries are exhausted. Routing failure takes
/// `Routed → Responded` directly with a degraded clarification answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    Created,
    Routed,
    Executed,
    Verified,
    Responded,
}

impl LifecycleState {
    /// Allowed successor states.
    pub fn successors(self) -> &'static [LifecycleState] {
        match self {
            LifecycleState::Created => &[LifecycleState::Routed],
            // Routed → Responded covers the routing-failure fallback.
            LifecycleState::Routed => &[LifecycleState::Executed, LifecycleState::Responded],
            LifecycleState::Executed => &[LifecycleState::Verified],
            // Verified → Executed is the bounded retry edge.
            LifecycleState::Verified => &[LifecycleState::Executed, LifecycleState::Responded],
            LifecycleState::Responded => &[],
        }
    }

    pub fn can_transition(self, to: LifecycleState) -> bool {
        self.successors().contains(&to)
    }

    pub fn is_terminal(self) -> bool {
        self.successors().is_empty()
    }
}

/// Record of a single state transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from: LifecycleState,
    pub to: LifecycleState,
    pub at: DateTime<Utc>,
}
