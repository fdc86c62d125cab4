//! Lifecycle state tracking with a recorded transition history.

use chrono::Utc;

use axon_core::errors::LifecycleError;
use axon_core::models::{LifecycleState, TransitionRecord};

/// State machine instance for one message. Transitions are validated against
/// the static successor table; every accepted transition is recorded.
#[derive(Debug)]
pub struct Lifecycle {
    state: LifecycleState,
    history: Vec<TransitionRecord>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: LifecycleState::Created,
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn history(&self) -> &[TransitionRecord] {
        &self.history
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn transition(&mut self, to: LifecycleState) -> Result<(), LifecycleError> {
        if !self.state.can_transition(to) {
            return Err(LifecycleError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        self.history.push(TransitionRecord {
            from: self.state,
            to,
            at: Utc::now(),
        });
        self.state = to;
        Ok(())
    }
}
