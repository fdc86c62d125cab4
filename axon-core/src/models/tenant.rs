use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Immutable identity attached to every operation.
///
/// Constructed once per inbound message; cloned (never mutated) into every
/// component that acts on the message. Tenant isolation checks compare
/// against `tenant_id` at each access point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantContext {
    pub tenant_id: String,
    pub session_id: String,
    pub trace_id: String,
}

impl TenantContext {
    /// Create a context with a fresh v4 trace id.
    pub fn new(tenant_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            session_id: session_id.into(),
            trace_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create a context with an explicit trace id (tests, replay).
    pub fn with_trace_id(
        tenant_id: impl Into<String>,
        session_id: impl Into<String>,
        trace_id: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            session_id: session_id.into(),
            trace_id: trace_id.into(),
        }
    }
}
