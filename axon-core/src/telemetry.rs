//! Tracing setup shared across the workspace.
//!
//! Every stage of the lifecycle emits structured events via `tracing`;
//! binaries and integration tests call [`init_tracing`] once.

use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber from `AXON_LOG` (falling back to the
/// given default directive). Safe to call more than once; later calls are
/// no-ops.
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_env("AXON_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
