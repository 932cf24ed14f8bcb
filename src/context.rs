//! Process-wide run context registry.
//!
//! A run context is the `{application, run_id}` pair that tags every event
//! within one logical execution. It is established once by
//! [`configure`](crate::config::configure) and read by every logger and
//! instrumentation call created afterward. Concurrent reconfiguration is not
//! arbitrated: last write wins, and callers are expected to configure before
//! spawning logging threads.

use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

/// The `{application, run_id}` pair tagging every event in one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub application: String,
    pub run_id: String,
}

static CURRENT: RwLock<Option<Arc<RunContext>>> = RwLock::new(None);

/// Generate a fresh run identifier (uuid-v4, hex form).
pub fn generate_run_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Establish the process-wide run context.
///
/// A caller-supplied `run_id` takes precedence over a generated one. Returns
/// the context that was installed, shared by reference with every logger
/// obtained afterward.
pub fn set_current(application: &str, run_id: Option<&str>) -> Arc<RunContext> {
    let context = Arc::new(RunContext {
        application: application.to_string(),
        run_id: run_id.map_or_else(generate_run_id, str::to_string),
    });
    *CURRENT.write() = Some(context.clone());
    context
}

/// The most recently configured run context, or `None` if
/// [`set_current`] was never called.
pub fn current() -> Option<Arc<RunContext>> {
    CURRENT.read().clone()
}
