//! Global runtime state
//!
//! Recorded once when the host brings up its scripting runtime.
//! Access is thread-safe via OnceLock.

use std::sync::OnceLock;
use std::thread::ThreadId;
use std::time::Instant;

use crate::error::RuntimeError;

/// Process-wide facts about the scripting runtime
#[derive(Debug)]
pub struct RuntimeGlobals {
    /// Thread that owns the value stack
    pub main_thread_id: ThreadId,

    /// When the runtime was brought up
    pub started_at: Instant,
}

impl RuntimeGlobals {
    /// Capture globals for the calling thread
    pub fn new() -> Self {
        Self {
            main_thread_id: std::thread::current().id(),
            started_at: Instant::now(),
        }
    }
}

impl Default for RuntimeGlobals {
    fn default() -> Self {
        Self::new()
    }
}

static RUNTIME: OnceLock<RuntimeGlobals> = OnceLock::new();

/// Initialize runtime globals
///
/// Called once by the host on the thread that owns the scripting runtime.
pub fn init_runtime(globals: RuntimeGlobals) -> Result<(), RuntimeError> {
    RUNTIME
        .set(globals)
        .map_err(|_| RuntimeError::AlreadyInitialized)?;
    tracing::debug!("Scripting runtime globals initialized");
    Ok(())
}

/// Get runtime globals, if initialized
pub fn try_runtime() -> Option<&'static RuntimeGlobals> {
    RUNTIME.get()
}

/// Check if runtime is initialized
pub fn is_runtime_initialized() -> bool {
    RUNTIME.get().is_some()
}

/// Check if the current thread owns the scripting runtime
///
/// Before initialization every thread is accepted.
pub fn is_main_thread() -> bool {
    RUNTIME
        .get()
        .map(|g| std::thread::current().id() == g.main_thread_id)
        .unwrap_or(true)
}
