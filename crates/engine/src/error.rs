//! Error types for the scripting runtime seam

/// Error reading script arguments
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScriptError {
    /// No value at the requested stack index
    #[error("bad argument #{index} (expected {expected}, got no value)")]
    MissingArgument { index: i32, expected: &'static str },

    /// Value at the index has the wrong type
    #[error("bad argument #{index} (expected {expected}, got {found})")]
    TypeMismatch {
        index: i32,
        expected: &'static str,
        found: &'static str,
    },

    /// Registry reference was released or never existed
    #[error("invalid registry reference")]
    UnknownReference,
}

/// Error managing runtime globals
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Runtime already initialized
    #[error("Runtime already initialized")]
    AlreadyInitialized,
}
