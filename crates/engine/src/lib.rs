//! Stagehook Engine - Scripting Runtime Seam
//!
//! This crate handles:
//! - The typed value stack the core pushes to and reads from ([`ScriptState`])
//! - The runtime's reference registry and identity-keyed guard table
//! - An in-memory runtime ([`MemoryState`]) for embedding and tests
//! - Runtime globals, including the owning thread for runtime checks
//!
//! # Architecture
//!
//! The core never sees the scripting language itself. Property reads push
//! [`ScriptValue`]s, setters read them back by stack index, and long-lived
//! native data (method streams) lives in the registry as [`Userdata`] tagged
//! with a metatable name.
//!
//! # Thread Safety
//!
//! A runtime is owned by one thread. [`is_main_thread()`] reports whether the
//! caller is the thread that called [`init_runtime`].

pub mod error;
pub mod globals;
pub mod memory;
pub mod state;
pub mod value;

pub use error::{RuntimeError, ScriptError};
pub use globals::{init_runtime, is_main_thread, is_runtime_initialized, try_runtime, RuntimeGlobals};
pub use memory::MemoryState;
pub use state::{RegistryRef, ScriptState};
pub use value::{NativeFunction, ProxyRef, ScriptValue, Userdata};
