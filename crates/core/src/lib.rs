//! Stagehook Core - Display Object Augmentation
//!
//! This crate lets extension code intercept the virtual operations of
//! scripted display objects (drawing, hit testing, transforms, child
//! management and property access) without the script side noticing.
//!
//! - [`stream`] - the compact method stream describing which hooks an object has
//! - [`hooks`] - the before / original / after invocation protocol
//! - [`handles`] - call-scoped handles hooks use to reach objects
//! - [`scene`] - the display object tree and its plain behaviors
//! - [`augment`] - hooked dispatch and the `push_*` construction surface
//! - [`proxy`] - script property dispatch, one vtable per object kind
//!
//! # Re-exports
//!
//! This crate re-exports the SDK and engine crates for convenience:
//! - [`sdk`] - method ids, object kinds, geometry
//! - [`engine`] - the scripting runtime seam

// Allow the crate to refer to itself as `stagehook_core` for proc macro compatibility
extern crate self as stagehook_core;

// Re-export SDK and engine crates
pub use stagehook_engine as engine;
pub use stagehook_sdk as sdk;

pub mod augment;
pub mod config;
pub mod handles;
pub mod hooks;
pub mod logging;
pub mod proxy;
pub mod scene;
pub mod stream;

// Re-export commonly used items
pub use augment::{build_method_stream, release_object, FactoryError, StreamSource};
pub use handles::{Handle, HandleList};
pub use hooks::{EarlyOut, HookContext};
pub use proxy::{invoke, set_value_for_key, value_for_key, ProxyVTable};
pub use scene::{DisplayObject, ObjectId, Scene};
pub use stream::{HookDescriptor, MethodStream, StreamError};

// Re-export config types
pub use config::{ConfigError, ConfigResult, CoreConfig, ExtensionConfig};

// Re-export the property table trait and its derive
pub use proxy::hash::PropertyKeys;
pub use stagehook_macros::PropertyKeys;
