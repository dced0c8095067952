//! Hook invocation
//!
//! Every interceptable operation runs through the same protocol:
//!
//! ```text
//! before (optional) -> original (unless ignore_original) -> after (optional)
//! ```
//!
//! Result-bearing operations may stop right after `before`, according to the
//! [`EarlyOut`] policy of their parameter family. A hook is a plain function
//! pointer that receives a [`HookContext`] holding call-scoped handles for
//! `this` and any related objects.
//!
//! # Example
//!
//! ```ignore
//! fn before_translate(ctx: &mut HookContext<'_>, dx: f32, dy: f32) {
//!     let parent = ctx.parent(ctx.this());
//!     tracing::info!("moving by ({dx}, {dy}) inside {parent}");
//! }
//! ```

pub mod context;
pub mod invoke;
pub mod policy;

pub use context::HookContext;
pub use invoke::{run_bookended, run_early_out};
pub use policy::{EarlyOut, HookOutput};
