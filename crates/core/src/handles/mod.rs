//! Call-scoped object handles
//!
//! Hooks never receive scene references directly. Each hook invocation opens a
//! [`HandleList`], stores the objects the hook may touch (self, parent,
//! renderer) and passes out small [`Handle`] values. Dropping the list
//! invalidates every handle it issued.
//!
//! # Layout
//!
//! ```text
//! LISTS (process-wide arena)
//! ┌──────────────┬───────────────────────────────────────┐
//! │ ListKey      │ nodes                                 │
//! │ (idx, gen)   │ [ (Target, TypeTag), (Target, Tag) ]  │
//! └──────────────┴───────────────────────────────────────┘
//!          ▲                  ▲
//!          │                  │
//! Handle { list: Some(key), slot: index + 1 }
//! ```
//!
//! A stale handle carries a key whose generation no longer matches, so it
//! resolves to `None` instead of reaching a reused list.

mod handle;
mod list;

pub use handle::{Handle, ListKey, Target};
pub use list::{HandleList, MAX_NODES};

pub(crate) use list::{resolve, store_in};
