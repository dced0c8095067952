//! Stagehook Proc Macros
//!
//! This crate provides proc macros for the stagehook framework:
//!
//! - `#[derive(PropertyKeys)]` - Compile a perfect-hash table for a set of property names
//!
//! # PropertyKeys Example
//!
//! ```ignore
//! use stagehook_macros::PropertyKeys;
//!
//! #[derive(Debug, Clone, Copy, PropertyKeys)]
//! #[keys(table_start = 0, hash_chars = 1)]
//! pub enum GroupKey {
//!     #[key(name = "insert")]
//!     Insert,
//!     #[key(name = "numChildren")]
//!     NumChildren,
//!     #[key(name = "length", deprecated)]
//!     Length,
//! }
//!
//! // Generated:
//! // - GroupKey::lookup("numChildren") -> Some(GroupKey::NumChildren)
//! // - GroupKey::lookup("unknown") -> None
//! ```
//!
//! # Attributes
//!
//! ## Enum Attributes
//!
//! - `#[keys(table_start = N)]` - Optional. First seed index to try.
//! - `#[keys(hash_chars = N)]` - Optional. Minimum number of characters hashed.
//!
//! Both are search hints; the macro always finds the first collision-free
//! parameters at or above them, or fails to compile.
//!
//! ## Variant Attributes
//!
//! - `#[key(name = "propertyName")]` - **Required.** The script-facing name.
//! - `#[key(deprecated)]` - Resolves normally but is skipped by enumeration.

mod parse;
mod property_keys;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derive macro for property-name tables
///
/// Computes a collision-free hash over the variant names at compile time and
/// implements `stagehook_core::proxy::hash::PropertyKeys` with a static slot
/// array, so lookups never build anything at runtime.
///
/// # Generated Code
///
/// - `const TABLE: PerfectHash` holding names, deprecation markers,
///   the chosen hash parameters and the slot array
/// - `fn from_index(usize) -> Option<Self>` in declaration order
/// - `fn index(self) -> usize`
#[proc_macro_derive(PropertyKeys, attributes(keys, key))]
pub fn derive_property_keys(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    property_keys::derive_property_keys(input).into()
}
