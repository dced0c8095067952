//! Stagehook SDK - Shared Type Definitions
//!
//! This crate contains the plain data types shared by every layer of the
//! augmentation stack. It has no dependencies and compiles quickly, allowing
//! parallel compilation of dependent crates.
//!
//! # Modules
//!
//! - [`methods`] - The closed set of augmentable methods and their parameter families
//! - [`kinds`] - Scene object kinds and handle type tags
//! - [`geometry`] - Bounds rectangles and 2D affine transforms
//! - [`user_data`] - Opaque extension-owned pointer carried through hooks

pub mod geometry;
pub mod kinds;
pub mod methods;
pub mod user_data;

pub use geometry::{Affine, Rect};
pub use kinds::{ObjectKind, TypeTag};
pub use methods::{AugmentedMethod, ParamsFamily, METHOD_COUNT};
pub use user_data::UserData;
