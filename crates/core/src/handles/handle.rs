//! Handle values

use std::fmt;

use slotmap::{new_key_type, Key};

use crate::scene::ObjectId;
use stagehook_sdk::TypeTag;

new_key_type! {
    /// Key of a live handle list
    pub struct ListKey;
}

/// What a node points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// A scene object
    Object(ObjectId),
    /// The renderer of the draw pass owned by the given list
    Renderer(ListKey),
}

/// Opaque reference to an object, valid while its list is alive
///
/// `slot` is the node index plus one; zero means unset.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Handle {
    list: Option<ListKey>,
    slot: u16,
}

impl Handle {
    /// A handle bound to nothing
    #[inline]
    pub const fn unbound() -> Self {
        Self { list: None, slot: 0 }
    }

    #[inline]
    pub(crate) const fn new(list: ListKey, index: u16) -> Self {
        Self {
            list: Some(list),
            slot: index + 1,
        }
    }

    /// Whether the handle was ever bound to a node
    ///
    /// A bound handle may still fail to resolve once its list is gone.
    #[inline]
    pub const fn is_bound(&self) -> bool {
        self.list.is_some() && self.slot != 0
    }

    /// Node index within the owning list
    #[inline]
    pub const fn index(&self) -> Option<usize> {
        if self.is_bound() {
            Some(self.slot as usize - 1)
        } else {
            None
        }
    }

    #[inline]
    pub const fn list(&self) -> Option<ListKey> {
        self.list
    }

    /// Resolve against the live lists
    ///
    /// Returns `None` if:
    /// - The handle is unbound
    /// - The owning list was dropped
    /// - The index is out of range
    /// - The stored tag does not satisfy `expected`
    #[inline]
    pub fn resolve(&self, expected: TypeTag) -> Option<Target> {
        super::resolve(*self, expected)
    }

    /// Resolve to a scene object
    pub fn object(&self, expected: TypeTag) -> Option<ObjectId> {
        match self.resolve(expected)? {
            Target::Object(id) => Some(id),
            Target::Renderer(_) => None,
        }
    }

    /// Whether the handle currently resolves at all
    pub fn is_live(&self) -> bool {
        [TypeTag::DisplayObject, TypeTag::Renderer]
            .into_iter()
            .any(|tag| self.resolve(tag).is_some())
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.list, self.index()) {
            (Some(list), Some(index)) => write!(f, "{:x}:{}", list.data().as_ffi(), index),
            _ => write!(f, "unbound"),
        }
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self)
    }
}
