//! Handle lists
//!
//! Lists live in one process-wide arena so that a handle can be resolved from
//! anywhere (a nested hook may still hold its caller's handles) while the
//! owning list is alive.

use std::sync::LazyLock;

use parking_lot::Mutex;
use slotmap::SlotMap;

use super::handle::{Handle, ListKey, Target};
use stagehook_sdk::TypeTag;

/// Most nodes one list can hold (the slot must fit in a `u16` after +1)
pub const MAX_NODES: usize = u16::MAX as usize - 1;

/// One stored object
#[derive(Debug, Clone, Copy)]
struct Node {
    target: Target,
    tag: TypeTag,
}

#[derive(Debug, Default)]
struct NodeList {
    nodes: Vec<Node>,
}

/// Global list arena
static LISTS: LazyLock<Mutex<SlotMap<ListKey, NodeList>>> =
    LazyLock::new(|| Mutex::new(SlotMap::with_key()));

/// A call-scoped list of stored objects
///
/// Dropping the list invalidates every handle it issued.
///
/// # Example
///
/// ```ignore
/// let list = HandleList::open();
/// let this = list.store(Target::Object(id), TypeTag::DisplayObject);
/// assert_eq!(this.object(TypeTag::DisplayObject), Some(id));
/// drop(list);
/// assert_eq!(this.object(TypeTag::DisplayObject), None);
/// ```
#[derive(Debug)]
pub struct HandleList {
    key: ListKey,
}

impl HandleList {
    /// Open an empty list
    pub fn open() -> Self {
        debug_assert!(
            stagehook_engine::is_main_thread(),
            "handle lists are opened on the runtime thread"
        );
        let key = LISTS.lock().insert(NodeList::default());
        tracing::trace!("Opened handle list {:?}", key);
        Self { key }
    }

    #[inline]
    pub fn key(&self) -> ListKey {
        self.key
    }

    /// Store an object and get its handle
    ///
    /// Storing the same (target, tag) pair twice returns the same node.
    pub fn store(&self, target: Target, tag: TypeTag) -> Handle {
        store_in(self.key, target, tag)
    }

    /// Number of distinct nodes stored
    pub fn len(&self) -> usize {
        LISTS
            .lock()
            .get(self.key)
            .map(|list| list.nodes.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for HandleList {
    fn drop(&mut self) {
        if let Some(list) = LISTS.lock().remove(self.key) {
            tracing::trace!(
                "Closed handle list {:?} ({} nodes)",
                self.key,
                list.nodes.len()
            );
        }
    }
}

/// Store into a live list by key
///
/// Returns an unbound handle when the list is gone or full.
pub(crate) fn store_in(key: ListKey, target: Target, tag: TypeTag) -> Handle {
    let mut lists = LISTS.lock();
    let Some(list) = lists.get_mut(key) else {
        return Handle::unbound();
    };

    if let Some(index) = list
        .nodes
        .iter()
        .position(|n| n.target == target && n.tag == tag)
    {
        return Handle::new(key, index as u16);
    }

    if list.nodes.len() >= MAX_NODES {
        tracing::warn!("Handle list {:?} is full; {:?} not stored", key, target);
        return Handle::unbound();
    }

    list.nodes.push(Node { target, tag });
    Handle::new(key, (list.nodes.len() - 1) as u16)
}

/// Resolve a handle; total, never panics
pub(crate) fn resolve(handle: Handle, expected: TypeTag) -> Option<Target> {
    let key = handle.list()?;
    let index = handle.index()?;
    let lists = LISTS.lock();
    let node = lists.get(key)?.nodes.get(index)?;

    if node.tag.satisfies(expected) {
        Some(node.target)
    } else {
        tracing::trace!(
            "Handle {} holds {:?}, expected {:?}",
            handle,
            node.tag,
            expected
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::ObjectId;
    use slotmap::KeyData;

    fn object(n: u64) -> Target {
        Target::Object(ObjectId::from(KeyData::from_ffi(n)))
    }

    #[test]
    fn test_resolve_while_alive() {
        let list = HandleList::open();
        let h = list.store(object(1), TypeTag::DisplayObject);
        assert!(h.is_bound());
        assert_eq!(h.resolve(TypeTag::DisplayObject), Some(object(1)));
    }

    #[test]
    fn test_null_after_drop() {
        let list = HandleList::open();
        let h = list.store(object(1), TypeTag::DisplayObject);
        drop(list);
        assert!(h.is_bound());
        assert_eq!(h.resolve(TypeTag::DisplayObject), None);
        assert!(!h.is_live());
    }

    #[test]
    fn test_dedup_same_pair() {
        let list = HandleList::open();
        let a = list.store(object(7), TypeTag::DisplayObject);
        let b = list.store(object(7), TypeTag::DisplayObject);
        assert_eq!(a, b);
        assert_eq!(a.index(), Some(0));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_same_object_different_tag() {
        let list = HandleList::open();
        let a = list.store(object(7), TypeTag::DisplayObject);
        let b = list.store(object(7), TypeTag::GroupObject);
        assert_ne!(a, b);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_tag_mismatch() {
        let list = HandleList::open();
        let display = list.store(object(1), TypeTag::DisplayObject);
        let group = list.store(object(2), TypeTag::GroupObject);
        assert_eq!(display.resolve(TypeTag::GroupObject), None);
        assert_eq!(display.resolve(TypeTag::Renderer), None);
        assert_eq!(group.resolve(TypeTag::DisplayObject), Some(object(2)));
    }

    #[test]
    fn test_unbound_handle() {
        let h = Handle::unbound();
        assert!(!h.is_bound());
        assert_eq!(h.index(), None);
        assert_eq!(h.resolve(TypeTag::DisplayObject), None);
        assert_eq!(h.to_string(), "unbound");
        assert_eq!(Handle::default(), h);
    }

    #[test]
    fn test_store_into_dropped_list() {
        let list = HandleList::open();
        let key = list.key();
        drop(list);
        assert!(!store_in(key, object(1), TypeTag::DisplayObject).is_bound());
    }

    #[test]
    fn test_handles_survive_nested_lists() {
        let outer = HandleList::open();
        let h = outer.store(object(3), TypeTag::DisplayObject);
        {
            let inner = HandleList::open();
            let _ = inner.store(object(4), TypeTag::DisplayObject);
            assert_eq!(h.resolve(TypeTag::DisplayObject), Some(object(3)));
        }
        assert_eq!(h.resolve(TypeTag::DisplayObject), Some(object(3)));
    }
}
