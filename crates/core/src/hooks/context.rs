//! Per-invocation hook context
//!
//! A context is opened for every hook invocation and owns that invocation's
//! handle list. Dropping the context closes the list, so any handle a hook
//! kept past its call resolves to nothing afterwards.

use crate::handles::{self, Handle, HandleList, Target};
use crate::scene::{DisplayObject, ObjectFlags, ObjectId, Renderer, Scene};
use stagehook_sdk::{TypeTag, UserData};

/// What a hook sees of the world during one call
pub struct HookContext<'a> {
    scene: &'a mut Scene,
    renderer: Option<&'a mut dyn Renderer>,
    list: HandleList,
    this: Handle,
    user_data: UserData,
}

impl<'a> HookContext<'a> {
    /// Open a context for `id`, storing it as the first handle
    ///
    /// Groups are stored with the group tag so group accessors accept `this`.
    pub(crate) fn open(scene: &'a mut Scene, id: ObjectId, user_data: UserData) -> Self {
        let list = HandleList::open();
        let tag = scene
            .get(id)
            .map(|o| o.kind().type_tag())
            .unwrap_or(TypeTag::DisplayObject);
        let this = list.store(Target::Object(id), tag);
        Self {
            scene,
            renderer: None,
            list,
            this,
            user_data,
        }
    }

    /// Attach the renderer of a draw pass and store a handle for it
    pub(crate) fn with_renderer(mut self, renderer: &'a mut dyn Renderer) -> (Self, Handle) {
        let handle = self
            .list
            .store(Target::Renderer(self.list.key()), TypeTag::Renderer);
        self.renderer = Some(renderer);
        (self, handle)
    }

    /// Handle of the object being operated on
    #[inline]
    pub fn this(&self) -> Handle {
        self.this
    }

    /// Data the augmenting extension attached to `this`
    #[inline]
    pub fn user_data(&self) -> UserData {
        self.user_data
    }

    #[inline]
    pub fn scene(&self) -> &Scene {
        &*self.scene
    }

    #[inline]
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut *self.scene
    }

    /// Scene and renderer together, for running the original draw
    pub(crate) fn draw_parts(&mut self) -> (&mut Scene, Option<&mut (dyn Renderer + 'a)>) {
        (&mut *self.scene, self.renderer.as_deref_mut())
    }

    /// Store another object in this call's list
    pub fn store(&self, id: ObjectId, tag: TypeTag) -> Handle {
        self.list.store(Target::Object(id), tag)
    }

    /// Resolve a handle to a live object id
    pub fn object_id(&self, handle: Handle) -> Option<ObjectId> {
        handle
            .object(TypeTag::DisplayObject)
            .filter(|&id| self.scene.contains(id))
    }

    /// Resolve a handle that was stored as a group
    pub fn group_id(&self, handle: Handle) -> Option<ObjectId> {
        handle
            .object(TypeTag::GroupObject)
            .filter(|&id| self.scene.get(id).is_some_and(DisplayObject::is_group))
    }

    pub fn object(&self, handle: Handle) -> Option<&DisplayObject> {
        self.scene.get(self.object_id(handle)?)
    }

    pub fn object_mut(&mut self, handle: Handle) -> Option<&mut DisplayObject> {
        let id = self.object_id(handle)?;
        self.scene.get_mut(id)
    }

    /// The renderer of the current draw pass
    ///
    /// Only a renderer handle issued by this context resolves.
    pub fn renderer(&mut self, handle: Handle) -> Option<&mut (dyn Renderer + 'a)> {
        match handle.resolve(TypeTag::Renderer)? {
            Target::Renderer(list) if list == self.list.key() => self.renderer.as_deref_mut(),
            _ => None,
        }
    }

    /// Whether the object holds children
    pub fn is_group(&self, handle: Handle) -> bool {
        self.object(handle).is_some_and(DisplayObject::is_group)
    }

    /// Parent group, stored in the same list as `handle`
    pub fn parent(&self, handle: Handle) -> Handle {
        let parent = self.object(handle).and_then(DisplayObject::parent);
        match (parent, handle.list()) {
            (Some(parent), Some(list)) => {
                handles::store_in(list, Target::Object(parent), TypeTag::GroupObject)
            }
            _ => Handle::unbound(),
        }
    }

    /// Number of children of a group handle, zero for anything else
    pub fn num_children(&self, handle: Handle) -> usize {
        self.group_id(handle)
            .map(|id| self.scene.children(id).len())
            .unwrap_or(0)
    }

    /// Child at `index` of a group handle, stored in the same list
    pub fn child(&self, handle: Handle, index: usize) -> Handle {
        let child = self
            .group_id(handle)
            .and_then(|id| self.scene.children(id).get(index).copied());
        match (child, handle.list()) {
            (Some(child), Some(list)) => {
                let tag = self
                    .scene
                    .get(child)
                    .map(|o| o.kind().type_tag())
                    .unwrap_or(TypeTag::DisplayObject);
                handles::store_in(list, Target::Object(child), tag)
            }
            _ => Handle::unbound(),
        }
    }

    /// Deliver a message to an object's `OnMessage` action
    ///
    /// Returns `true` only if the target has such an action.
    pub fn send_message(&mut self, handle: Handle, name: &str, payload: &[u8]) -> bool {
        match self.object_id(handle) {
            Some(id) => self.scene.send_message(id, name, payload),
            None => false,
        }
    }

    /// Mark transform and bounds for recomputation
    pub fn invalidate(&mut self, handle: Handle) {
        if let Some(object) = self.object_mut(handle) {
            object.invalidate();
        }
    }

    pub fn dummy_stage_bounds(&self, handle: Handle) -> bool {
        self.object(handle)
            .is_some_and(|o| o.flags.contains(ObjectFlags::DUMMY_STAGE_BOUNDS))
    }

    pub fn set_dummy_stage_bounds(&mut self, handle: Handle, on: bool) {
        if let Some(object) = self.object_mut(handle) {
            object.set_flag(ObjectFlags::DUMMY_STAGE_BOUNDS, on);
            object.flags.insert(ObjectFlags::BOUNDS_DIRTY);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{CommandBuffer, GroupData, KindData, Path, ShapeData};
    use stagehook_sdk::ObjectKind;

    fn setup() -> (Scene, ObjectId, ObjectId) {
        let mut scene = Scene::new();
        let group = scene.create(ObjectKind::Group, KindData::Group(GroupData::default()));
        let rect = scene.create(
            ObjectKind::Rect,
            KindData::Shape(ShapeData::new(Path::Rect {
                width: 2.0,
                height: 2.0,
            })),
        );
        let stage = scene.stage();
        scene.insert(stage, None, group);
        scene.insert(group, None, rect);
        (scene, group, rect)
    }

    #[test]
    fn test_this_and_parent() {
        let (mut scene, group, rect) = setup();
        let ctx = HookContext::open(&mut scene, rect, UserData::from_token(7));
        assert_eq!(ctx.object_id(ctx.this()), Some(rect));
        assert_eq!(ctx.user_data().token(), 7);

        let parent = ctx.parent(ctx.this());
        assert_eq!(ctx.group_id(parent), Some(group));
        assert!(ctx.is_group(parent));
        assert!(!ctx.is_group(ctx.this()));
        assert_eq!(parent.list(), ctx.this().list());
    }

    #[test]
    fn test_children() {
        let (mut scene, group, rect) = setup();
        let ctx = HookContext::open(&mut scene, group, UserData::null());
        assert_eq!(ctx.num_children(ctx.this()), 1);
        assert_eq!(ctx.object_id(ctx.child(ctx.this(), 0)), Some(rect));
        assert!(!ctx.child(ctx.this(), 1).is_bound());

        // A display handle is not a group handle
        let as_display = ctx.store(group, TypeTag::DisplayObject);
        assert_eq!(ctx.num_children(as_display), 0);
    }

    #[test]
    fn test_handles_die_with_context() {
        let (mut scene, _, rect) = setup();
        let this = {
            let ctx = HookContext::open(&mut scene, rect, UserData::null());
            ctx.this()
        };
        assert_eq!(this.object(TypeTag::DisplayObject), None);
    }

    #[test]
    fn test_renderer_handle() {
        let (mut scene, _, rect) = setup();
        let mut buffer = CommandBuffer::new();
        let (mut ctx, renderer) =
            HookContext::open(&mut scene, rect, UserData::null()).with_renderer(&mut buffer);
        assert!(ctx.renderer(renderer).is_some());
        let this = ctx.this();
        assert!(ctx.renderer(this).is_none());
    }

    #[test]
    fn test_dummy_stage_bounds_accessors() {
        let (mut scene, _, rect) = setup();
        let mut ctx = HookContext::open(&mut scene, rect, UserData::null());
        let this = ctx.this();
        assert!(!ctx.dummy_stage_bounds(this));
        ctx.set_dummy_stage_bounds(this, true);
        assert!(ctx.dummy_stage_bounds(this));
    }
}
