//! Scene graph
//!
//! Display objects live in one arena per scene, keyed by [`ObjectId`]. Groups
//! hold ordered child lists; the stage is the root group and is created with
//! the scene.
//!
//! ```text
//! Scene
//! ├── stage (Stage)
//! │   ├── group (Group)
//! │   │   ├── circle (Circle)
//! │   │   └── label (Text)
//! │   └── sprite (Sprite)
//! └── detached objects (created, not yet inserted)
//! ```
//!
//! The plain behaviors of each operation live in [`base`]. Public entry points
//! that may be intercepted by an augmentation are implemented in
//! [`crate::augment::dispatch`] and fall back to [`base`].

pub mod base;
mod object;
mod render;

use slotmap::{Key, KeyData, SlotMap};

use crate::config::CoreConfig;
use stagehook_engine::ProxyRef;
use stagehook_sdk::{Affine, ObjectKind};

pub use object::{
    AbsolutePosition, BlendMode, CanvasMode, Color, DisplayObject, EmitterData, EmitterState,
    GroupData, KindData, LineData, Mask, ObjectFlags, ObjectId, Path, ShapeData, SnapshotData,
    SpriteData, TextData, Transform, EMITTER_FIELDS,
};
pub use render::{CommandBuffer, DrawCommand, Renderer};

/// An arena of display objects rooted at a stage
#[derive(Debug)]
pub struct Scene {
    objects: SlotMap<ObjectId, DisplayObject>,
    stage: ObjectId,
    clamp_anchors: bool,
    dummy_stage_bounds: bool,
    focus: Option<ObjectId>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        let mut objects = SlotMap::with_key();
        let stage = objects.insert(DisplayObject::new(
            ObjectKind::Stage,
            KindData::Group(GroupData::default()),
        ));
        Self {
            objects,
            stage,
            clamp_anchors: true,
            dummy_stage_bounds: false,
            focus: None,
        }
    }

    /// A scene using the configured anchor and stage-bounds defaults
    pub fn with_config(config: &CoreConfig) -> Self {
        let mut scene = Self::new();
        scene.clamp_anchors = config.clamp_anchors;
        scene.dummy_stage_bounds = config.dummy_stage_bounds;
        scene
    }

    #[inline]
    pub fn stage(&self) -> ObjectId {
        self.stage
    }

    /// Whether anchor setters clamp to `0..=1`
    #[inline]
    pub fn clamp_anchors(&self) -> bool {
        self.clamp_anchors
    }

    pub fn set_clamp_anchors(&mut self, clamp: bool) {
        self.clamp_anchors = clamp;
    }

    /// Object receiving all touch input, if any
    #[inline]
    pub fn focus(&self) -> Option<ObjectId> {
        self.focus.filter(|&id| self.contains(id))
    }

    pub fn set_focus(&mut self, focus: Option<ObjectId>) {
        self.focus = focus;
    }

    #[inline]
    pub fn get(&self, id: ObjectId) -> Option<&DisplayObject> {
        self.objects.get(id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut DisplayObject> {
        self.objects.get_mut(id)
    }

    #[inline]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    /// Number of live objects, the stage included
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Add a detached object
    pub fn create(&mut self, kind: ObjectKind, data: KindData) -> ObjectId {
        let mut object = DisplayObject::new(kind, data);
        object.set_flag(ObjectFlags::DUMMY_STAGE_BOUNDS, self.dummy_stage_bounds);
        let id = self.objects.insert(object);
        tracing::trace!("Created {} {:?}", kind, id);
        id
    }

    pub(crate) fn release(&mut self, id: ObjectId) -> Option<DisplayObject> {
        if id == self.stage {
            return None;
        }
        self.objects.remove(id)
    }

    #[inline]
    pub fn parent_of(&self, id: ObjectId) -> Option<ObjectId> {
        self.get(id)?.parent()
    }

    pub fn children(&self, id: ObjectId) -> &[ObjectId] {
        self.get(id).map(DisplayObject::children).unwrap_or(&[])
    }

    /// Whether `ancestor` is `id` or one of its ancestors
    pub fn is_ancestor(&self, ancestor: ObjectId, id: ObjectId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent_of(node);
        }
        false
    }

    /// Whether the object is attached under the stage
    pub fn is_on_stage(&self, id: ObjectId) -> bool {
        self.is_ancestor(self.stage, id)
    }

    /// Script reference for an object
    pub fn proxy_ref(&self, id: ObjectId) -> ProxyRef {
        ProxyRef(id.data().as_ffi())
    }

    /// Object behind a script reference, if still alive
    pub fn resolve_proxy(&self, proxy: ProxyRef) -> Option<ObjectId> {
        let id = ObjectId::from(KeyData::from_ffi(proxy.0));
        self.contains(id).then_some(id)
    }

    /// Update transforms, prepare and draw the whole stage
    pub fn render(&mut self, renderer: &mut dyn Renderer) {
        let stage = self.stage;
        self.update_transform(stage, &Affine::IDENTITY);
        self.prepare(stage);
        self.draw(stage, renderer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(scene: &mut Scene) -> ObjectId {
        scene.create(
            ObjectKind::Rect,
            KindData::Shape(ShapeData::new(Path::Rect {
                width: 10.0,
                height: 4.0,
            })),
        )
    }

    #[test]
    fn test_stage_exists() {
        let scene = Scene::new();
        assert_eq!(scene.len(), 1);
        assert!(scene.get(scene.stage()).unwrap().is_group());
    }

    #[test]
    fn test_proxy_ref_round_trip() {
        let mut scene = Scene::new();
        let id = rect(&mut scene);
        let proxy = scene.proxy_ref(id);
        assert_eq!(scene.resolve_proxy(proxy), Some(id));
        scene.release(id);
        assert_eq!(scene.resolve_proxy(proxy), None);
    }

    #[test]
    fn test_stage_is_not_released() {
        let mut scene = Scene::new();
        let stage = scene.stage();
        assert!(scene.release(stage).is_none());
        assert!(scene.contains(stage));
    }

    #[test]
    fn test_config_defaults_apply() {
        let config = CoreConfig {
            clamp_anchors: false,
            dummy_stage_bounds: true,
            ..CoreConfig::default()
        };
        let mut scene = Scene::with_config(&config);
        let id = rect(&mut scene);
        assert!(!scene.clamp_anchors());
        assert!(scene
            .get(id)
            .unwrap()
            .flags
            .contains(ObjectFlags::DUMMY_STAGE_BOUNDS));
    }
}
