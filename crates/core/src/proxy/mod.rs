//! Script property dispatch
//!
//! Each object kind has a vtable: a static singleton that resolves a property
//! name against its own perfect-hash table and hands misses to its parent.
//!
//! ```text
//! DisplayObject
//! ├── ShapeObject
//! │   ├── TextObject ── EmbossedTextObject
//! │   ├── SpriteObject
//! │   └── SnapshotObject
//! ├── LineObject
//! ├── GroupObject ── StageObject
//! └── EmitterObject
//! ```
//!
//! Augmented objects are served by a wrapper whose parent is the kind's
//! vtable; it runs the `Value` / `SetValue` hooks around the chain.
//!
//! A name no level recognizes is a miss (`0` values pushed, or `false` for a
//! set), never an error.

pub mod augmented;
pub mod display;
pub mod emitter;
pub mod group;
pub mod hash;
mod introspect;
pub mod line;
mod methods;
pub mod shape;
pub mod snapshot;
pub mod sprite;
pub mod text;

use crate::scene::{Color, DisplayObject, ObjectId, Scene};
use stagehook_engine::{ScriptState, ScriptValue};
use stagehook_sdk::{ObjectKind, Rect};

pub use hash::{PerfectHash, PropertyKey, PropertyKeys};
pub use introspect::{PROPERTIES_KEY, TYPE_KEY};
pub use methods::invoke;

/// Everything a property access touches
pub struct PropertyAccess<'a> {
    pub scene: &'a mut Scene,
    pub state: &'a mut dyn ScriptState,
    pub object: ObjectId,
}

impl<'a> PropertyAccess<'a> {
    pub fn new(scene: &'a mut Scene, state: &'a mut dyn ScriptState, object: ObjectId) -> Self {
        Self {
            scene,
            state,
            object,
        }
    }

    #[inline]
    pub fn object(&self) -> Option<&DisplayObject> {
        self.scene.get(self.object)
    }

    #[inline]
    pub fn object_mut(&mut self) -> Option<&mut DisplayObject> {
        self.scene.get_mut(self.object)
    }

    /// Push the proxy of another object, or nil when it is gone
    pub fn push_object(&mut self, id: Option<ObjectId>) {
        match id.filter(|&id| self.scene.contains(id)) {
            Some(id) => {
                let proxy = self.scene.proxy_ref(id);
                self.state.push(ScriptValue::Proxy(proxy));
            }
            None => self.state.push_nil(),
        }
    }

    /// Object behind the proxy at a stack index
    pub fn object_at(&self, index: i32) -> Option<ObjectId> {
        match self.state.get(index)? {
            ScriptValue::Proxy(proxy) => self.scene.resolve_proxy(*proxy),
            _ => None,
        }
    }

    #[inline]
    pub fn number(&self, index: i32) -> f32 {
        self.state.to_number(index).unwrap_or(0.0) as f32
    }
}

/// A per-kind property dispatch table
pub trait ProxyVTable: Sync {
    /// Script type name of the objects this table serves
    fn name(&self) -> &'static str;

    /// Next table in the chain, `None` at the root
    fn parent(&self) -> Option<&'static dyn ProxyVTable>;

    /// Push the value of `key` and return how many values were pushed
    ///
    /// `0` means no level recognized the key.
    fn value_for_key(&self, access: &mut PropertyAccess<'_>, key: &str) -> i32;

    /// Assign `key` from the stack value at `value_index`
    ///
    /// Returns `false` when no level recognized the key. Read-only keys are
    /// recognized and ignored.
    fn set_value_for_key(
        &self,
        access: &mut PropertyAccess<'_>,
        key: &str,
        value_index: i32,
    ) -> bool;
}

/// Plain vtable for a kind
pub fn kind_vtable(kind: ObjectKind) -> &'static dyn ProxyVTable {
    match kind {
        ObjectKind::Circle
        | ObjectKind::Rect
        | ObjectKind::RoundedRect
        | ObjectKind::Polygon
        | ObjectKind::Mesh
        | ObjectKind::Image
        | ObjectKind::ImageRect => &shape::SHAPE,
        ObjectKind::Line => &line::LINE,
        ObjectKind::Group | ObjectKind::Container => &group::GROUP,
        ObjectKind::Stage => &group::STAGE,
        ObjectKind::Text => &text::TEXT,
        ObjectKind::EmbossedText => &text::EMBOSSED_TEXT,
        ObjectKind::Sprite => &sprite::SPRITE,
        ObjectKind::Snapshot => &snapshot::SNAPSHOT,
        ObjectKind::Emitter => &emitter::EMITTER,
    }
}

/// Vtable serving an object, the augmented wrapper when it has hooks
pub fn vtable_for(scene: &Scene, id: ObjectId) -> Option<&'static dyn ProxyVTable> {
    let object = scene.get(id)?;
    Some(if object.is_augmented() {
        augmented::augmented_vtable(object.kind())
    } else {
        kind_vtable(object.kind())
    })
}

/// Read a property of `id` onto the stack
///
/// Returns the number of values pushed; `0` for unknown names and objects.
pub fn value_for_key(
    scene: &mut Scene,
    state: &mut dyn ScriptState,
    id: ObjectId,
    key: &str,
) -> i32 {
    let Some(vtable) = vtable_for(scene, id) else {
        return 0;
    };
    vtable.value_for_key(&mut PropertyAccess::new(scene, state, id), key)
}

/// Assign a property of `id` from the stack value at `value_index`
pub fn set_value_for_key(
    scene: &mut Scene,
    state: &mut dyn ScriptState,
    id: ObjectId,
    key: &str,
    value_index: i32,
) -> bool {
    let Some(vtable) = vtable_for(scene, id) else {
        return false;
    };
    vtable.set_value_for_key(&mut PropertyAccess::new(scene, state, id), key, value_index)
}

fn push_rect(state: &mut dyn ScriptState, rect: Rect) {
    let rect = if rect.is_empty() { Rect::new(0.0, 0.0, 0.0, 0.0) } else { rect };
    state.push(ScriptValue::table([
        ("xMin", ScriptValue::from(rect.x_min)),
        ("yMin", ScriptValue::from(rect.y_min)),
        ("xMax", ScriptValue::from(rect.x_max)),
        ("yMax", ScriptValue::from(rect.y_max)),
    ]));
}

fn color_value(color: Color) -> ScriptValue {
    ScriptValue::table([
        ("r", ScriptValue::from(color.r)),
        ("g", ScriptValue::from(color.g)),
        ("b", ScriptValue::from(color.b)),
        ("a", ScriptValue::from(color.a)),
    ])
}

fn push_color(state: &mut dyn ScriptState, color: Option<Color>) {
    match color {
        Some(color) => state.push(color_value(color)),
        None => state.push_nil(),
    }
}

/// Color from one stack value: a gray level, a channel array or an
/// `{r, g, b, a}` table
fn read_color(state: &dyn ScriptState, index: i32) -> Option<Color> {
    match state.get(index)? {
        value @ ScriptValue::Table(_) => table_color(value),
        value => Color::from_channels(&[value.as_number()? as f32]),
    }
}

fn table_color(value: &ScriptValue) -> Option<Color> {
    if let Some(r) = value.field("r").and_then(ScriptValue::as_number) {
        let channel = |name: &str, default: f64| {
            value.field(name).and_then(ScriptValue::as_number).unwrap_or(default) as f32
        };
        return Color::from_channels(&[
            r as f32,
            channel("g", 0.0),
            channel("b", 0.0),
            channel("a", 1.0),
        ]);
    }
    let channels: Vec<f32> = value
        .array_items()
        .into_iter()
        .filter_map(ScriptValue::as_number)
        .map(|n| n as f32)
        .collect();
    Color::from_channels(&channels)
}

/// Color from method arguments starting at `start`: either one table or up
/// to four numbers
fn read_color_args(state: &dyn ScriptState, start: i32) -> Option<Color> {
    if let Some(value @ ScriptValue::Table(_)) = state.get(start) {
        return table_color(value);
    }
    let channels: Vec<f32> = (start..start + 4)
        .map_while(|i| state.to_number(i))
        .map(|n| n as f32)
        .collect();
    Color::from_channels(&channels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{GroupData, KindData, Path, ShapeData};
    use stagehook_engine::MemoryState;

    pub(crate) fn rect(scene: &mut Scene) -> ObjectId {
        let id = scene.create(
            ObjectKind::Rect,
            KindData::Shape(ShapeData::new(Path::Rect {
                width: 10.0,
                height: 20.0,
            })),
        );
        let stage = scene.stage();
        scene.insert(stage, None, id);
        id
    }

    pub(crate) fn get(
        scene: &mut Scene,
        state: &mut MemoryState,
        id: ObjectId,
        key: &str,
    ) -> ScriptValue {
        assert_eq!(value_for_key(scene, state, id, key), 1, "{key}");
        state.pop().unwrap()
    }

    pub(crate) fn set(
        scene: &mut Scene,
        state: &mut MemoryState,
        id: ObjectId,
        key: &str,
        value: ScriptValue,
    ) -> bool {
        state.set_top(0);
        state.push(value);
        set_value_for_key(scene, state, id, key, 1)
    }

    #[test]
    fn test_kind_vtables() {
        assert_eq!(kind_vtable(ObjectKind::Circle).name(), "ShapeObject");
        assert_eq!(kind_vtable(ObjectKind::Container).name(), "GroupObject");
        assert_eq!(kind_vtable(ObjectKind::Stage).name(), "StageObject");
        assert_eq!(kind_vtable(ObjectKind::EmbossedText).name(), "EmbossedTextObject");
    }

    #[test]
    fn test_chains_end_at_display() {
        for kind in ObjectKind::PUSHABLE {
            let mut vtable = kind_vtable(kind);
            let mut depth = 0;
            while let Some(parent) = vtable.parent() {
                vtable = parent;
                depth += 1;
                assert!(depth < 8);
            }
            assert_eq!(vtable.name(), "DisplayObject");
        }
    }

    #[test]
    fn test_unknown_key_is_a_miss() {
        let mut scene = Scene::new();
        let mut state = MemoryState::new();
        let id = rect(&mut scene);

        assert_eq!(value_for_key(&mut scene, &mut state, id, "noSuchThing"), 0);
        assert_eq!(state.top(), 0);

        state.push_number(1.0);
        assert!(!set_value_for_key(&mut scene, &mut state, id, "noSuchThing", 1));
    }

    #[test]
    fn test_dead_object_is_a_miss() {
        let mut scene = Scene::new();
        let mut state = MemoryState::new();
        let id = scene.create(ObjectKind::Group, KindData::Group(GroupData::default()));
        scene.remove_self(id);
        assert_eq!(value_for_key(&mut scene, &mut state, id, "x"), 0);
    }

    #[test]
    fn test_read_color_forms() {
        let state = MemoryState::with_stack([
            ScriptValue::Number(0.5),
            ScriptValue::array([0.1, 0.2, 0.3].map(ScriptValue::Number)),
            ScriptValue::table([("r", ScriptValue::Number(1.0)), ("b", ScriptValue::Number(0.5))]),
        ]);
        assert_eq!(read_color(&state, 1), Some(Color::rgba(0.5, 0.5, 0.5, 1.0)));
        assert_eq!(read_color(&state, 2), Some(Color::rgba(0.1, 0.2, 0.3, 1.0)));
        assert_eq!(read_color(&state, 3), Some(Color::rgba(1.0, 0.0, 0.5, 1.0)));
        assert_eq!(read_color(&state, 4), None);
    }

    #[test]
    fn test_read_color_args() {
        let state = MemoryState::with_stack([0.0, 1.0, 0.0, 0.5].map(ScriptValue::Number));
        assert_eq!(read_color_args(&state, 1), Some(Color::rgba(0.0, 1.0, 0.0, 0.5)));
        assert_eq!(read_color_args(&state, 4), Some(Color::rgba(0.5, 0.5, 0.5, 1.0)));
    }
}
