//! Snapshot properties

use super::introspect::{self, PROPERTIES_KEY};
use super::shape::SHAPE;
use super::{color_value, read_color, PropertyAccess, ProxyVTable};
use crate::scene::CanvasMode;
use crate::PropertyKeys;

#[derive(Debug, Clone, Copy, PartialEq, PropertyKeys)]
#[keys(table_start = 6, hash_chars = 1)]
pub enum SnapshotKey {
    #[key(name = "group")]
    Group,
    #[key(name = "invalidate")]
    Invalidate,
    #[key(name = "clearColor")]
    ClearColor,
    #[key(name = "canvasMode")]
    CanvasMode,
}

pub struct SnapshotVTable;

pub static SNAPSHOT: SnapshotVTable = SnapshotVTable;

impl SnapshotVTable {
    fn value(&self, access: &mut PropertyAccess<'_>, key: SnapshotKey) -> i32 {
        if key == SnapshotKey::Invalidate {
            access.state.push_function(key.name());
            return 1;
        }
        let Some(snapshot) = access.object().and_then(|o| o.snapshot()) else {
            return 0;
        };
        match key {
            SnapshotKey::Group => {
                let group = snapshot.group;
                access.push_object(Some(group));
            }
            SnapshotKey::ClearColor => {
                let color = color_value(snapshot.clear_color);
                access.state.push(color);
            }
            SnapshotKey::CanvasMode => {
                let mode = snapshot.canvas_mode.name();
                access.state.push_str(mode);
            }
            SnapshotKey::Invalidate => return 0,
        }
        1
    }

    fn set_value(&self, access: &mut PropertyAccess<'_>, key: SnapshotKey, value_index: i32) -> bool {
        let color = read_color(access.state, value_index);
        let mode = access.state.to_str(value_index).map(str::to_owned);
        let Some(snapshot) = access.object_mut().and_then(|o| o.snapshot_mut()) else {
            return false;
        };

        match key {
            SnapshotKey::Group | SnapshotKey::Invalidate => {
                tracing::warn!("snapshot.{} is read-only", key.name());
            }
            SnapshotKey::ClearColor => match color {
                Some(color) => snapshot.clear_color = color,
                None => tracing::warn!("snapshot.clearColor expects a color"),
            },
            SnapshotKey::CanvasMode => match mode.as_deref().and_then(CanvasMode::from_name) {
                Some(mode) => snapshot.canvas_mode = mode,
                None => tracing::warn!("Unknown canvas mode {:?}", mode),
            },
        }
        true
    }
}

impl ProxyVTable for SnapshotVTable {
    fn name(&self) -> &'static str {
        "SnapshotObject"
    }

    fn parent(&self) -> Option<&'static dyn ProxyVTable> {
        Some(&SHAPE)
    }

    fn value_for_key(&self, access: &mut PropertyAccess<'_>, key: &str) -> i32 {
        match SnapshotKey::lookup(key) {
            Some(snapshot) => match self.value(access, snapshot) {
                0 => SHAPE.value_for_key(access, key),
                pushed => pushed,
            },
            None if key == PROPERTIES_KEY => {
                introspect::extend::<SnapshotKey>(self, &SHAPE, access)
            }
            None => SHAPE.value_for_key(access, key),
        }
    }

    fn set_value_for_key(
        &self,
        access: &mut PropertyAccess<'_>,
        key: &str,
        value_index: i32,
    ) -> bool {
        if let Some(snapshot) = SnapshotKey::lookup(key) {
            if self.set_value(access, snapshot, value_index) {
                return true;
            }
        }
        SHAPE.set_value_for_key(access, key, value_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::tests::{get, set};
    use crate::scene::{Color, GroupData, KindData, ObjectId, Path, Scene, ShapeData, SnapshotData};
    use stagehook_engine::{MemoryState, ScriptValue};
    use stagehook_sdk::ObjectKind;

    fn snapshot(scene: &mut Scene) -> (ObjectId, ObjectId) {
        let group = scene.create(ObjectKind::Group, KindData::Group(GroupData::default()));
        let id = scene.create(
            ObjectKind::Snapshot,
            KindData::Snapshot(SnapshotData {
                shape: ShapeData::new(Path::Rect {
                    width: 100.0,
                    height: 100.0,
                }),
                group,
                clear_color: Color::rgba(0.0, 0.0, 0.0, 0.0),
                canvas_mode: CanvasMode::Append,
                invalidated: false,
            }),
        );
        (id, group)
    }

    #[test]
    fn test_group_is_read_only() {
        let mut scene = Scene::new();
        let mut state = MemoryState::new();
        let (id, group) = snapshot(&mut scene);

        assert_eq!(
            get(&mut scene, &mut state, id, "group"),
            ScriptValue::Proxy(scene.proxy_ref(group))
        );
        assert!(set(&mut scene, &mut state, id, "group", ScriptValue::Nil));
        assert_eq!(scene.get(id).unwrap().snapshot().unwrap().group, group);
    }

    #[test]
    fn test_canvas_mode_and_clear_color() {
        let mut scene = Scene::new();
        let mut state = MemoryState::new();
        let (id, _) = snapshot(&mut scene);

        assert!(set(&mut scene, &mut state, id, "canvasMode", "discard".into()));
        assert_eq!(get(&mut scene, &mut state, id, "canvasMode"), ScriptValue::from("discard"));
        assert!(set(&mut scene, &mut state, id, "canvasMode", "sideways".into()));
        assert_eq!(get(&mut scene, &mut state, id, "canvasMode"), ScriptValue::from("discard"));

        assert!(set(&mut scene, &mut state, id, "clearColor", ScriptValue::Number(1.0)));
        assert_eq!(scene.get(id).unwrap().snapshot().unwrap().clear_color, Color::WHITE);
        assert_eq!(get(&mut scene, &mut state, id, "fill"), color_value(Color::WHITE));
    }
}
