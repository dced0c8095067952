//! Fill, stroke and path of shape-like objects
//!
//! Also the parent level of text, sprites and snapshots, which all carry a
//! [`ShapeData`](crate::scene::ShapeData).

use super::display::DISPLAY;
use super::introspect::{self, PROPERTIES_KEY};
use super::{push_color, read_color, PropertyAccess, ProxyVTable};
use crate::scene::{BlendMode, Color, Path};
use crate::PropertyKeys;
use stagehook_engine::ScriptValue;

#[derive(Debug, Clone, Copy, PartialEq, PropertyKeys)]
#[keys(table_start = 11, hash_chars = 2)]
pub enum ShapeKey {
    #[key(name = "path")]
    Path,
    #[key(name = "fill")]
    Fill,
    #[key(name = "stroke")]
    Stroke,
    #[key(name = "blendMode")]
    BlendMode,
    #[key(name = "setFillColor")]
    SetFillColor,
    #[key(name = "setStrokeColor")]
    SetStrokeColor,
    #[key(name = "strokeWidth")]
    StrokeWidth,
    #[key(name = "innerStrokeWidth")]
    InnerStrokeWidth,
}

pub struct ShapeVTable;

pub static SHAPE: ShapeVTable = ShapeVTable;

fn path_value(path: &Path) -> ScriptValue {
    let bounds = path.bounds();
    let mut fields = vec![
        ("type", ScriptValue::from(path.type_name())),
        ("width", ScriptValue::from(bounds.width())),
        ("height", ScriptValue::from(bounds.height())),
    ];
    match path {
        Path::Circle { radius } | Path::RoundedRect { radius, .. } => {
            fields.push(("radius", ScriptValue::from(*radius)));
        }
        Path::Image { file, .. } => fields.push(("filename", ScriptValue::from(file.as_str()))),
        _ => {}
    }
    ScriptValue::table(fields)
}

impl ShapeVTable {
    fn value(&self, access: &mut PropertyAccess<'_>, key: ShapeKey) -> i32 {
        if matches!(key, ShapeKey::SetFillColor | ShapeKey::SetStrokeColor) {
            access.state.push_function(key.name());
            return 1;
        }
        let Some(shape) = access.object().and_then(|o| o.shape()) else {
            return 0;
        };

        match key {
            ShapeKey::Path => {
                let value = path_value(&shape.path);
                access.state.push(value);
            }
            ShapeKey::Fill => {
                let fill = shape.fill;
                push_color(access.state, fill);
            }
            ShapeKey::Stroke => {
                let stroke = shape.stroke;
                push_color(access.state, stroke);
            }
            ShapeKey::BlendMode => {
                let name = shape.blend_mode.name();
                access.state.push_str(name);
            }
            ShapeKey::StrokeWidth => {
                let width = shape.stroke_width;
                access.state.push(width.into());
            }
            ShapeKey::InnerStrokeWidth => {
                let width = shape.inner_stroke_width;
                access.state.push(width.into());
            }
            ShapeKey::SetFillColor | ShapeKey::SetStrokeColor => return 0,
        }
        1
    }

    fn set_value(&self, access: &mut PropertyAccess<'_>, key: ShapeKey, value_index: i32) -> bool {
        let is_nil = access.state.get(value_index).map_or(true, ScriptValue::is_nil);
        let color = read_color(access.state, value_index);
        let number = access.number(value_index);
        let blend = access.state.to_str(value_index).map(str::to_owned);

        let Some(object) = access.object_mut() else {
            return false;
        };
        let Some(shape) = object.shape_mut() else {
            return false;
        };

        match key {
            ShapeKey::Path | ShapeKey::SetFillColor | ShapeKey::SetStrokeColor => return true,
            ShapeKey::Fill | ShapeKey::Stroke => {
                let paint = match (is_nil, color) {
                    (true, _) => None,
                    (false, Some(color)) => Some(color),
                    (false, None) => {
                        tracing::warn!("object.{} expects a color or nil", key.name());
                        return true;
                    }
                };
                if key == ShapeKey::Fill {
                    shape.fill = paint;
                } else {
                    shape.stroke = paint;
                }
            }
            ShapeKey::BlendMode => {
                shape.blend_mode = match blend.as_deref().and_then(BlendMode::from_name) {
                    Some(mode) => mode,
                    None => {
                        tracing::warn!("Unknown blend mode {:?}, using normal", blend);
                        BlendMode::Normal
                    }
                };
            }
            ShapeKey::StrokeWidth => {
                shape.stroke_width = number;
                shape.inner_stroke_width = (number / 2.0).floor();
                shape.stroke.get_or_insert(Color::WHITE);
            }
            ShapeKey::InnerStrokeWidth => {
                shape.inner_stroke_width = number;
                shape.stroke.get_or_insert(Color::WHITE);
            }
        }
        object.invalidate();
        true
    }
}

impl ProxyVTable for ShapeVTable {
    fn name(&self) -> &'static str {
        "ShapeObject"
    }

    fn parent(&self) -> Option<&'static dyn ProxyVTable> {
        Some(&DISPLAY)
    }

    fn value_for_key(&self, access: &mut PropertyAccess<'_>, key: &str) -> i32 {
        match ShapeKey::lookup(key) {
            Some(shape) => {
                let pushed = self.value(access, shape);
                if pushed > 0 {
                    return pushed;
                }
            }
            None if key == PROPERTIES_KEY => {
                return introspect::extend::<ShapeKey>(self, &DISPLAY, access);
            }
            None => {}
        }
        DISPLAY.value_for_key(access, key)
    }

    fn set_value_for_key(
        &self,
        access: &mut PropertyAccess<'_>,
        key: &str,
        value_index: i32,
    ) -> bool {
        if let Some(shape) = ShapeKey::lookup(key) {
            if self.set_value(access, shape, value_index) {
                return true;
            }
        }
        DISPLAY.set_value_for_key(access, key, value_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::tests::{get, rect, set};
    use crate::scene::Scene;
    use stagehook_engine::MemoryState;

    #[test]
    fn test_path_table() {
        let mut scene = Scene::new();
        let mut state = MemoryState::new();
        let id = rect(&mut scene);

        let path = get(&mut scene, &mut state, id, "path");
        assert_eq!(path.field("type").and_then(ScriptValue::as_str), Some("rect"));
        assert_eq!(path.field("width").and_then(ScriptValue::as_number), Some(10.0));
        assert_eq!(path.field("height").and_then(ScriptValue::as_number), Some(20.0));
    }

    #[test]
    fn test_fill_and_stroke() {
        let mut scene = Scene::new();
        let mut state = MemoryState::new();
        let id = rect(&mut scene);

        let red = ScriptValue::array([1.0, 0.0, 0.0].map(ScriptValue::Number));
        assert!(set(&mut scene, &mut state, id, "fill", red));
        let fill = scene.get(id).unwrap().shape().unwrap().fill;
        assert_eq!(fill, Some(Color::rgba(1.0, 0.0, 0.0, 1.0)));

        assert!(set(&mut scene, &mut state, id, "fill", ScriptValue::Nil));
        assert_eq!(get(&mut scene, &mut state, id, "fill"), ScriptValue::Nil);

        assert_eq!(get(&mut scene, &mut state, id, "stroke"), ScriptValue::Nil);
    }

    #[test]
    fn test_stroke_width_assigns_default_stroke() {
        let mut scene = Scene::new();
        let mut state = MemoryState::new();
        let id = rect(&mut scene);

        assert!(set(&mut scene, &mut state, id, "strokeWidth", ScriptValue::Number(5.0)));
        let shape = scene.get(id).unwrap().shape().unwrap();
        assert_eq!(shape.stroke, Some(Color::WHITE));
        assert_eq!(shape.stroke_width, 5.0);
        assert_eq!(shape.inner_stroke_width, 2.0);
    }

    #[test]
    fn test_unknown_blend_mode_falls_back() {
        let mut scene = Scene::new();
        let mut state = MemoryState::new();
        let id = rect(&mut scene);

        assert!(set(&mut scene, &mut state, id, "blendMode", "add".into()));
        assert_eq!(get(&mut scene, &mut state, id, "blendMode"), ScriptValue::from("add"));
        assert!(set(&mut scene, &mut state, id, "blendMode", "glow".into()));
        assert_eq!(get(&mut scene, &mut state, id, "blendMode"), ScriptValue::from("normal"));
    }

    #[test]
    fn test_display_keys_delegate() {
        let mut scene = Scene::new();
        let mut state = MemoryState::new();
        let id = rect(&mut scene);

        assert!(set(&mut scene, &mut state, id, "x", ScriptValue::Number(7.0)));
        assert_eq!(get(&mut scene, &mut state, id, "x"), ScriptValue::Number(7.0));
        assert_eq!(get(&mut scene, &mut state, id, "_type"), ScriptValue::from("ShapeObject"));
        assert!(matches!(
            get(&mut scene, &mut state, id, "setFillColor"),
            ScriptValue::Function(_)
        ));
    }
}
