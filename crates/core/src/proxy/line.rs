//! Polyline properties

use super::display::DISPLAY;
use super::introspect::{self, PROPERTIES_KEY};
use super::{color_value, read_color, PropertyAccess, ProxyVTable};
use crate::scene::BlendMode;
use crate::PropertyKeys;
use stagehook_engine::ScriptValue;

#[derive(Debug, Clone, Copy, PartialEq, PropertyKeys)]
#[keys(table_start = 2, hash_chars = 2)]
pub enum LineKey {
    #[key(name = "setColor", deprecated)]
    SetColor,
    #[key(name = "setStrokeColor")]
    SetStrokeColor,
    #[key(name = "setStroke")]
    SetStroke,
    #[key(name = "append")]
    Append,
    #[key(name = "blendMode")]
    BlendMode,
    #[key(name = "width", deprecated)]
    Width,
    #[key(name = "strokeWidth")]
    StrokeWidth,
    #[key(name = "stroke")]
    Stroke,
    #[key(name = "anchorSegments")]
    AnchorSegments,
    #[key(name = "setStrokeVertexColor")]
    SetStrokeVertexColor,
    #[key(name = "strokeVertexCount")]
    StrokeVertexCount,
}

impl LineKey {
    fn method(self) -> Option<&'static str> {
        match self {
            // Old name for the stroke color setter
            Self::SetColor => Some("setStrokeColor"),
            Self::SetStrokeColor | Self::SetStroke | Self::Append | Self::SetStrokeVertexColor => {
                Some(self.name())
            }
            _ => None,
        }
    }
}

pub struct LineVTable;

pub static LINE: LineVTable = LineVTable;

impl LineVTable {
    fn value(&self, access: &mut PropertyAccess<'_>, key: LineKey) -> i32 {
        if let Some(method) = key.method() {
            access.state.push_function(method);
            return 1;
        }
        let Some(line) = access.object().and_then(|o| o.line()) else {
            return 0;
        };

        let value = match key {
            LineKey::BlendMode => line.blend_mode.name().into(),
            LineKey::Width | LineKey::StrokeWidth => line.stroke_width.into(),
            LineKey::Stroke => color_value(line.stroke),
            LineKey::AnchorSegments => line.anchor_segments.into(),
            LineKey::StrokeVertexCount => ScriptValue::Number(line.points.len() as f64),
            _ => return 0,
        };
        access.state.push(value);
        1
    }

    fn set_value(&self, access: &mut PropertyAccess<'_>, key: LineKey, value_index: i32) -> bool {
        if key.method().is_some() || key == LineKey::StrokeVertexCount {
            return true;
        }
        let color = read_color(access.state, value_index);
        let number = access.number(value_index);
        let truthy = access.state.to_bool(value_index);
        let blend = access.state.to_str(value_index).map(str::to_owned);

        let Some(object) = access.object_mut() else {
            return false;
        };
        let Some(line) = object.line_mut() else {
            return false;
        };

        match key {
            LineKey::BlendMode => {
                line.blend_mode = blend.as_deref().and_then(BlendMode::from_name).unwrap_or_else(|| {
                    tracing::warn!("Unknown blend mode {:?}, using normal", blend);
                    BlendMode::Normal
                });
            }
            LineKey::Width | LineKey::StrokeWidth => line.stroke_width = number,
            LineKey::Stroke => match color {
                Some(color) => line.stroke = color,
                None => tracing::warn!("line.stroke expects a color"),
            },
            LineKey::AnchorSegments => line.anchor_segments = truthy,
            _ => return false,
        }
        object.invalidate();
        true
    }
}

impl ProxyVTable for LineVTable {
    fn name(&self) -> &'static str {
        "LineObject"
    }

    fn parent(&self) -> Option<&'static dyn ProxyVTable> {
        Some(&DISPLAY)
    }

    fn value_for_key(&self, access: &mut PropertyAccess<'_>, key: &str) -> i32 {
        match LineKey::lookup(key) {
            Some(line) => {
                let pushed = self.value(access, line);
                if pushed > 0 {
                    return pushed;
                }
            }
            None if key == PROPERTIES_KEY => {
                return introspect::extend::<LineKey>(self, &DISPLAY, access);
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
        if let Some(line) = LineKey::lookup(key) {
            if self.set_value(access, line, value_index) {
                return true;
            }
        }
        DISPLAY.set_value_for_key(access, key, value_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::tests::{get, set};
    use crate::scene::{Color, KindData, LineData, ObjectId, Scene};
    use stagehook_engine::{MemoryState, NativeFunction};
    use stagehook_sdk::ObjectKind;

    fn line(scene: &mut Scene) -> ObjectId {
        let id = scene.create(
            ObjectKind::Line,
            KindData::Line(LineData {
                points: vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)],
                stroke: Color::WHITE,
                stroke_width: 1.0,
                blend_mode: BlendMode::Normal,
                anchor_segments: false,
                vertex_colors: Vec::new(),
            }),
        );
        let stage = scene.stage();
        scene.insert(stage, None, id);
        id
    }

    #[test]
    fn test_deprecated_set_color_alias() {
        let mut scene = Scene::new();
        let mut state = MemoryState::new();
        let id = line(&mut scene);

        assert_eq!(
            get(&mut scene, &mut state, id, "setColor"),
            ScriptValue::Function(NativeFunction::new("setStrokeColor"))
        );
        assert!(!LineKey::visible().contains(&LineKey::SetColor));
    }

    #[test]
    fn test_width_alias_shadows_geometry() {
        let mut scene = Scene::new();
        let mut state = MemoryState::new();
        let id = line(&mut scene);

        assert!(set(&mut scene, &mut state, id, "width", ScriptValue::Number(4.0)));
        assert_eq!(get(&mut scene, &mut state, id, "strokeWidth"), ScriptValue::Number(4.0));
        assert_eq!(scene.get(id).unwrap().transform.x_scale, 1.0);
    }

    #[test]
    fn test_vertex_count_is_read_only() {
        let mut scene = Scene::new();
        let mut state = MemoryState::new();
        let id = line(&mut scene);

        assert_eq!(get(&mut scene, &mut state, id, "strokeVertexCount"), ScriptValue::Number(3.0));
        assert!(set(&mut scene, &mut state, id, "strokeVertexCount", ScriptValue::Number(9.0)));
        assert_eq!(scene.get(id).unwrap().line().unwrap().points.len(), 3);
    }

    #[test]
    fn test_stroke_and_anchor_segments() {
        let mut scene = Scene::new();
        let mut state = MemoryState::new();
        let id = line(&mut scene);

        assert!(set(&mut scene, &mut state, id, "stroke", ScriptValue::Number(0.0)));
        assert!(set(&mut scene, &mut state, id, "anchorSegments", true.into()));
        let data = scene.get(id).unwrap().line().unwrap();
        assert_eq!(data.stroke, Color::BLACK);
        assert!(data.anchor_segments);
        assert_eq!(get(&mut scene, &mut state, id, "_type"), ScriptValue::from("LineObject"));
    }
}
