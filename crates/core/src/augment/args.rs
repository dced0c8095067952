//! Constructor arguments read from the script stack

use stagehook_engine::{ScriptError, ScriptState, ScriptValue};
use stagehook_sdk::ObjectKind;

use crate::proxy::emitter::EmitterKey;
use crate::proxy::PropertyKeys;
use crate::scene::{
    BlendMode, CanvasMode, Color, EmitterData, GroupData, KindData, LineData, Path, Scene,
    ShapeData, SnapshotData, SpriteData, TextData,
};

/// Kind data plus the initial position
#[derive(Debug)]
pub(crate) struct Constructed {
    pub data: KindData,
    pub x: f32,
    pub y: f32,
}

/// Default font size for text objects
const DEFAULT_FONT_SIZE: f32 = 14.0;

fn number(state: &dyn ScriptState, index: i32) -> Result<f32, ScriptError> {
    state.check_number(index).map(|n| n as f32)
}

fn opt_number(state: &dyn ScriptState, index: i32) -> Result<Option<f32>, ScriptError> {
    match state.get(index) {
        None | Some(ScriptValue::Nil) => Ok(None),
        Some(_) => number(state, index).map(Some),
    }
}

/// Flat `{x1, y1, x2, y2, ...}` array into points
fn vertices(state: &dyn ScriptState, index: i32) -> Result<Vec<(f32, f32)>, ScriptError> {
    let value = state.get(index).ok_or(ScriptError::MissingArgument {
        index,
        expected: "table",
    })?;
    if !matches!(value, ScriptValue::Table(_)) {
        return Err(ScriptError::TypeMismatch {
            index,
            expected: "table",
            found: value.type_name(),
        });
    }

    let coords: Vec<f32> = value
        .array_items()
        .into_iter()
        .filter_map(ScriptValue::as_number)
        .map(|n| n as f32)
        .collect();
    Ok(coords.chunks_exact(2).map(|c| (c[0], c[1])).collect())
}

/// Read the arguments for `kind` starting at stack index `start`
pub(crate) fn read(
    state: &dyn ScriptState,
    scene: &mut Scene,
    kind: ObjectKind,
    start: i32,
) -> Result<Constructed, ScriptError> {
    let arg = |offset: i32| start + offset;
    let shape = |path: Path| KindData::Shape(ShapeData::new(path));

    let constructed = match kind {
        ObjectKind::Circle => Constructed {
            x: number(state, arg(0))?,
            y: number(state, arg(1))?,
            data: shape(Path::Circle {
                radius: number(state, arg(2))?,
            }),
        },
        ObjectKind::Rect => Constructed {
            x: number(state, arg(0))?,
            y: number(state, arg(1))?,
            data: shape(Path::Rect {
                width: number(state, arg(2))?,
                height: number(state, arg(3))?,
            }),
        },
        ObjectKind::RoundedRect => Constructed {
            x: number(state, arg(0))?,
            y: number(state, arg(1))?,
            data: shape(Path::RoundedRect {
                width: number(state, arg(2))?,
                height: number(state, arg(3))?,
                radius: number(state, arg(4))?,
            }),
        },
        ObjectKind::Polygon => Constructed {
            x: number(state, arg(0))?,
            y: number(state, arg(1))?,
            data: shape(Path::Polygon {
                vertices: vertices(state, arg(2))?,
            }),
        },
        ObjectKind::Mesh => Constructed {
            x: number(state, arg(0))?,
            y: number(state, arg(1))?,
            data: shape(Path::Mesh {
                vertices: vertices(state, arg(2))?,
            }),
        },
        ObjectKind::Line => {
            let x = number(state, arg(0))?;
            let y = number(state, arg(1))?;
            let mut points = vec![(0.0, 0.0), (number(state, arg(2))? - x, number(state, arg(3))? - y)];
            let mut i = arg(4);
            while let (Some(px), Some(py)) = (opt_number(state, i)?, opt_number(state, i + 1)?) {
                points.push((px - x, py - y));
                i += 2;
            }
            Constructed {
                x,
                y,
                data: KindData::Line(LineData {
                    points,
                    stroke: Color::WHITE,
                    stroke_width: 1.0,
                    blend_mode: BlendMode::Normal,
                    anchor_segments: false,
                    vertex_colors: Vec::new(),
                }),
            }
        }
        ObjectKind::Image => {
            let file = state.check_str(arg(0))?.to_owned();
            Constructed {
                x: opt_number(state, arg(1))?.unwrap_or(0.0),
                y: opt_number(state, arg(2))?.unwrap_or(0.0),
                data: shape(Path::Image {
                    file,
                    width: 0.0,
                    height: 0.0,
                }),
            }
        }
        ObjectKind::ImageRect => Constructed {
            x: 0.0,
            y: 0.0,
            data: shape(Path::Image {
                file: state.check_str(arg(0))?.to_owned(),
                width: number(state, arg(1))?,
                height: number(state, arg(2))?,
            }),
        },
        ObjectKind::Group => Constructed {
            x: 0.0,
            y: 0.0,
            data: KindData::Group(GroupData::default()),
        },
        ObjectKind::Container => Constructed {
            x: 0.0,
            y: 0.0,
            data: KindData::Group(GroupData {
                children: Vec::new(),
                clip: Some((number(state, arg(0))?, number(state, arg(1))?)),
            }),
        },
        ObjectKind::Snapshot => {
            let width = number(state, arg(0))?;
            let height = number(state, arg(1))?;
            let group = scene.create(ObjectKind::Group, KindData::Group(GroupData::default()));
            Constructed {
                x: 0.0,
                y: 0.0,
                data: KindData::Snapshot(SnapshotData {
                    shape: ShapeData::new(Path::Rect { width, height }),
                    group,
                    clear_color: Color::rgba(0.0, 0.0, 0.0, 0.0),
                    canvas_mode: CanvasMode::Append,
                    invalidated: false,
                }),
            }
        }
        ObjectKind::Sprite => {
            let sheet = state.check_str(arg(0))?.to_owned();
            let width = number(state, arg(1))?;
            let height = number(state, arg(2))?;
            let num_frames = opt_number(state, arg(3))?.map(|n| n.max(1.0) as u32).unwrap_or(1);
            Constructed {
                x: 0.0,
                y: 0.0,
                data: KindData::Sprite(SpriteData {
                    shape: ShapeData::new(Path::Rect { width, height }),
                    sheet,
                    frame: 1,
                    num_frames,
                    time_scale: 1.0,
                    playing: false,
                    sequence: None,
                    use_frame_for_anchors: false,
                }),
            }
        }
        ObjectKind::Text | ObjectKind::EmbossedText => {
            let text = state.check_str(arg(0))?.to_owned();
            let x = number(state, arg(1))?;
            let y = number(state, arg(2))?;
            let (font, size) = match state.get(arg(3)) {
                Some(ScriptValue::String(font)) => (font.clone(), opt_number(state, arg(4))?),
                _ => ("native.systemFont".to_owned(), opt_number(state, arg(3))?),
            };
            let emboss = (kind == ObjectKind::EmbossedText)
                .then_some((Color::WHITE, Color::rgba(0.0, 0.0, 0.0, 0.5)));
            Constructed {
                x,
                y,
                data: KindData::Text(TextData {
                    shape: ShapeData::new(Path::Rect {
                        width: 0.0,
                        height: 0.0,
                    }),
                    text,
                    font,
                    size: size.unwrap_or(DEFAULT_FONT_SIZE),
                    baseline_offset: 0.0,
                    emboss,
                }),
            }
        }
        ObjectKind::Emitter => Constructed {
            x: 0.0,
            y: 0.0,
            data: KindData::Emitter(emitter_params(state, arg(0))),
        },
        ObjectKind::Stage => {
            return Err(ScriptError::TypeMismatch {
                index: start,
                expected: "constructible kind",
                found: "stage",
            })
        }
    };

    Ok(constructed)
}

/// Emitter tuning from an optional table of named values
///
/// Unknown names and non-numeric values are ignored.
fn emitter_params(state: &dyn ScriptState, index: i32) -> EmitterData {
    let mut data = EmitterData::default();
    let Some(ScriptValue::Table(entries)) = state.get(index) else {
        return data;
    };

    for (name, value) in entries {
        let (Some(key), Some(n)) = (EmitterKey::lookup(name), value.as_number()) else {
            continue;
        };
        if let Some(field) = key.field_index() {
            data.fields[field] = n as f32;
        } else if key == EmitterKey::MaxParticles {
            data.max_particles = n.max(0.0) as u32;
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagehook_engine::MemoryState;

    #[test]
    fn test_circle_args() {
        let state = MemoryState::with_stack([10.0, 20.0, 5.0].map(ScriptValue::Number));
        let mut scene = Scene::new();
        let built = read(&state, &mut scene, ObjectKind::Circle, 1).unwrap();
        assert_eq!((built.x, built.y), (10.0, 20.0));
        assert_eq!(built.data, KindData::Shape(ShapeData::new(Path::Circle { radius: 5.0 })));
    }

    #[test]
    fn test_missing_argument() {
        let state = MemoryState::with_stack([ScriptValue::Number(1.0)]);
        let mut scene = Scene::new();
        let err = read(&state, &mut scene, ObjectKind::Rect, 1).unwrap_err();
        assert_eq!(
            err,
            ScriptError::MissingArgument {
                index: 2,
                expected: "number"
            }
        );
    }

    #[test]
    fn test_line_points_are_relative() {
        let state = MemoryState::with_stack([1.0, 1.0, 4.0, 5.0, 7.0, 1.0].map(ScriptValue::Number));
        let mut scene = Scene::new();
        let built = read(&state, &mut scene, ObjectKind::Line, 1).unwrap();
        let KindData::Line(line) = built.data else {
            panic!("expected line data");
        };
        assert_eq!(line.points, vec![(0.0, 0.0), (3.0, 4.0), (6.0, 0.0)]);
    }

    #[test]
    fn test_text_font_is_optional() {
        let state = MemoryState::with_stack([
            ScriptValue::from("hi"),
            ScriptValue::Number(0.0),
            ScriptValue::Number(0.0),
            ScriptValue::Number(24.0),
        ]);
        let mut scene = Scene::new();
        let built = read(&state, &mut scene, ObjectKind::Text, 1).unwrap();
        let KindData::Text(text) = built.data else {
            panic!("expected text data");
        };
        assert_eq!(text.size, 24.0);
        assert_eq!(text.font, "native.systemFont");
    }

    #[test]
    fn test_emitter_table() {
        let state = MemoryState::with_stack([ScriptValue::table([
            ("gravityx", ScriptValue::Number(3.0)),
            ("maxParticles", ScriptValue::Number(64.0)),
            ("bogus", ScriptValue::Number(1.0)),
        ])]);
        let data = emitter_params(&state, 1);
        assert_eq!(data.fields[0], 3.0);
        assert_eq!(data.max_particles, 64);
    }
}
