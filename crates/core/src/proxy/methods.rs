//! Bound methods
//!
//! Method-valued properties push a named native function. Calling it comes
//! back here with the object proxy at stack index 1 and the arguments after
//! it. Lookups go from the most specific kind to the root, mirroring the
//! property chain.

use stagehook_engine::{ScriptError, ScriptState, ScriptValue};
use stagehook_sdk::{Affine, ObjectKind};

use super::emitter::EmitterKey;
use super::{read_color, read_color_args, table_color, PropertyAccess};
use crate::augment::factory;
use crate::scene::{Color, DisplayObject, Mask, ObjectFlags, ObjectId, Scene, Transform};
use crate::PropertyKeys;

/// Stack index of the first argument after self
const FIRST_ARG: i32 = 2;

type MethodResult = Option<Result<i32, ScriptError>>;

/// `Err(None)` marks a name this level does not own
type Step = Result<i32, Option<ScriptError>>;

/// Run the bound method `name` on the object at stack index 1
///
/// Returns the number of values pushed. Bad arguments are logged and the
/// call pushes nothing.
pub fn invoke(scene: &mut Scene, state: &mut dyn ScriptState, name: &str) -> i32 {
    let id = match state.get(1) {
        Some(ScriptValue::Proxy(proxy)) => scene.resolve_proxy(*proxy),
        _ => None,
    };
    let Some(id) = id else {
        tracing::warn!("{}: self is not a live display object", name);
        return 0;
    };
    let Some(kind) = scene.get(id).map(DisplayObject::kind) else {
        return 0;
    };

    let mut access = PropertyAccess::new(scene, state, id);
    let mut result = kind_method(&mut access, kind, name);
    if result.is_none() && kind.is_group() {
        result = group_method(&mut access, name);
    }
    if result.is_none() && access.object().is_some_and(|o| o.shape().is_some()) {
        result = shape_method(&mut access, name);
    }
    if result.is_none() {
        result = display_method(&mut access, name);
    }

    match result {
        Some(Ok(pushed)) => pushed,
        Some(Err(e)) => {
            tracing::warn!("{}.{}: {}", kind, name, e);
            0
        }
        None => {
            tracing::warn!("{} has no method {}", kind, name);
            0
        }
    }
}

fn kind_method(access: &mut PropertyAccess<'_>, kind: ObjectKind, name: &str) -> MethodResult {
    match kind {
        ObjectKind::Line => line_method(access, name),
        ObjectKind::EmbossedText => embossed_text_method(access, name),
        ObjectKind::Sprite => sprite_method(access, name),
        ObjectKind::Snapshot => snapshot_method(access, name),
        ObjectKind::Emitter => emitter_method(access, name),
        ObjectKind::Stage => stage_method(access, name),
        _ => None,
    }
}

fn number_arg(access: &PropertyAccess<'_>, offset: i32) -> Result<f32, ScriptError> {
    access.state.check_number(FIRST_ARG + offset).map(|n| n as f32)
}

fn object_arg(access: &PropertyAccess<'_>, index: i32) -> Result<ObjectId, ScriptError> {
    access.object_at(index).ok_or_else(|| ScriptError::TypeMismatch {
        index,
        expected: "display object",
        found: access.state.type_name_at(index),
    })
}

fn color_arg(access: &PropertyAccess<'_>, index: i32) -> Result<Color, ScriptError> {
    read_color_args(access.state, index).ok_or_else(|| ScriptError::TypeMismatch {
        index,
        expected: "color",
        found: access.state.type_name_at(index),
    })
}

/// Zero-based slot for a one-based script index, `None` below 1
fn slot(index: f64) -> Option<usize> {
    usize::try_from((index as i64).saturating_sub(1)).ok()
}

/// Anchor for a reference point name
fn reference_point(name: &str) -> Option<(f32, f32)> {
    Some(match name {
        "topLeft" => (0.0, 0.0),
        "topCenter" => (0.5, 0.0),
        "topRight" => (1.0, 0.0),
        "centerLeft" => (0.0, 0.5),
        "center" => (0.5, 0.5),
        "centerRight" => (1.0, 0.5),
        "bottomLeft" => (0.0, 1.0),
        "bottomCenter" => (0.5, 1.0),
        "bottomRight" => (1.0, 1.0),
        _ => return None,
    })
}

/// Local-to-content matrix, with transforms brought up to date
fn content_matrix(scene: &mut Scene, id: ObjectId) -> Affine {
    let mut root = id;
    while let Some(parent) = scene.parent_of(root) {
        root = parent;
    }
    scene.update_transform(root, &Affine::IDENTITY);
    scene.get(id).map_or(Affine::IDENTITY, |o| *o.world())
}

fn display_method(access: &mut PropertyAccess<'_>, name: &str) -> MethodResult {
    let id = access.object;
    let result = (|| -> Step {
        match name {
            "translate" => {
                let (dx, dy) = (number_arg(access, 0)?, number_arg(access, 1)?);
                access.scene.translate(id, dx, dy);
            }
            "scale" => {
                let (sx, sy) = (number_arg(access, 0)?, number_arg(access, 1)?);
                access.scene.scale(id, sx, sy);
            }
            "rotate" => {
                let delta = number_arg(access, 0)?;
                access.scene.rotate(id, delta);
            }
            "getParent" => {
                let parent = access.scene.parent_of(id);
                access.push_object(parent);
                return Ok(1);
            }
            "setReferencePoint" => {
                let anchor = match access.state.get(FIRST_ARG) {
                    None | Some(ScriptValue::Nil) => Some((0.5, 0.5)),
                    Some(_) => access.state.to_str(FIRST_ARG).and_then(reference_point),
                };
                match (anchor, access.object_mut()) {
                    (Some(anchor), Some(object)) => {
                        object.anchor = anchor;
                        object.invalidate();
                    }
                    (None, _) => tracing::warn!("Unknown reference point"),
                    (_, None) => {}
                }
            }
            "removeSelf" => {
                factory::release_object(&mut *access.state, &mut *access.scene, id);
            }
            "localToContent" | "contentToLocal" => {
                let (x, y) = (number_arg(access, 0)?, number_arg(access, 1)?);
                let matrix = content_matrix(access.scene, id);
                let matrix = if name == "localToContent" {
                    matrix
                } else {
                    matrix.invert().unwrap_or(Affine::IDENTITY)
                };
                let (x, y) = matrix.apply(x, y);
                access.state.push(x.into());
                access.state.push(y.into());
                return Ok(2);
            }
            "toFront" | "toBack" => {
                if let Some(parent) = access.scene.parent_of(id) {
                    let index = (name == "toBack").then_some(0);
                    access.scene.insert(parent, index, id);
                }
            }
            "setMask" => {
                let mask = match access.state.get(FIRST_ARG) {
                    None | Some(ScriptValue::Nil) => None,
                    Some(_) => Some(Mask {
                        file: access.state.check_str(FIRST_ARG)?.to_owned(),
                        transform: Transform::default(),
                    }),
                };
                if let Some(object) = access.object_mut() {
                    object.mask = mask;
                    object.invalidate();
                }
            }
            "_setHasListener" => {
                access.state.check_str(FIRST_ARG)?;
                let on = access.state.to_bool(FIRST_ARG + 1);
                if let Some(object) = access.object_mut() {
                    object.set_flag(ObjectFlags::HAS_LISTENER, on);
                }
            }
            _ => return Err(None),
        }
        Ok(0)
    })();
    lift(result)
}

fn lift(result: Step) -> MethodResult {
    match result {
        Ok(pushed) => Some(Ok(pushed)),
        Err(Some(e)) => Some(Err(e)),
        Err(None) => None,
    }
}

fn line_method(access: &mut PropertyAccess<'_>, name: &str) -> MethodResult {
    let result = (|| -> Step {
        match name {
            "setStrokeColor" | "setColor" => {
                let color = color_arg(access, FIRST_ARG)?;
                if let Some(line) = access.object_mut().and_then(DisplayObject::line_mut) {
                    line.stroke = color;
                }
            }
            "setStroke" => {
                let color = read_color(access.state, FIRST_ARG).ok_or_else(|| {
                    ScriptError::TypeMismatch {
                        index: FIRST_ARG,
                        expected: "paint",
                        found: access.state.type_name_at(FIRST_ARG),
                    }
                })?;
                if let Some(line) = access.object_mut().and_then(DisplayObject::line_mut) {
                    line.stroke = color;
                }
            }
            "append" => {
                let mut coords = Vec::new();
                let mut index = FIRST_ARG;
                while let Some(n) = access.state.to_number(index) {
                    coords.push(n as f32);
                    index += 1;
                }
                if coords.len() < 2 {
                    return Err(Some(ScriptError::MissingArgument {
                        index,
                        expected: "number",
                    }));
                }
                let Some(object) = access.object_mut() else {
                    return Ok(0);
                };
                // Points are stored relative to the line's origin
                let (ox, oy) = (object.transform.x, object.transform.y);
                if let Some(line) = object.line_mut() {
                    line.points
                        .extend(coords.chunks_exact(2).map(|c| (c[0] - ox, c[1] - oy)));
                }
                object.invalidate();
            }
            "setStrokeVertexColor" => {
                let index = access.state.check_number(FIRST_ARG)?;
                let color = color_arg(access, FIRST_ARG + 1)?;
                let Some(line) = access.object_mut().and_then(DisplayObject::line_mut) else {
                    return Ok(0);
                };
                let Some(slot) = slot(index).filter(|&i| i < line.points.len()) else {
                    tracing::warn!("Vertex index {} out of range", index);
                    return Ok(0);
                };
                let fill = line.stroke;
                line.vertex_colors.resize(line.points.len(), fill);
                line.vertex_colors[slot] = color;
            }
            _ => return Err(None),
        }
        Ok(0)
    })();
    lift(result)
}

fn shape_method(access: &mut PropertyAccess<'_>, name: &str) -> MethodResult {
    let fill = match name {
        "setFillColor" | "setTextColor" => true,
        "setStrokeColor" => false,
        _ => return None,
    };
    let color = match color_arg(access, FIRST_ARG) {
        Ok(color) => color,
        Err(e) => return Some(Err(e)),
    };
    if let Some(object) = access.object_mut() {
        if let Some(shape) = object.shape_mut() {
            if fill {
                shape.fill = Some(color);
            } else {
                shape.stroke = Some(color);
            }
        }
        object.invalidate();
    }
    Some(Ok(0))
}

fn embossed_text_method(access: &mut PropertyAccess<'_>, name: &str) -> MethodResult {
    let result = (|| -> Step {
        match name {
            "setText" => {
                let text = access.state.check_str(FIRST_ARG)?.to_owned();
                if let Some(data) = access.object_mut().and_then(DisplayObject::text_mut) {
                    data.text = text;
                }
            }
            "setSize" => {
                let size = number_arg(access, 0)?;
                if let Some(data) = access.object_mut().and_then(DisplayObject::text_mut) {
                    data.size = size;
                }
            }
            "setEmbossColor" => {
                let Some(value @ ScriptValue::Table(_)) = access.state.get(FIRST_ARG) else {
                    return Err(Some(ScriptError::TypeMismatch {
                        index: FIRST_ARG,
                        expected: "table",
                        found: access.state.type_name_at(FIRST_ARG),
                    }));
                };
                let highlight = value.field("highlight").and_then(table_color);
                let shadow = value.field("shadow").and_then(table_color);
                if let Some(data) = access.object_mut().and_then(DisplayObject::text_mut) {
                    let (old_highlight, old_shadow) =
                        data.emboss.unwrap_or((Color::WHITE, Color::BLACK));
                    data.emboss = Some((
                        highlight.unwrap_or(old_highlight),
                        shadow.unwrap_or(old_shadow),
                    ));
                }
            }
            _ => return Err(None),
        }
        if let Some(object) = access.object_mut() {
            object.invalidate();
        }
        Ok(0)
    })();
    lift(result)
}

fn sprite_method(access: &mut PropertyAccess<'_>, name: &str) -> MethodResult {
    let result = (|| -> Step {
        let sequence = match name {
            "setSequence" => Some(access.state.to_str(FIRST_ARG).map(str::to_owned)),
            _ => None,
        };
        let frame = match name {
            "setFrame" => Some(access.state.check_number(FIRST_ARG)?),
            _ => None,
        };
        let use_frame = access
            .state
            .get(FIRST_ARG)
            .map_or(true, ScriptValue::is_truthy);

        let Some(sprite) = access.object_mut().and_then(DisplayObject::sprite_mut) else {
            return Ok(0);
        };
        match name {
            "play" => sprite.playing = true,
            "pause" => sprite.playing = false,
            "setSequence" => {
                sprite.sequence = sequence.flatten();
                sprite.frame = 1;
            }
            "setFrame" => {
                let frame = frame.unwrap_or(1.0) as i64;
                sprite.frame = frame.clamp(1, sprite.num_frames.max(1) as i64) as u32;
            }
            "useFrameForAnchors" => sprite.use_frame_for_anchors = use_frame,
            _ => return Err(None),
        }
        Ok(0)
    })();
    lift(result)
}

fn snapshot_method(access: &mut PropertyAccess<'_>, name: &str) -> MethodResult {
    if name != "invalidate" {
        return None;
    }
    if let Some(object) = access.object_mut() {
        if let Some(snapshot) = object.snapshot_mut() {
            snapshot.invalidated = true;
        }
        object.invalidate();
    }
    Some(Ok(0))
}

fn group_method(access: &mut PropertyAccess<'_>, name: &str) -> MethodResult {
    let id = access.object;
    let result = (|| -> Step {
        match name {
            "insert" => {
                let (index, child) = match access.state.to_number(FIRST_ARG) {
                    Some(n) => (Some(slot(n).unwrap_or(0)), object_arg(access, FIRST_ARG + 1)?),
                    None => (None, object_arg(access, FIRST_ARG)?),
                };
                access.scene.insert(id, index, child);
                Ok(0)
            }
            "remove" => {
                let child = match access.state.to_number(FIRST_ARG) {
                    Some(n) => slot(n).and_then(|i| access.scene.children(id).get(i).copied()),
                    None => Some(object_arg(access, FIRST_ARG)?)
                        .filter(|&child| access.scene.parent_of(child) == Some(id)),
                };
                match child {
                    Some(child) if access.scene.detach(child) => {
                        access.push_object(Some(child));
                        Ok(1)
                    }
                    _ => Ok(0),
                }
            }
            _ => Err(None),
        }
    })();
    lift(result)
}

fn stage_method(access: &mut PropertyAccess<'_>, name: &str) -> MethodResult {
    if name != "setFocus" {
        return None;
    }
    let focus = match access.state.get(FIRST_ARG) {
        None | Some(ScriptValue::Nil) => None,
        Some(_) => match object_arg(access, FIRST_ARG) {
            Ok(id) => Some(id),
            Err(e) => return Some(Err(e)),
        },
    };
    access.scene.set_focus(focus);
    Some(Ok(0))
}

fn emitter_method(access: &mut PropertyAccess<'_>, name: &str) -> MethodResult {
    let method = EmitterKey::lookup(name)
        .filter(|k| matches!(k, EmitterKey::Start | EmitterKey::Stop | EmitterKey::Pause))?;
    if let Some(emitter) = access.object_mut().and_then(DisplayObject::emitter_mut) {
        emitter.state = emitter.state.after(method);
    }
    Some(Ok(0))
}
