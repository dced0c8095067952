//! Plain behaviors of every interceptable operation
//!
//! These are what an augmentation's hooks run before, instead of, or after.
//! Sub-steps that are themselves interceptable (a group drawing its children,
//! a transform update reporting the new matrix) go back through the scene's
//! dispatching methods so nested hooks fire.

use super::{DisplayObject, DrawCommand, ObjectFlags, ObjectId, Renderer, Scene};
use stagehook_sdk::{Affine, Rect};

/// Opacity after multiplying in every ancestor, `0..=255`
pub fn accumulated_alpha(scene: &Scene, id: ObjectId) -> u8 {
    let mut alpha = 255u32;
    let mut current = Some(id);
    while let Some(node) = current {
        let Some(object) = scene.get(node) else { break };
        alpha = alpha * object.alpha as u32 / 255;
        current = object.parent();
    }
    alpha as u8
}

pub fn draw(scene: &mut Scene, id: ObjectId, renderer: &mut dyn Renderer) {
    let Some(object) = scene.get(id) else { return };
    if !object.is_visible() || object.alpha == 0 {
        return;
    }

    if object.is_group() {
        let children = object.children().to_vec();
        for child in children {
            scene.draw(child, renderer);
        }
        return;
    }

    let kind = object.kind();
    let world = *object.world();
    let bounds = scene.get_self_bounds(id);
    renderer.submit(DrawCommand {
        object: id,
        kind,
        world,
        bounds,
        alpha: accumulated_alpha(scene, id),
    });
}

/// Groups are never culled as a whole
pub fn can_cull(scene: &Scene, id: ObjectId) -> bool {
    scene.get(id).is_some_and(|o| !o.is_group())
}

pub fn can_hit_test(scene: &Scene, id: ObjectId) -> bool {
    scene
        .get(id)
        .is_some_and(|o| o.flags.intersects(ObjectFlags::VISIBLE | ObjectFlags::HIT_TESTABLE))
}

/// Content-space point test; a group hits when any child does
pub fn hit_test(scene: &mut Scene, id: ObjectId, x: f32, y: f32) -> bool {
    let Some(object) = scene.get(id) else { return false };

    if object.is_group() {
        let children = object.children().to_vec();
        return children
            .into_iter()
            .rev()
            .any(|child| scene.can_hit_test(child) && scene.hit_test(child, x, y));
    }

    scene.content_bounds(id).contains(x, y)
}

/// Local matrix, offset so the anchor point lands on the object's position
fn local_matrix(object: &DisplayObject, anchor_bounds: &Rect) -> Affine {
    let local = object.transform.matrix();
    let anchored = !object.is_group() || object.flags.contains(ObjectFlags::ANCHOR_CHILDREN);
    if !anchored || anchor_bounds.is_empty() {
        return local;
    }
    let ax = anchor_bounds.x_min + object.anchor.0 * anchor_bounds.width();
    let ay = anchor_bounds.y_min + object.anchor.1 * anchor_bounds.height();
    local.concat(&Affine::from_parts(-ax, -ay, 0.0, 1.0, 1.0))
}

/// Recompute the world transform; `true` when it changed
pub fn update_transform(scene: &mut Scene, id: ObjectId, parent: &Affine) -> bool {
    let anchor_bounds = scene.get_self_bounds_for_anchor(id);
    let Some(object) = scene.get(id) else { return false };

    let mut world = parent.concat(&local_matrix(object, &anchor_bounds));
    let mut changed = object.flags.contains(ObjectFlags::TRANSFORM_DIRTY) || world != object.world;

    if changed {
        scene.did_update_transform(id, &mut world);
        if let Some(object) = scene.get_mut(id) {
            object.world = world;
            object.flags.remove(ObjectFlags::TRANSFORM_DIRTY);
            object.flags.insert(ObjectFlags::BOUNDS_DIRTY);
        }
    }

    for child in scene.children(id).to_vec() {
        changed |= scene.update_transform(child, &world);
    }

    changed
}

pub fn did_update_transform(scene: &mut Scene, id: ObjectId, _matrix: &mut Affine) {
    if let Some(object) = scene.get_mut(id) {
        object.flags.insert(ObjectFlags::BOUNDS_DIRTY);
    }
}

/// Local extent of the object's own content
pub fn get_self_bounds(scene: &mut Scene, id: ObjectId) -> Rect {
    use super::KindData;

    let Some(object) = scene.get(id) else { return Rect::EMPTY };

    match &object.data {
        KindData::Shape(shape) => shape.path.bounds(),
        KindData::Sprite(sprite) => sprite.shape.path.bounds(),
        KindData::Snapshot(snapshot) => snapshot.shape.path.bounds(),
        KindData::Text(text) => {
            let (width, height) = text.measure();
            Rect::centered(width, height)
        }
        KindData::Line(line) => {
            let mut bounds = Rect::EMPTY;
            for &(x, y) in &line.points {
                bounds.include(x, y);
            }
            if !bounds.is_empty() {
                let half = line.stroke_width * 0.5;
                bounds = Rect::new(
                    bounds.x_min - half,
                    bounds.y_min - half,
                    bounds.x_max + half,
                    bounds.y_max + half,
                );
            }
            bounds
        }
        KindData::Group(group) => {
            if let Some((width, height)) = group.clip {
                return Rect::centered(width, height);
            }
            let children = group.children.clone();
            let mut bounds = Rect::EMPTY;
            for child in children {
                let child_bounds = scene.get_self_bounds(child);
                if let Some(child) = scene.get(child) {
                    bounds.union(&child_bounds.transformed(&child.transform.matrix()));
                }
            }
            bounds
        }
        KindData::Emitter(_) => Rect::point(0.0, 0.0),
    }
}

/// Bounds the anchor is measured against
///
/// Lines anchor on their first point unless `anchorSegments` is set; groups
/// only anchor when `anchorChildren` is set.
pub fn get_self_bounds_for_anchor(scene: &mut Scene, id: ObjectId) -> Rect {
    let Some(object) = scene.get(id) else { return Rect::EMPTY };

    if let Some(line) = object.line() {
        if !line.anchor_segments {
            return Rect::EMPTY;
        }
    }
    if object.is_group() && !object.flags.contains(ObjectFlags::ANCHOR_CHILDREN) {
        return Rect::EMPTY;
    }
    scene.get_self_bounds(id)
}

/// Cache stage bounds for the coming draw
pub fn prepare(scene: &mut Scene, id: ObjectId) {
    for child in scene.children(id).to_vec() {
        scene.prepare(child);
    }

    let Some(object) = scene.get(id) else { return };
    let bounds = if object.flags.contains(ObjectFlags::DUMMY_STAGE_BOUNDS) {
        let (x, y) = object.world().apply(0.0, 0.0);
        Rect::point(x, y)
    } else {
        scene.content_bounds(id)
    };

    if let Some(object) = scene.get_mut(id) {
        object.stage_bounds = bounds;
        object.flags.remove(ObjectFlags::BOUNDS_DIRTY);
    }
}

pub fn will_move_onscreen(scene: &mut Scene, id: ObjectId) {
    if let Some(object) = scene.get_mut(id) {
        object.flags.insert(ObjectFlags::ONSCREEN);
    }
}

pub fn did_move_offscreen(scene: &mut Scene, id: ObjectId) {
    if let Some(object) = scene.get_mut(id) {
        object.flags.remove(ObjectFlags::ONSCREEN);
    }
}

pub fn added_to_parent(scene: &mut Scene, id: ObjectId, parent: ObjectId) {
    if let Some(object) = scene.get_mut(id) {
        object.parent = Some(parent);
        object.invalidate();
    }
}

pub fn removed_from_parent(scene: &mut Scene, id: ObjectId, parent: ObjectId) {
    if let Some(object) = scene.get_mut(id) {
        if object.parent == Some(parent) {
            object.parent = None;
        }
        object.flags.remove(ObjectFlags::ONSCREEN);
        object.invalidate();
    }
}

pub fn rotate(scene: &mut Scene, id: ObjectId, delta: f32) {
    if let Some(object) = scene.get_mut(id) {
        object.transform.rotation += delta;
        object.invalidate();
    }
}

pub fn scale(scene: &mut Scene, id: ObjectId, sx: f32, sy: f32) {
    if let Some(object) = scene.get_mut(id) {
        object.transform.x_scale *= sx;
        object.transform.y_scale *= sy;
        object.invalidate();
    }
}

pub fn translate(scene: &mut Scene, id: ObjectId, dx: f32, dy: f32) {
    if let Some(object) = scene.get_mut(id) {
        object.transform.x += dx;
        object.transform.y += dy;
        object.invalidate();
    }
}

pub fn did_insert(scene: &mut Scene, group: ObjectId, _child_parent_changed: bool) {
    if let Some(object) = scene.get_mut(group) {
        object.flags.insert(ObjectFlags::BOUNDS_DIRTY);
    }
}

pub fn did_remove(scene: &mut Scene, group: ObjectId) {
    if let Some(object) = scene.get_mut(group) {
        object.flags.insert(ObjectFlags::BOUNDS_DIRTY);
    }
}

/// Release children depth-first, detach, and drop the object
pub fn finalize(scene: &mut Scene, id: ObjectId) {
    for child in scene.children(id).to_vec() {
        scene.remove_self(child);
    }
    if let Some(owned) = scene.get(id).and_then(DisplayObject::owned_group) {
        scene.remove_self(owned);
    }
    if let Some(parent) = scene.parent_of(id) {
        if let Some(group) = scene.get_mut(parent).and_then(DisplayObject::group_mut) {
            group.children.retain(|&c| c != id);
        }
    }
    if scene.release(id).is_some() {
        tracing::trace!("Released {:?}", id);
    }
}
