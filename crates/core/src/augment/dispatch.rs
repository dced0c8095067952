//! Interceptable scene operations
//!
//! Each method looks up its hook parameters in the object's method stream.
//! Objects without an augmentation, and streams without hooks for the
//! method, go straight to [`base`]. Otherwise a [`HookContext`] is opened for
//! the duration of the call and the family's protocol runs around [`base`].

use std::sync::Arc;

use crate::hooks::{run_bookended, run_early_out, HookContext};
use crate::scene::{base, DisplayObject, KindData, ObjectId, Renderer, Scene};
use crate::stream::{
    BasicParams, BooleanResultMatrixParams, BooleanResultParams, BooleanResultPointParams,
    DidInsertParams, DrawParams, GroupBasicParams, HookPayload, MatrixParams, MethodStream,
    OnCreateParams, OnFinalizeParams, OnMessageParams, ParentParams, RectResultParams,
    RotateParams, ScaleParams, TranslateParams,
};
use stagehook_sdk::{Affine, AugmentedMethod, ObjectKind, Rect, TypeTag, UserData};

use super::AugmentationState;

impl Scene {
    /// Non-empty hook parameters for `method` on `id`
    pub(crate) fn hooks<P: HookPayload>(&self, id: ObjectId, method: AugmentedMethod) -> Option<(P, UserData)> {
        let state = self.get(id)?.augmentation()?;
        let params: P = state.params(method);
        (params != P::default()).then_some((params, state.user_data()))
    }

    /// Create a detached object that runs the given stream's hooks
    ///
    /// The `OnCreate` action runs before this returns and may replace the
    /// stored user data.
    pub fn create_augmented(
        &mut self,
        kind: ObjectKind,
        data: KindData,
        stream: Arc<MethodStream>,
        user_data: UserData,
    ) -> ObjectId {
        let id = self.create(kind, data);
        if let Some(object) = self.get_mut(id) {
            object.augmentation = Some(AugmentationState::new(stream, user_data));
        }
        self.on_create(id);
        tracing::debug!("Created augmented {} {:?}", kind, id);
        id
    }

    fn on_create(&mut self, id: ObjectId) {
        let Some((params, user_data)) = self.hooks::<OnCreateParams>(id, AugmentedMethod::OnCreate)
        else {
            return;
        };
        let Some(action) = params.action else { return };

        let mut replaced = user_data;
        {
            let mut ctx = HookContext::open(self, id, user_data);
            action(&mut ctx, &mut replaced);
        }
        if let Some(state) = self.get_mut(id).and_then(|o| o.augmentation.as_mut()) {
            state.set_user_data(replaced);
        }
    }

    pub fn draw(&mut self, id: ObjectId, renderer: &mut dyn Renderer) {
        let Some((params, user_data)) = self.hooks::<DrawParams>(id, AugmentedMethod::Draw) else {
            return base::draw(self, id, renderer);
        };

        let (mut ctx, target) = HookContext::open(self, id, user_data).with_renderer(renderer);
        run_bookended(
            &mut ctx,
            params.before,
            params.after,
            params.ignore_original,
            |ctx, hook| hook(ctx, target),
            |ctx| {
                if let (scene, Some(renderer)) = ctx.draw_parts() {
                    base::draw(scene, id, renderer);
                }
            },
        );
    }

    fn boolean_result(
        &mut self,
        id: ObjectId,
        method: AugmentedMethod,
        original: fn(&Scene, ObjectId) -> bool,
    ) -> bool {
        let Some((params, user_data)) = self.hooks::<BooleanResultParams>(id, method) else {
            return original(self, id);
        };

        let mut ctx = HookContext::open(self, id, user_data);
        run_early_out(
            &mut ctx,
            params.before,
            params.after,
            params.ignore_original,
            params.early_out(),
            false,
            |ctx, hook, result| hook(ctx, result),
            |ctx, _| original(ctx.scene(), id),
        )
    }

    pub fn can_cull(&mut self, id: ObjectId) -> bool {
        self.boolean_result(id, AugmentedMethod::CanCull, base::can_cull)
    }

    pub fn can_hit_test(&mut self, id: ObjectId) -> bool {
        self.boolean_result(id, AugmentedMethod::CanHitTest, base::can_hit_test)
    }

    /// Whether a content-space point hits the object
    pub fn hit_test(&mut self, id: ObjectId, x: f32, y: f32) -> bool {
        let Some((params, user_data)) =
            self.hooks::<BooleanResultPointParams>(id, AugmentedMethod::HitTest)
        else {
            return base::hit_test(self, id, x, y);
        };

        let mut ctx = HookContext::open(self, id, user_data);
        run_early_out(
            &mut ctx,
            params.before,
            params.after,
            params.ignore_original,
            params.early_out(),
            false,
            |ctx, hook, result| hook(ctx, x, y, result),
            |ctx, _| base::hit_test(ctx.scene_mut(), id, x, y),
        )
    }

    /// Recompute the world transform under `parent`; `true` when it changed
    pub fn update_transform(&mut self, id: ObjectId, parent: &Affine) -> bool {
        let Some((params, user_data)) =
            self.hooks::<BooleanResultMatrixParams>(id, AugmentedMethod::UpdateTransform)
        else {
            return base::update_transform(self, id, parent);
        };

        let flat = parent.to_flat();
        let mut ctx = HookContext::open(self, id, user_data);
        run_early_out(
            &mut ctx,
            params.before,
            params.after,
            params.ignore_original,
            params.early_out(),
            false,
            |ctx, hook, result| hook(ctx, &flat, result),
            |ctx, _| base::update_transform(ctx.scene_mut(), id, parent),
        )
    }

    /// Report a new world matrix; hooks may rewrite it
    pub fn did_update_transform(&mut self, id: ObjectId, matrix: &mut Affine) {
        let Some((params, user_data)) =
            self.hooks::<MatrixParams>(id, AugmentedMethod::DidUpdateTransform)
        else {
            return base::did_update_transform(self, id, matrix);
        };

        let mut env = (HookContext::open(self, id, user_data), matrix);
        run_bookended(
            &mut env,
            params.before,
            params.after,
            params.ignore_original,
            |env, hook| {
                let (ctx, matrix) = env;
                let mut flat = matrix.to_flat();
                hook(ctx, &mut flat);
                **matrix = Affine::from_flat(&flat);
            },
            |env| {
                let (ctx, matrix) = env;
                base::did_update_transform(ctx.scene_mut(), id, matrix);
            },
        );
    }

    fn rect_result(
        &mut self,
        id: ObjectId,
        method: AugmentedMethod,
        original: fn(&mut Scene, ObjectId) -> Rect,
    ) -> Rect {
        let Some((params, user_data)) = self.hooks::<RectResultParams>(id, method) else {
            return original(self, id);
        };

        let mut env = (HookContext::open(self, id, user_data), Rect::EMPTY);
        run_bookended(
            &mut env,
            params.before,
            params.after,
            params.ignore_original,
            |env, hook| {
                let (ctx, r) = env;
                hook(ctx, &mut r.x_min, &mut r.y_min, &mut r.x_max, &mut r.y_max);
            },
            |env| {
                let (ctx, r) = env;
                *r = original(ctx.scene_mut(), id);
            },
        );
        env.1
    }

    /// Local extent of the object's own content
    pub fn get_self_bounds(&mut self, id: ObjectId) -> Rect {
        self.rect_result(id, AugmentedMethod::GetSelfBounds, base::get_self_bounds)
    }

    pub fn get_self_bounds_for_anchor(&mut self, id: ObjectId) -> Rect {
        self.rect_result(
            id,
            AugmentedMethod::GetSelfBoundsForAnchor,
            base::get_self_bounds_for_anchor,
        )
    }

    /// Self bounds mapped through the current world transform
    pub fn content_bounds(&mut self, id: ObjectId) -> Rect {
        let bounds = self.get_self_bounds(id);
        match self.get(id) {
            Some(object) => bounds.transformed(object.world()),
            None => Rect::EMPTY,
        }
    }

    fn basic<P>(&mut self, id: ObjectId, method: AugmentedMethod, original: fn(&mut Scene, ObjectId))
    where
        P: HookPayload + Into<BasicParams>,
    {
        let Some((params, user_data)) = self.hooks::<P>(id, method) else {
            return original(self, id);
        };
        let params: BasicParams = params.into();

        let mut ctx = HookContext::open(self, id, user_data);
        run_bookended(
            &mut ctx,
            params.before,
            params.after,
            params.ignore_original,
            |ctx, hook| hook(ctx),
            |ctx| original(ctx.scene_mut(), id),
        );
    }

    /// Cache stage bounds before drawing
    pub fn prepare(&mut self, id: ObjectId) {
        self.basic::<BasicParams>(id, AugmentedMethod::Prepare, base::prepare);
    }

    pub fn will_move_onscreen(&mut self, id: ObjectId) {
        self.basic::<BasicParams>(id, AugmentedMethod::WillMoveOnscreen, base::will_move_onscreen);
    }

    pub fn did_move_offscreen(&mut self, id: ObjectId) {
        self.basic::<BasicParams>(id, AugmentedMethod::DidMoveOffscreen, base::did_move_offscreen);
    }

    /// Notify a group that a child left it
    pub fn did_remove(&mut self, group: ObjectId) {
        self.basic::<GroupBasicParams>(group, AugmentedMethod::DidRemove, base::did_remove);
    }

    fn parent_event(
        &mut self,
        id: ObjectId,
        parent: ObjectId,
        method: AugmentedMethod,
        original: fn(&mut Scene, ObjectId, ObjectId),
    ) {
        let Some((params, user_data)) = self.hooks::<ParentParams>(id, method) else {
            return original(self, id, parent);
        };

        let mut ctx = HookContext::open(self, id, user_data);
        let parent_handle = ctx.store(parent, TypeTag::GroupObject);
        run_bookended(
            &mut ctx,
            params.before,
            params.after,
            params.ignore_original,
            |ctx, hook| hook(ctx, parent_handle),
            |ctx| original(ctx.scene_mut(), id, parent),
        );
    }

    pub fn added_to_parent(&mut self, id: ObjectId, parent: ObjectId) {
        self.parent_event(id, parent, AugmentedMethod::AddedToParent, base::added_to_parent);
    }

    pub fn removed_from_parent(&mut self, id: ObjectId, parent: ObjectId) {
        self.parent_event(id, parent, AugmentedMethod::RemovedFromParent, base::removed_from_parent);
    }

    /// Rotate by `delta` degrees
    pub fn rotate(&mut self, id: ObjectId, delta: f32) {
        let Some((params, user_data)) = self.hooks::<RotateParams>(id, AugmentedMethod::Rotate)
        else {
            return base::rotate(self, id, delta);
        };

        let mut ctx = HookContext::open(self, id, user_data);
        run_bookended(
            &mut ctx,
            params.before,
            params.after,
            params.ignore_original,
            |ctx, hook| hook(ctx, delta),
            |ctx| base::rotate(ctx.scene_mut(), id, delta),
        );
    }

    /// Multiply the current scale
    pub fn scale(&mut self, id: ObjectId, sx: f32, sy: f32) {
        let Some((params, user_data)) = self.hooks::<ScaleParams>(id, AugmentedMethod::Scale) else {
            return base::scale(self, id, sx, sy);
        };

        let mut ctx = HookContext::open(self, id, user_data);
        run_bookended(
            &mut ctx,
            params.before,
            params.after,
            params.ignore_original,
            |ctx, hook| hook(ctx, sx, sy),
            |ctx| base::scale(ctx.scene_mut(), id, sx, sy),
        );
    }

    pub fn translate(&mut self, id: ObjectId, dx: f32, dy: f32) {
        let Some((params, user_data)) =
            self.hooks::<TranslateParams>(id, AugmentedMethod::Translate)
        else {
            return base::translate(self, id, dx, dy);
        };

        let mut ctx = HookContext::open(self, id, user_data);
        run_bookended(
            &mut ctx,
            params.before,
            params.after,
            params.ignore_original,
            |ctx, hook| hook(ctx, dx, dy),
            |ctx| base::translate(ctx.scene_mut(), id, dx, dy),
        );
    }

    /// Notify a group that a child was inserted
    pub fn did_insert(&mut self, group: ObjectId, child_parent_changed: bool) {
        let Some((params, user_data)) =
            self.hooks::<DidInsertParams>(group, AugmentedMethod::DidInsert)
        else {
            return base::did_insert(self, group, child_parent_changed);
        };

        let mut ctx = HookContext::open(self, group, user_data);
        run_bookended(
            &mut ctx,
            params.before,
            params.after,
            params.ignore_original,
            |ctx, hook| hook(ctx, child_parent_changed),
            |ctx| base::did_insert(ctx.scene_mut(), group, child_parent_changed),
        );
    }

    /// Deliver a named binary message
    ///
    /// Returns `true` only when the object has an `OnMessage` action.
    pub fn send_message(&mut self, id: ObjectId, name: &str, payload: &[u8]) -> bool {
        let Some((params, user_data)) =
            self.hooks::<OnMessageParams>(id, AugmentedMethod::OnMessage)
        else {
            return false;
        };
        let Some(action) = params.action else { return false };

        let mut ctx = HookContext::open(self, id, user_data);
        action(&mut ctx, name, payload);
        true
    }

    /// Insert `child` into `group` at `index` (end when `None`)
    ///
    /// A child that already has another parent is removed from it first.
    /// Returns `false` when the insert is not possible: unknown objects, a
    /// non-group target, the stage as child, or a cycle.
    pub fn insert(&mut self, group: ObjectId, index: Option<usize>, child: ObjectId) -> bool {
        if !self.get(group).is_some_and(DisplayObject::is_group)
            || !self.contains(child)
            || child == self.stage()
            || self.is_ancestor(child, group)
        {
            tracing::warn!("Cannot insert {:?} into {:?}", child, group);
            return false;
        }

        let previous = self.parent_of(child);
        let changed = previous != Some(group);
        if changed && previous.is_some() {
            self.detach(child);
        } else if let Some(data) = self.get_mut(group).and_then(DisplayObject::group_mut) {
            data.children.retain(|&c| c != child);
        }

        let Some(data) = self.get_mut(group).and_then(DisplayObject::group_mut) else {
            return false;
        };
        let at = index.unwrap_or(data.children.len()).min(data.children.len());
        data.children.insert(at, child);

        if changed {
            self.added_to_parent(child, group);
        }
        self.did_insert(group, changed);
        true
    }

    /// Remove an object from its parent group, keeping it alive
    pub fn detach(&mut self, child: ObjectId) -> bool {
        let Some(parent) = self.parent_of(child) else { return false };
        if let Some(data) = self.get_mut(parent).and_then(DisplayObject::group_mut) {
            data.children.retain(|&c| c != child);
        }
        self.removed_from_parent(child, parent);
        self.did_remove(parent);
        true
    }

    /// Finalize and release an object and everything under it
    pub fn remove_self(&mut self, id: ObjectId) {
        if id == self.stage() || !self.contains(id) {
            return;
        }

        if let Some((params, user_data)) =
            self.hooks::<OnFinalizeParams>(id, AugmentedMethod::OnFinalize)
        {
            if let Some(action) = params.action {
                let mut ctx = HookContext::open(self, id, user_data);
                action(&mut ctx);
            }
        }

        if self.parent_of(id).is_some() {
            self.detach(id);
        }
        base::finalize(self, id);
    }
}

impl From<GroupBasicParams> for BasicParams {
    fn from(params: GroupBasicParams) -> Self {
        Self {
            before: params.before,
            after: params.after,
            ignore_original: params.ignore_original,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::handles::Handle;
    use crate::scene::{CommandBuffer, GroupData, Path, ShapeData};
    use crate::stream::{build_method_stream, HookDescriptor};

    thread_local! {
        static CALLS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    }

    fn record(call: impl Into<String>) {
        CALLS.with(|c| c.borrow_mut().push(call.into()));
    }

    fn take_calls() -> Vec<String> {
        CALLS.with(|c| std::mem::take(&mut *c.borrow_mut()))
    }

    fn rect_data() -> KindData {
        KindData::Shape(ShapeData::new(Path::Rect {
            width: 10.0,
            height: 10.0,
        }))
    }

    fn augmented(scene: &mut Scene, descriptors: &[HookDescriptor]) -> ObjectId {
        let stream = Arc::new(build_method_stream(descriptors).unwrap());
        scene.create_augmented(ObjectKind::Rect, rect_data(), stream, UserData::from_token(42))
    }

    fn before_translate(ctx: &mut HookContext<'_>, dx: f32, _: f32) {
        let x = ctx.object(ctx.this()).unwrap().transform.x;
        record(format!("before {dx} at {x}"));
    }

    fn after_translate(ctx: &mut HookContext<'_>, dx: f32, _: f32) {
        let x = ctx.object(ctx.this()).unwrap().transform.x;
        record(format!("after {dx} at {x}"));
    }

    #[test]
    fn test_translate_bookends() {
        let mut scene = Scene::new();
        let id = augmented(
            &mut scene,
            &[HookDescriptor::new(
                AugmentedMethod::Translate,
                TranslateParams {
                    before: Some(before_translate),
                    after: Some(after_translate),
                    ignore_original: false,
                },
            )],
        );

        take_calls();
        scene.translate(id, 5.0, 0.0);
        assert_eq!(take_calls(), vec!["before 5 at 0", "after 5 at 5"]);
        assert_eq!(scene.get(id).unwrap().transform.x, 5.0);
    }

    #[test]
    fn test_ignore_original() {
        let mut scene = Scene::new();
        let id = augmented(
            &mut scene,
            &[HookDescriptor::new(
                AugmentedMethod::Translate,
                TranslateParams {
                    before: Some(before_translate),
                    after: Some(after_translate),
                    ignore_original: true,
                },
            )],
        );

        take_calls();
        scene.translate(id, 5.0, 0.0);
        assert_eq!(take_calls(), vec!["before 5 at 0", "after 5 at 0"]);
        assert_eq!(scene.get(id).unwrap().transform.x, 0.0);
    }

    #[test]
    fn test_unregistered_method_runs_original_only() {
        fn on_rotate(_: &mut HookContext<'_>, _: f32) {
            record("rotate");
        }
        let mut scene = Scene::new();
        let id = augmented(
            &mut scene,
            &[HookDescriptor::new(
                AugmentedMethod::Rotate,
                RotateParams {
                    before: Some(on_rotate),
                    ..Default::default()
                },
            )],
        );

        take_calls();
        scene.translate(id, 1.0, 2.0);
        assert!(take_calls().is_empty());
        assert_eq!(scene.get(id).unwrap().transform.y, 2.0);
    }

    #[test]
    fn test_hit_test_early_out() {
        fn always_hit(_: &mut HookContext<'_>, _: f32, _: f32, result: &mut bool) {
            record("before");
            *result = true;
        }
        fn after_hit(_: &mut HookContext<'_>, _: f32, _: f32, _: &mut bool) {
            record("after");
        }

        let mut scene = Scene::new();
        let id = augmented(
            &mut scene,
            &[HookDescriptor::new(
                AugmentedMethod::HitTest,
                BooleanResultPointParams {
                    before: Some(always_hit),
                    after: Some(after_hit),
                    ignore_original: false,
                    early_out_if_non_zero: true,
                },
            )],
        );

        take_calls();
        // Far outside the bounds; the original would say no
        assert!(scene.hit_test(id, 1000.0, 1000.0));
        assert_eq!(take_calls(), vec!["before"]);
    }

    #[test]
    fn test_bounds_hook_rewrites_edges() {
        fn widen(_: &mut HookContext<'_>, x_min: &mut f32, _: &mut f32, x_max: &mut f32, _: &mut f32) {
            *x_min -= 1.0;
            *x_max += 1.0;
        }

        let mut scene = Scene::new();
        let id = augmented(
            &mut scene,
            &[HookDescriptor::new(
                AugmentedMethod::GetSelfBounds,
                RectResultParams {
                    after: Some(widen),
                    ..Default::default()
                },
            )],
        );

        assert_eq!(scene.get_self_bounds(id), Rect::new(-6.0, -5.0, 6.0, 5.0));
    }

    #[test]
    fn test_matrix_hook_rewrites_world() {
        fn shift(_: &mut HookContext<'_>, matrix: &mut [f32; 6]) {
            matrix[2] += 100.0;
        }

        let mut scene = Scene::new();
        let id = augmented(
            &mut scene,
            &[HookDescriptor::new(
                AugmentedMethod::DidUpdateTransform,
                MatrixParams {
                    before: Some(shift),
                    ..Default::default()
                },
            )],
        );

        assert!(scene.update_transform(id, &Affine::IDENTITY));
        assert_eq!(scene.get(id).unwrap().world().apply(0.0, 0.0), (100.0, 0.0));
    }

    #[test]
    fn test_on_create_replaces_user_data() {
        fn create(ctx: &mut HookContext<'_>, user_data: &mut UserData) {
            record(format!("create {}", ctx.user_data().token()));
            *user_data = UserData::from_token(99);
        }

        let mut scene = Scene::new();
        take_calls();
        let id = augmented(
            &mut scene,
            &[HookDescriptor::new(
                AugmentedMethod::OnCreate,
                OnCreateParams {
                    action: Some(create),
                },
            )],
        );

        assert_eq!(take_calls(), vec!["create 42"]);
        let state = scene.get(id).unwrap().augmentation().unwrap();
        assert_eq!(state.user_data().token(), 99);
    }

    #[test]
    fn test_send_message() {
        fn on_message(_: &mut HookContext<'_>, name: &str, payload: &[u8]) {
            record(format!("{name} {}", payload.len()));
        }

        let mut scene = Scene::new();
        let id = augmented(
            &mut scene,
            &[HookDescriptor::new(
                AugmentedMethod::OnMessage,
                OnMessageParams {
                    action: Some(on_message),
                },
            )],
        );
        let plain = scene.create(ObjectKind::Rect, rect_data());

        take_calls();
        assert!(scene.send_message(id, "ping", &[1, 2, 3]));
        assert!(!scene.send_message(plain, "ping", &[]));
        assert_eq!(take_calls(), vec!["ping 3"]);
    }

    #[test]
    fn test_insert_hooks_and_reparenting() {
        fn added(ctx: &mut HookContext<'_>, parent: Handle) {
            let count = ctx.num_children(parent);
            record(format!("added, siblings {count}"));
        }
        fn removed(_: &mut HookContext<'_>, _: Handle) {
            record("removed");
        }

        let mut scene = Scene::new();
        let stage = scene.stage();
        let group = scene.create(ObjectKind::Group, KindData::Group(GroupData::default()));
        assert!(scene.insert(stage, None, group));

        let id = augmented(
            &mut scene,
            &[
                HookDescriptor::new(
                    AugmentedMethod::AddedToParent,
                    ParentParams {
                        after: Some(added),
                        ..Default::default()
                    },
                ),
                HookDescriptor::new(
                    AugmentedMethod::RemovedFromParent,
                    ParentParams {
                        before: Some(removed),
                        ..Default::default()
                    },
                ),
            ],
        );

        take_calls();
        assert!(scene.insert(stage, None, id));
        assert!(scene.insert(group, None, id));
        assert_eq!(scene.parent_of(id), Some(group));
        assert_eq!(scene.children(stage), &[group]);
        assert_eq!(take_calls(), vec!["added, siblings 2", "removed", "added, siblings 1"]);

        // Cycles are refused
        assert!(!scene.insert(id, None, group));
        assert!(!scene.insert(group, None, stage));
    }

    #[test]
    fn test_remove_self_finalizes_depth_first() {
        fn finalize(ctx: &mut HookContext<'_>) {
            record(format!("finalize {}", ctx.user_data().token()));
        }

        let mut scene = Scene::new();
        let stage = scene.stage();
        let stream = Arc::new(
            build_method_stream(&[HookDescriptor::new(
                AugmentedMethod::OnFinalize,
                OnFinalizeParams {
                    action: Some(finalize),
                },
            )])
            .unwrap(),
        );
        let group = scene.create_augmented(
            ObjectKind::Group,
            KindData::Group(GroupData::default()),
            stream.clone(),
            UserData::from_token(1),
        );
        let child = scene.create_augmented(ObjectKind::Rect, rect_data(), stream, UserData::from_token(2));
        scene.insert(stage, None, group);
        scene.insert(group, None, child);

        take_calls();
        scene.remove_self(group);
        assert_eq!(take_calls(), vec!["finalize 1", "finalize 2"]);
        assert!(!scene.contains(group));
        assert!(!scene.contains(child));
        assert!(scene.children(stage).is_empty());
    }

    #[test]
    fn test_draw_hook_sees_renderer() {
        fn draw_before(ctx: &mut HookContext<'_>, renderer: Handle) {
            record(format!("renderer {}", ctx.renderer(renderer).is_some()));
        }

        let mut scene = Scene::new();
        let stage = scene.stage();
        let id = augmented(
            &mut scene,
            &[HookDescriptor::new(
                AugmentedMethod::Draw,
                DrawParams {
                    before: Some(draw_before),
                    ..Default::default()
                },
            )],
        );
        scene.insert(stage, None, id);

        let mut buffer = CommandBuffer::new();
        take_calls();
        scene.render(&mut buffer);
        assert_eq!(take_calls(), vec!["renderer true"]);
        assert_eq!(buffer.objects(), vec![id]);
    }
}
