//! Property dispatch for augmented objects
//!
//! The wrapper runs the object's `Value` / `SetValue` hooks around the plain
//! chain of its kind. When the stream declares no such hook it forwards
//! straight to the plain chain.

use super::{emitter, group, line, shape, snapshot, sprite, text};
use super::{PropertyAccess, ProxyVTable};
use crate::hooks::{run_early_out, HookContext};
use crate::stream::{SetValueParams, ValueParams};
use stagehook_sdk::{AugmentedMethod, ObjectKind};

/// Hook-running layer in front of a kind's vtable
pub struct AugmentedVTable {
    base: &'static dyn ProxyVTable,
}

impl AugmentedVTable {
    pub const fn new(base: &'static dyn ProxyVTable) -> Self {
        Self { base }
    }
}

impl ProxyVTable for AugmentedVTable {
    fn name(&self) -> &'static str {
        self.base.name()
    }

    fn parent(&self) -> Option<&'static dyn ProxyVTable> {
        Some(self.base)
    }

    fn value_for_key(&self, access: &mut PropertyAccess<'_>, key: &str) -> i32 {
        let id = access.object;
        let Some((params, user_data)) = access
            .scene
            .hooks::<ValueParams>(id, AugmentedMethod::Value)
        else {
            return self.base.value_for_key(access, key);
        };

        let base = self.base;
        let mut env = (
            HookContext::open(&mut *access.scene, id, user_data),
            &mut *access.state,
        );
        run_early_out(
            &mut env,
            params.before,
            params.after,
            params.ignore_original,
            params.early_out(),
            0i32,
            |(ctx, state), hook, pushed| hook(ctx, &mut **state, key, pushed),
            |(ctx, state), pushed| {
                let mut inner = PropertyAccess::new(ctx.scene_mut(), &mut **state, id);
                pushed + base.value_for_key(&mut inner, key)
            },
        )
    }

    fn set_value_for_key(
        &self,
        access: &mut PropertyAccess<'_>,
        key: &str,
        value_index: i32,
    ) -> bool {
        let id = access.object;
        let Some((params, user_data)) = access
            .scene
            .hooks::<SetValueParams>(id, AugmentedMethod::SetValue)
        else {
            return self.base.set_value_for_key(access, key, value_index);
        };

        let base = self.base;
        let mut env = (
            HookContext::open(&mut *access.scene, id, user_data),
            &mut *access.state,
        );
        run_early_out(
            &mut env,
            params.before,
            params.after,
            params.ignore_original,
            params.early_out(),
            false,
            |(ctx, state), hook, handled| hook(ctx, &mut **state, key, value_index, handled),
            |(ctx, state), _| {
                let mut inner = PropertyAccess::new(ctx.scene_mut(), &mut **state, id);
                base.set_value_for_key(&mut inner, key, value_index)
            },
        )
    }
}

macro_rules! augmented_vtables {
    ($($base:path => $name:ident: $($kind:ident)|+;)+) => {
        $(
            pub static $name: AugmentedVTable = AugmentedVTable::new(&$base);
        )+

        /// Hook-running vtable for an augmented object of `kind`
        pub fn augmented_vtable(kind: ObjectKind) -> &'static dyn ProxyVTable {
            match kind {
                $($(ObjectKind::$kind)|+ => &$name,)+
            }
        }
    };
}

augmented_vtables! {
    shape::SHAPE => AUGMENTED_SHAPE: Circle | Rect | RoundedRect | Polygon | Mesh | Image | ImageRect;
    line::LINE => AUGMENTED_LINE: Line;
    group::GROUP => AUGMENTED_GROUP: Group | Container;
    group::STAGE => AUGMENTED_STAGE: Stage;
    text::TEXT => AUGMENTED_TEXT: Text;
    text::EMBOSSED_TEXT => AUGMENTED_EMBOSSED_TEXT: EmbossedText;
    sprite::SPRITE => AUGMENTED_SPRITE: Sprite;
    snapshot::SNAPSHOT => AUGMENTED_SNAPSHOT: Snapshot;
    emitter::EMITTER => AUGMENTED_EMITTER: Emitter;
}
