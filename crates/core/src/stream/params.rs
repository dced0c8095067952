//! Hook callback signatures and per-family parameter blocks
//!
//! Every hook receives a [`HookContext`] first. The remaining arguments
//! depend on the operation: scalars by value, mutable results by reference.
//! Bounds travel as four separate edges and matrices as six flat floats so
//! that hook signatures never depend on internal geometry types.

use std::fmt;

use stagehook_engine::ScriptState;
use stagehook_sdk::{ParamsFamily, UserData};

use super::codec::{BlockReader, BlockWriter};
use crate::handles::Handle;
use crate::hooks::{EarlyOut, HookContext};

/// Lifecycle notification with no arguments
pub type BasicHook = fn(&mut HookContext<'_>);
/// Parent group handle
pub type ParentHook = fn(&mut HookContext<'_>, Handle);
/// Flattened transform, copied back after the call
pub type MatrixHook = fn(&mut HookContext<'_>, &mut [f32; 6]);
/// Renderer handle
pub type DrawHook = fn(&mut HookContext<'_>, Handle);
/// x_min, y_min, x_max, y_max
pub type RectResultHook = fn(&mut HookContext<'_>, &mut f32, &mut f32, &mut f32, &mut f32);
/// Rotation delta in degrees
pub type RotateHook = fn(&mut HookContext<'_>, f32);
/// x and y scale factors
pub type ScaleHook = fn(&mut HookContext<'_>, f32, f32);
/// x and y deltas
pub type TranslateHook = fn(&mut HookContext<'_>, f32, f32);
/// Whether the inserted child changed parents
pub type DidInsertHook = fn(&mut HookContext<'_>, bool);
pub type BooleanResultHook = fn(&mut HookContext<'_>, &mut bool);
/// Content-space point
pub type BooleanResultPointHook = fn(&mut HookContext<'_>, f32, f32, &mut bool);
/// Parent transform, read-only
pub type BooleanResultMatrixHook = fn(&mut HookContext<'_>, &[f32; 6], &mut bool);
/// Key, stack index of the new value, recognized flag
pub type SetValueHook = fn(&mut HookContext<'_>, &mut dyn ScriptState, &str, i32, &mut bool);
/// Key, number of values pushed
pub type ValueHook = fn(&mut HookContext<'_>, &mut dyn ScriptState, &str, &mut i32);
/// May replace the stored user data
pub type OnCreateHook = fn(&mut HookContext<'_>, &mut UserData);
pub type OnFinalizeHook = fn(&mut HookContext<'_>);
/// Message name and binary payload
pub type OnMessageHook = fn(&mut HookContext<'_>, &str, &[u8]);

/// A parameter block that can live in a method stream
pub trait HookPayload: Copy + Default + PartialEq {
    const FAMILY: ParamsFamily;

    fn encode(&self, block: &mut BlockWriter<'_>);

    fn decode(block: &mut BlockReader<'_>) -> Self;
}

// SAFETY (for every `transmute` below): a non-zero callback slot is only ever
// written by `encode` of the same parameter type, from a function pointer of
// exactly the type being restored. Streams cannot be built from foreign bytes,
// and lookups check the family before decoding.
macro_rules! decode_fn {
    ($block:expr, $hook:ty) => {
        $block
            .read_fn()
            .map(|raw| unsafe { std::mem::transmute::<usize, $hook>(raw) })
    };
}

macro_rules! bookended_params {
    ($(#[$meta:meta])* $name:ident, $hook:ty, $family:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy)]
        pub struct $name {
            pub before: Option<$hook>,
            pub after: Option<$hook>,
            /// Skip the plain behavior
            pub ignore_original: bool,
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    before: None,
                    after: None,
                    ignore_original: false,
                }
            }
        }

        impl HookPayload for $name {
            const FAMILY: ParamsFamily = ParamsFamily::$family;

            fn encode(&self, block: &mut BlockWriter<'_>) {
                block.write_fn(self.before.map(|f| f as usize));
                block.write_fn(self.after.map(|f| f as usize));
                block.write_flag(self.ignore_original);
            }

            fn decode(block: &mut BlockReader<'_>) -> Self {
                Self {
                    before: decode_fn!(block, $hook),
                    after: decode_fn!(block, $hook),
                    ignore_original: block.read_flag(),
                }
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.before.map(|f| f as usize) == other.before.map(|f| f as usize)
                    && self.after.map(|f| f as usize) == other.after.map(|f| f as usize)
                    && self.ignore_original == other.ignore_original
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("before", &self.before.is_some())
                    .field("after", &self.after.is_some())
                    .field("ignore_original", &self.ignore_original)
                    .finish()
            }
        }

        impl From<$name> for HookParams {
            fn from(params: $name) -> Self {
                HookParams::$family(params)
            }
        }
    };
}

macro_rules! boolean_params {
    ($(#[$meta:meta])* $name:ident, $hook:ty, $family:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy)]
        pub struct $name {
            pub before: Option<$hook>,
            pub after: Option<$hook>,
            /// Skip the plain behavior
            pub ignore_original: bool,
            /// After `before`, stop when the result is true; when false,
            /// stop when the result is false
            pub early_out_if_non_zero: bool,
        }

        impl $name {
            pub fn early_out(&self) -> EarlyOut {
                if self.early_out_if_non_zero {
                    EarlyOut::IfNonZero
                } else {
                    EarlyOut::IfZero
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    before: None,
                    after: None,
                    ignore_original: false,
                    early_out_if_non_zero: false,
                }
            }
        }

        impl HookPayload for $name {
            const FAMILY: ParamsFamily = ParamsFamily::$family;

            fn encode(&self, block: &mut BlockWriter<'_>) {
                block.write_fn(self.before.map(|f| f as usize));
                block.write_fn(self.after.map(|f| f as usize));
                block.write_flag(self.ignore_original);
                block.write_flag(self.early_out_if_non_zero);
            }

            fn decode(block: &mut BlockReader<'_>) -> Self {
                Self {
                    before: decode_fn!(block, $hook),
                    after: decode_fn!(block, $hook),
                    ignore_original: block.read_flag(),
                    early_out_if_non_zero: block.read_flag(),
                }
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.before.map(|f| f as usize) == other.before.map(|f| f as usize)
                    && self.after.map(|f| f as usize) == other.after.map(|f| f as usize)
                    && self.ignore_original == other.ignore_original
                    && self.early_out_if_non_zero == other.early_out_if_non_zero
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("before", &self.before.is_some())
                    .field("after", &self.after.is_some())
                    .field("ignore_original", &self.ignore_original)
                    .field("early_out_if_non_zero", &self.early_out_if_non_zero)
                    .finish()
            }
        }

        impl From<$name> for HookParams {
            fn from(params: $name) -> Self {
                HookParams::$family(params)
            }
        }
    };
}

macro_rules! action_params {
    ($(#[$meta:meta])* $name:ident, $hook:ty, $family:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy)]
        pub struct $name {
            pub action: Option<$hook>,
        }

        impl Default for $name {
            fn default() -> Self {
                Self { action: None }
            }
        }

        impl HookPayload for $name {
            const FAMILY: ParamsFamily = ParamsFamily::$family;

            fn encode(&self, block: &mut BlockWriter<'_>) {
                block.write_fn(self.action.map(|f| f as usize));
            }

            fn decode(block: &mut BlockReader<'_>) -> Self {
                Self {
                    action: decode_fn!(block, $hook),
                }
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.action.map(|f| f as usize) == other.action.map(|f| f as usize)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("action", &self.action.is_some())
                    .finish()
            }
        }

        impl From<$name> for HookParams {
            fn from(params: $name) -> Self {
                HookParams::$family(params)
            }
        }
    };
}

bookended_params!(
    /// `prepare`, `willMoveOnscreen`, `didMoveOffscreen`
    BasicParams, BasicHook, Basic
);
bookended_params!(
    /// `didRemove`; self is stored as a group
    GroupBasicParams, BasicHook, GroupBasic
);
bookended_params!(
    /// `addedToParent`, `removedFromParent`
    ParentParams, ParentHook, Parent
);
bookended_params!(
    /// `didUpdateTransform`
    MatrixParams, MatrixHook, Matrix
);
bookended_params!(DrawParams, DrawHook, Draw);
bookended_params!(
    /// `getSelfBounds`, `getSelfBoundsForAnchor`
    RectResultParams, RectResultHook, RectResult
);
bookended_params!(RotateParams, RotateHook, Rotate);
bookended_params!(ScaleParams, ScaleHook, Scale);
bookended_params!(TranslateParams, TranslateHook, Translate);
bookended_params!(DidInsertParams, DidInsertHook, DidInsert);

boolean_params!(
    /// `canCull`, `canHitTest`
    BooleanResultParams, BooleanResultHook, BooleanResult
);
boolean_params!(
    /// `hitTest`
    BooleanResultPointParams, BooleanResultPointHook, BooleanResultPoint
);
boolean_params!(
    /// `updateTransform`
    BooleanResultMatrixParams, BooleanResultMatrixHook, BooleanResultMatrix
);

action_params!(OnCreateParams, OnCreateHook, OnCreate);
action_params!(OnFinalizeParams, OnFinalizeHook, OnFinalize);
action_params!(OnMessageParams, OnMessageHook, OnMessage);

/// Property write interception
#[derive(Clone, Copy, Default)]
pub struct SetValueParams {
    pub before: Option<SetValueHook>,
    pub after: Option<SetValueHook>,
    pub ignore_original: bool,
    /// Never stop after `before`, even when it recognized the key
    pub disallow_early_out: bool,
}

impl SetValueParams {
    pub fn early_out(&self) -> EarlyOut {
        if self.disallow_early_out {
            EarlyOut::Never
        } else {
            EarlyOut::IfNonZero
        }
    }
}

impl HookPayload for SetValueParams {
    const FAMILY: ParamsFamily = ParamsFamily::SetValue;

    fn encode(&self, block: &mut BlockWriter<'_>) {
        block.write_fn(self.before.map(|f| f as usize));
        block.write_fn(self.after.map(|f| f as usize));
        block.write_flag(self.ignore_original);
        block.write_flag(self.disallow_early_out);
    }

    fn decode(block: &mut BlockReader<'_>) -> Self {
        Self {
            before: decode_fn!(block, SetValueHook),
            after: decode_fn!(block, SetValueHook),
            ignore_original: block.read_flag(),
            disallow_early_out: block.read_flag(),
        }
    }
}

impl PartialEq for SetValueParams {
    fn eq(&self, other: &Self) -> bool {
        self.before.map(|f| f as usize) == other.before.map(|f| f as usize)
            && self.after.map(|f| f as usize) == other.after.map(|f| f as usize)
            && self.ignore_original == other.ignore_original
            && self.disallow_early_out == other.disallow_early_out
    }
}

impl fmt::Debug for SetValueParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetValueParams")
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .field("ignore_original", &self.ignore_original)
            .field("disallow_early_out", &self.disallow_early_out)
            .finish()
    }
}

impl From<SetValueParams> for HookParams {
    fn from(params: SetValueParams) -> Self {
        HookParams::SetValue(params)
    }
}

/// Property read interception
///
/// The result counts values pushed; the original's count is added to
/// whatever `before` pushed.
#[derive(Clone, Copy, Default)]
pub struct ValueParams {
    pub before: Option<ValueHook>,
    pub after: Option<ValueHook>,
    pub ignore_original: bool,
    pub disallow_early_out: bool,
    /// Stop after `before` when it pushed nothing, instead of when it pushed something
    pub early_out_if_zero: bool,
}

impl ValueParams {
    pub fn early_out(&self) -> EarlyOut {
        if self.disallow_early_out {
            EarlyOut::Never
        } else if self.early_out_if_zero {
            EarlyOut::IfZero
        } else {
            EarlyOut::IfNonZero
        }
    }
}

impl HookPayload for ValueParams {
    const FAMILY: ParamsFamily = ParamsFamily::Value;

    fn encode(&self, block: &mut BlockWriter<'_>) {
        block.write_fn(self.before.map(|f| f as usize));
        block.write_fn(self.after.map(|f| f as usize));
        block.write_flag(self.ignore_original);
        block.write_flag(self.disallow_early_out);
        block.write_flag(self.early_out_if_zero);
    }

    fn decode(block: &mut BlockReader<'_>) -> Self {
        Self {
            before: decode_fn!(block, ValueHook),
            after: decode_fn!(block, ValueHook),
            ignore_original: block.read_flag(),
            disallow_early_out: block.read_flag(),
            early_out_if_zero: block.read_flag(),
        }
    }
}

impl PartialEq for ValueParams {
    fn eq(&self, other: &Self) -> bool {
        self.before.map(|f| f as usize) == other.before.map(|f| f as usize)
            && self.after.map(|f| f as usize) == other.after.map(|f| f as usize)
            && self.ignore_original == other.ignore_original
            && self.disallow_early_out == other.disallow_early_out
            && self.early_out_if_zero == other.early_out_if_zero
    }
}

impl fmt::Debug for ValueParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueParams")
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .field("ignore_original", &self.ignore_original)
            .field("disallow_early_out", &self.disallow_early_out)
            .field("early_out_if_zero", &self.early_out_if_zero)
            .finish()
    }
}

impl From<ValueParams> for HookParams {
    fn from(params: ValueParams) -> Self {
        HookParams::Value(params)
    }
}

/// Parameters for one declared hook, tagged by family
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HookParams {
    Basic(BasicParams),
    GroupBasic(GroupBasicParams),
    Parent(ParentParams),
    Matrix(MatrixParams),
    Draw(DrawParams),
    RectResult(RectResultParams),
    Rotate(RotateParams),
    Scale(ScaleParams),
    Translate(TranslateParams),
    DidInsert(DidInsertParams),
    BooleanResult(BooleanResultParams),
    BooleanResultPoint(BooleanResultPointParams),
    BooleanResultMatrix(BooleanResultMatrixParams),
    SetValue(SetValueParams),
    Value(ValueParams),
    OnCreate(OnCreateParams),
    OnFinalize(OnFinalizeParams),
    OnMessage(OnMessageParams),
}

impl HookParams {
    pub fn family(&self) -> ParamsFamily {
        match self {
            Self::Basic(_) => ParamsFamily::Basic,
            Self::GroupBasic(_) => ParamsFamily::GroupBasic,
            Self::Parent(_) => ParamsFamily::Parent,
            Self::Matrix(_) => ParamsFamily::Matrix,
            Self::Draw(_) => ParamsFamily::Draw,
            Self::RectResult(_) => ParamsFamily::RectResult,
            Self::Rotate(_) => ParamsFamily::Rotate,
            Self::Scale(_) => ParamsFamily::Scale,
            Self::Translate(_) => ParamsFamily::Translate,
            Self::DidInsert(_) => ParamsFamily::DidInsert,
            Self::BooleanResult(_) => ParamsFamily::BooleanResult,
            Self::BooleanResultPoint(_) => ParamsFamily::BooleanResultPoint,
            Self::BooleanResultMatrix(_) => ParamsFamily::BooleanResultMatrix,
            Self::SetValue(_) => ParamsFamily::SetValue,
            Self::Value(_) => ParamsFamily::Value,
            Self::OnCreate(_) => ParamsFamily::OnCreate,
            Self::OnFinalize(_) => ParamsFamily::OnFinalize,
            Self::OnMessage(_) => ParamsFamily::OnMessage,
        }
    }

    /// Write this block's payload
    pub fn encode(&self, block: &mut BlockWriter<'_>) {
        match self {
            Self::Basic(p) => p.encode(block),
            Self::GroupBasic(p) => p.encode(block),
            Self::Parent(p) => p.encode(block),
            Self::Matrix(p) => p.encode(block),
            Self::Draw(p) => p.encode(block),
            Self::RectResult(p) => p.encode(block),
            Self::Rotate(p) => p.encode(block),
            Self::Scale(p) => p.encode(block),
            Self::Translate(p) => p.encode(block),
            Self::DidInsert(p) => p.encode(block),
            Self::BooleanResult(p) => p.encode(block),
            Self::BooleanResultPoint(p) => p.encode(block),
            Self::BooleanResultMatrix(p) => p.encode(block),
            Self::SetValue(p) => p.encode(block),
            Self::Value(p) => p.encode(block),
            Self::OnCreate(p) => p.encode(block),
            Self::OnFinalize(p) => p.encode(block),
            Self::OnMessage(p) => p.encode(block),
        }
    }
}
