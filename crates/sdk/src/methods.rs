//! Augmentable method identifiers
//!
//! Every operation an extension can intercept has a stable one-byte id. The ids
//! are written verbatim into method streams, so the numbering must never change.

use std::fmt;

/// Number of method ids, including the [`AugmentedMethod::None`] sentinel.
///
/// A stream entry with an id `>= METHOD_COUNT` is malformed.
pub const METHOD_COUNT: u8 = 24;

/// A hookable scene-object operation
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AugmentedMethod {
    /// Sentinel, filtered out when a stream is built
    None = 0,
    Draw,
    CanCull,
    CanHitTest,
    OnMessage,
    SetValue,
    Value,
    OnFinalize,
    AddedToParent,
    DidMoveOffscreen,
    DidUpdateTransform,
    GetSelfBounds,
    GetSelfBoundsForAnchor,
    HitTest,
    OnCreate,
    Prepare,
    RemovedFromParent,
    Rotate,
    Scale,
    Translate,
    UpdateTransform,
    WillMoveOnscreen,
    DidInsert,
    DidRemove,
}

impl AugmentedMethod {
    /// All real methods in id order (the sentinel is excluded)
    pub const ALL: [AugmentedMethod; METHOD_COUNT as usize - 1] = [
        Self::Draw,
        Self::CanCull,
        Self::CanHitTest,
        Self::OnMessage,
        Self::SetValue,
        Self::Value,
        Self::OnFinalize,
        Self::AddedToParent,
        Self::DidMoveOffscreen,
        Self::DidUpdateTransform,
        Self::GetSelfBounds,
        Self::GetSelfBoundsForAnchor,
        Self::HitTest,
        Self::OnCreate,
        Self::Prepare,
        Self::RemovedFromParent,
        Self::Rotate,
        Self::Scale,
        Self::Translate,
        Self::UpdateTransform,
        Self::WillMoveOnscreen,
        Self::DidInsert,
        Self::DidRemove,
    ];

    /// The raw stream byte for this method
    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Decode a raw stream byte
    pub const fn from_id(id: u8) -> Option<Self> {
        if id == 0 {
            Some(Self::None)
        } else if id < METHOD_COUNT {
            Some(Self::ALL[id as usize - 1])
        } else {
            None
        }
    }

    /// Parameter block family used by this method
    pub const fn params_family(self) -> Option<ParamsFamily> {
        use ParamsFamily as F;

        Some(match self {
            Self::None => return None,
            Self::DidMoveOffscreen | Self::Prepare | Self::WillMoveOnscreen => F::Basic,
            Self::DidRemove => F::GroupBasic,
            Self::AddedToParent | Self::RemovedFromParent => F::Parent,
            Self::DidUpdateTransform => F::Matrix,
            Self::Draw => F::Draw,
            Self::GetSelfBounds | Self::GetSelfBoundsForAnchor => F::RectResult,
            Self::Rotate => F::Rotate,
            Self::Scale => F::Scale,
            Self::Translate => F::Translate,
            Self::DidInsert => F::DidInsert,
            Self::CanCull | Self::CanHitTest => F::BooleanResult,
            Self::HitTest => F::BooleanResultPoint,
            Self::UpdateTransform => F::BooleanResultMatrix,
            Self::SetValue => F::SetValue,
            Self::Value => F::Value,
            Self::OnCreate => F::OnCreate,
            Self::OnFinalize => F::OnFinalize,
            Self::OnMessage => F::OnMessage,
        })
    }

    /// Script-facing name, as used in diagnostics
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Draw => "draw",
            Self::CanCull => "canCull",
            Self::CanHitTest => "canHitTest",
            Self::OnMessage => "onMessage",
            Self::SetValue => "setValue",
            Self::Value => "value",
            Self::OnFinalize => "onFinalize",
            Self::AddedToParent => "addedToParent",
            Self::DidMoveOffscreen => "didMoveOffscreen",
            Self::DidUpdateTransform => "didUpdateTransform",
            Self::GetSelfBounds => "getSelfBounds",
            Self::GetSelfBoundsForAnchor => "getSelfBoundsForAnchor",
            Self::HitTest => "hitTest",
            Self::OnCreate => "onCreate",
            Self::Prepare => "prepare",
            Self::RemovedFromParent => "removedFromParent",
            Self::Rotate => "rotate",
            Self::Scale => "scale",
            Self::Translate => "translate",
            Self::UpdateTransform => "updateTransform",
            Self::WillMoveOnscreen => "willMoveOnscreen",
            Self::DidInsert => "didInsert",
            Self::DidRemove => "didRemove",
        }
    }
}

impl fmt::Display for AugmentedMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.id())
    }
}

/// Shape of a method's parameter block
///
/// Several methods share one family; the family decides which callback
/// signature and which early-out controls the block carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamsFamily {
    Basic,
    GroupBasic,
    Parent,
    Matrix,
    Draw,
    RectResult,
    Rotate,
    Scale,
    Translate,
    DidInsert,
    BooleanResult,
    BooleanResultPoint,
    BooleanResultMatrix,
    SetValue,
    Value,
    OnCreate,
    OnFinalize,
    OnMessage,
}
