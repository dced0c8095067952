//! Scene object kinds and handle type tags

use std::fmt;

/// Concrete kind of a scene object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Circle,
    Rect,
    RoundedRect,
    Polygon,
    Mesh,
    Line,
    Image,
    ImageRect,
    Group,
    Container,
    Snapshot,
    Sprite,
    Text,
    EmbossedText,
    Emitter,
    /// Root group of a scene; never created through a factory
    Stage,
}

impl ObjectKind {
    /// Kinds that extensions can construct
    pub const PUSHABLE: [ObjectKind; 15] = [
        Self::Circle,
        Self::Rect,
        Self::RoundedRect,
        Self::Polygon,
        Self::Mesh,
        Self::Line,
        Self::Image,
        Self::ImageRect,
        Self::Group,
        Self::Container,
        Self::Snapshot,
        Self::Sprite,
        Self::Text,
        Self::EmbossedText,
        Self::Emitter,
    ];

    /// Whether the kind holds children
    #[inline]
    pub const fn is_group(self) -> bool {
        matches!(self, Self::Group | Self::Container | Self::Stage)
    }

    /// Whether an extension may construct this kind
    #[inline]
    pub const fn is_pushable(self) -> bool {
        !matches!(self, Self::Stage)
    }

    /// Tag used when an object of this kind is stored as a hook's `self`
    #[inline]
    pub const fn type_tag(self) -> TypeTag {
        if self.is_group() {
            TypeTag::GroupObject
        } else {
            TypeTag::DisplayObject
        }
    }

    /// Name of the script factory that constructs this kind
    pub const fn factory_name(self) -> &'static str {
        match self {
            Self::Circle => "newCircle",
            Self::Rect => "newRect",
            Self::RoundedRect => "newRoundedRect",
            Self::Polygon => "newPolygon",
            Self::Mesh => "newMesh",
            Self::Line => "newLine",
            Self::Image => "newImage",
            Self::ImageRect => "newImageRect",
            Self::Group => "newGroup",
            Self::Container => "newContainer",
            Self::Snapshot => "newSnapshot",
            Self::Sprite => "newSprite",
            Self::Text => "newText",
            Self::EmbossedText => "newEmbossedText",
            Self::Emitter => "newEmitter",
            Self::Stage => "getCurrentStage",
        }
    }

    /// Type name reported to script through `_type`
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Circle | Self::Rect | Self::RoundedRect | Self::Polygon | Self::Mesh => {
                "ShapeObject"
            }
            Self::Line => "LineObject",
            Self::Image | Self::ImageRect => "ImageObject",
            Self::Group => "GroupObject",
            Self::Container => "ContainerObject",
            Self::Snapshot => "SnapshotObject",
            Self::Sprite => "SpriteObject",
            Self::Text => "TextObject",
            Self::EmbossedText => "EmbossedTextObject",
            Self::Emitter => "EmitterObject",
            Self::Stage => "StageObject",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Type tag attached to every handle
///
/// Tags form a small tree: a group is also a display object, so a handle
/// stored as [`TypeTag::GroupObject`] resolves when a display object is
/// expected, but not the other way around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    DisplayObject,
    GroupObject,
    Renderer,
}

impl TypeTag {
    /// The tag this one specializes, if any
    #[inline]
    pub const fn parent(self) -> Option<TypeTag> {
        match self {
            Self::GroupObject => Some(Self::DisplayObject),
            Self::DisplayObject | Self::Renderer => None,
        }
    }

    /// Whether a value stored under `self` satisfies `expected`
    pub const fn satisfies(self, expected: TypeTag) -> bool {
        let mut current = Some(self);
        while let Some(tag) = current {
            if tag as u8 == expected as u8 {
                return true;
            }
            current = tag.parent();
        }
        false
    }
}
