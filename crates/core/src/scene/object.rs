//! Display objects and their per-kind data

use bitflags::bitflags;
use slotmap::new_key_type;

use crate::augment::AugmentationState;
use stagehook_sdk::{Affine, ObjectKind, Rect};

new_key_type! {
    /// Key of a display object in its scene
    pub struct ObjectId;
}

bitflags! {
    /// Per-object state bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ObjectFlags: u32 {
        const VISIBLE = 0x01;
        /// Receives hits even while invisible
        const HIT_TESTABLE = 0x02;
        const HIT_TEST_MASKED = 0x04;
        /// Stage bounds collapse to the content position
        const DUMMY_STAGE_BOUNDS = 0x08;
        const TRANSFORM_DIRTY = 0x10;
        const BOUNDS_DIRTY = 0x20;
        const HAS_LISTENER = 0x40;
        const ONSCREEN = 0x80;
        /// Group children follow the group's anchor
        const ANCHOR_CHILDREN = 0x100;
    }
}

impl Default for ObjectFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::TRANSFORM_DIRTY | Self::BOUNDS_DIRTY
    }
}

/// Local placement relative to the parent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub x: f32,
    pub y: f32,
    /// Degrees
    pub rotation: f32,
    pub x_scale: f32,
    pub y_scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            x_scale: 1.0,
            y_scale: 1.0,
        }
    }
}

impl Transform {
    pub fn matrix(&self) -> Affine {
        Affine::from_parts(self.x, self.y, self.rotation, self.x_scale, self.y_scale)
    }
}

/// Straight RGBA, each channel in `0..=1`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build from one to four channel values: gray, gray+alpha, rgb, rgba
    pub fn from_channels(channels: &[f32]) -> Option<Self> {
        let c = |v: f32| v.clamp(0.0, 1.0);
        match *channels {
            [gray] => Some(Self::rgba(c(gray), c(gray), c(gray), 1.0)),
            [gray, a] => Some(Self::rgba(c(gray), c(gray), c(gray), c(a))),
            [r, g, b] => Some(Self::rgba(c(r), c(g), c(b), 1.0)),
            [r, g, b, a, ..] => Some(Self::rgba(c(r), c(g), c(b), c(a))),
            [] => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    #[default]
    Normal,
    Add,
    Multiply,
    Screen,
}

impl BlendMode {
    pub fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Add => "add",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "normal" => Some(Self::Normal),
            "add" => Some(Self::Add),
            "multiply" => Some(Self::Multiply),
            "screen" => Some(Self::Screen),
            _ => None,
        }
    }
}

/// Geometry of a shape-like object
#[derive(Debug, Clone, PartialEq)]
pub enum Path {
    Circle { radius: f32 },
    Rect { width: f32, height: f32 },
    RoundedRect { width: f32, height: f32, radius: f32 },
    /// Vertices relative to the shape's center
    Polygon { vertices: Vec<(f32, f32)> },
    Mesh { vertices: Vec<(f32, f32)> },
    Image { file: String, width: f32, height: f32 },
}

impl Path {
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Circle { radius } => Rect::centered(radius * 2.0, radius * 2.0),
            Self::Rect { width, height }
            | Self::RoundedRect { width, height, .. }
            | Self::Image { width, height, .. } => Rect::centered(*width, *height),
            Self::Polygon { vertices } | Self::Mesh { vertices } => {
                let mut bounds = Rect::EMPTY;
                for &(x, y) in vertices {
                    bounds.include(x, y);
                }
                bounds
            }
        }
    }

    /// Script name of the path type
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Circle { .. } => "circle",
            Self::Rect { .. } | Self::Image { .. } => "rect",
            Self::RoundedRect { .. } => "roundedRect",
            Self::Polygon { .. } => "polygon",
            Self::Mesh { .. } => "mesh",
        }
    }
}

/// Fill and stroke state shared by every shape-derived kind
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeData {
    pub path: Path,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f32,
    pub inner_stroke_width: f32,
    pub blend_mode: BlendMode,
}

impl ShapeData {
    pub fn new(path: Path) -> Self {
        Self {
            path,
            fill: Some(Color::WHITE),
            stroke: None,
            stroke_width: 0.0,
            inner_stroke_width: 0.0,
            blend_mode: BlendMode::Normal,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineData {
    /// Points relative to the first point
    pub points: Vec<(f32, f32)>,
    pub stroke: Color,
    pub stroke_width: f32,
    pub blend_mode: BlendMode,
    /// Anchor against the segment bounds instead of the origin
    pub anchor_segments: bool,
    pub vertex_colors: Vec<Color>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupData {
    pub children: Vec<ObjectId>,
    /// Fixed size for containers
    pub clip: Option<(f32, f32)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextData {
    pub shape: ShapeData,
    pub text: String,
    pub font: String,
    pub size: f32,
    pub baseline_offset: f32,
    /// Highlight and shadow for embossed text
    pub emboss: Option<(Color, Color)>,
}

impl TextData {
    pub fn new(text: impl Into<String>, font: impl Into<String>, size: f32) -> Self {
        Self {
            shape: ShapeData::new(Path::Rect {
                width: 0.0,
                height: 0.0,
            }),
            text: text.into(),
            font: font.into(),
            size,
            baseline_offset: 0.0,
            emboss: None,
        }
    }

    /// Approximate layout: fixed advance per character
    pub fn measure(&self) -> (f32, f32) {
        let longest = self.text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        let lines = self.text.lines().count().max(1);
        (longest as f32 * self.size * 0.5, lines as f32 * self.size)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpriteData {
    pub shape: ShapeData,
    pub sheet: String,
    /// One-based
    pub frame: u32,
    pub num_frames: u32,
    pub time_scale: f32,
    pub playing: bool,
    pub sequence: Option<String>,
    pub use_frame_for_anchors: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotData {
    pub shape: ShapeData,
    /// Offscreen group rendered into the snapshot
    pub group: ObjectId,
    pub clear_color: Color,
    pub canvas_mode: CanvasMode,
    pub invalidated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CanvasMode {
    #[default]
    Append,
    Discard,
}

impl CanvasMode {
    pub fn name(self) -> &'static str {
        match self {
            Self::Append => "append",
            Self::Discard => "discard",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "append" => Some(Self::Append),
            "discard" => Some(Self::Discard),
            _ => None,
        }
    }
}

/// Number of tunable emitter values
pub const EMITTER_FIELDS: usize = 46;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmitterState {
    #[default]
    Playing,
    Stopped,
    Paused,
}

impl EmitterState {
    pub fn name(self) -> &'static str {
        match self {
            Self::Playing => "playing",
            Self::Stopped => "stopped",
            Self::Paused => "paused",
        }
    }
}

/// Which frame an emitter's particles are positioned in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AbsolutePosition {
    /// Particles follow the emitter
    #[default]
    Off,
    /// Particles stay put in the emitter's parent
    Parent,
    /// Particles stay put in this ancestor group
    Group(ObjectId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmitterData {
    pub fields: [f32; EMITTER_FIELDS],
    pub absolute_position: AbsolutePosition,
    pub max_particles: u32,
    pub state: EmitterState,
}

impl Default for EmitterData {
    fn default() -> Self {
        Self {
            fields: [0.0; EMITTER_FIELDS],
            absolute_position: AbsolutePosition::Off,
            max_particles: 0,
            state: EmitterState::Playing,
        }
    }
}

/// Kind-specific payload
#[derive(Debug, Clone, PartialEq)]
pub enum KindData {
    Shape(ShapeData),
    Line(LineData),
    Group(GroupData),
    Text(TextData),
    Sprite(SpriteData),
    Snapshot(SnapshotData),
    Emitter(EmitterData),
}

/// One node of the scene tree
#[derive(Debug)]
pub struct DisplayObject {
    kind: ObjectKind,
    pub(crate) parent: Option<ObjectId>,
    pub transform: Transform,
    pub anchor: (f32, f32),
    /// Opacity, `0..=255`
    pub alpha: u8,
    pub flags: ObjectFlags,
    pub mask: Option<Mask>,
    pub data: KindData,
    pub(crate) augmentation: Option<AugmentationState>,
    pub(crate) world: Affine,
    pub(crate) stage_bounds: Rect,
}

/// Mask placement, relative to the object
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    pub file: String,
    pub transform: Transform,
}

impl DisplayObject {
    pub fn new(kind: ObjectKind, data: KindData) -> Self {
        Self {
            kind,
            parent: None,
            transform: Transform::default(),
            anchor: (0.5, 0.5),
            alpha: 255,
            flags: ObjectFlags::default(),
            mask: None,
            data,
            augmentation: None,
            world: Affine::IDENTITY,
            stage_bounds: Rect::EMPTY,
        }
    }

    #[inline]
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    #[inline]
    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    #[inline]
    pub fn is_group(&self) -> bool {
        self.kind.is_group()
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.flags.contains(ObjectFlags::VISIBLE)
    }

    pub fn is_augmented(&self) -> bool {
        self.augmentation.is_some()
    }

    pub fn augmentation(&self) -> Option<&AugmentationState> {
        self.augmentation.as_ref()
    }

    /// World transform as of the last transform update
    #[inline]
    pub fn world(&self) -> &Affine {
        &self.world
    }

    /// Content bounds cached by the last prepare
    #[inline]
    pub fn stage_bounds(&self) -> Rect {
        self.stage_bounds
    }

    pub fn set_flag(&mut self, flag: ObjectFlags, on: bool) {
        self.flags.set(flag, on);
    }

    pub fn invalidate(&mut self) {
        self.flags
            .insert(ObjectFlags::TRANSFORM_DIRTY | ObjectFlags::BOUNDS_DIRTY);
    }

    pub fn shape(&self) -> Option<&ShapeData> {
        match &self.data {
            KindData::Shape(s) => Some(s),
            KindData::Text(t) => Some(&t.shape),
            KindData::Sprite(s) => Some(&s.shape),
            KindData::Snapshot(s) => Some(&s.shape),
            _ => None,
        }
    }

    pub fn shape_mut(&mut self) -> Option<&mut ShapeData> {
        match &mut self.data {
            KindData::Shape(s) => Some(s),
            KindData::Text(t) => Some(&mut t.shape),
            KindData::Sprite(s) => Some(&mut s.shape),
            KindData::Snapshot(s) => Some(&mut s.shape),
            _ => None,
        }
    }

    pub fn group(&self) -> Option<&GroupData> {
        match &self.data {
            KindData::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn group_mut(&mut self) -> Option<&mut GroupData> {
        match &mut self.data {
            KindData::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn children(&self) -> &[ObjectId] {
        self.group().map(|g| g.children.as_slice()).unwrap_or(&[])
    }

    /// Offscreen group this object owns outside the tree, released with it
    pub fn owned_group(&self) -> Option<ObjectId> {
        self.snapshot().map(|s| s.group)
    }

    pub fn line(&self) -> Option<&LineData> {
        match &self.data {
            KindData::Line(l) => Some(l),
            _ => None,
        }
    }

    pub fn line_mut(&mut self) -> Option<&mut LineData> {
        match &mut self.data {
            KindData::Line(l) => Some(l),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&TextData> {
        match &self.data {
            KindData::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn text_mut(&mut self) -> Option<&mut TextData> {
        match &mut self.data {
            KindData::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn sprite(&self) -> Option<&SpriteData> {
        match &self.data {
            KindData::Sprite(s) => Some(s),
            _ => None,
        }
    }

    pub fn sprite_mut(&mut self) -> Option<&mut SpriteData> {
        match &mut self.data {
            KindData::Sprite(s) => Some(s),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> Option<&SnapshotData> {
        match &self.data {
            KindData::Snapshot(s) => Some(s),
            _ => None,
        }
    }

    pub fn snapshot_mut(&mut self) -> Option<&mut SnapshotData> {
        match &mut self.data {
            KindData::Snapshot(s) => Some(s),
            _ => None,
        }
    }

    pub fn emitter(&self) -> Option<&EmitterData> {
        match &self.data {
            KindData::Emitter(e) => Some(e),
            _ => None,
        }
    }

    pub fn emitter_mut(&mut self) -> Option<&mut EmitterData> {
        match &mut self.data {
            KindData::Emitter(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_channels() {
        assert_eq!(Color::from_channels(&[0.5]), Some(Color::rgba(0.5, 0.5, 0.5, 1.0)));
        assert_eq!(Color::from_channels(&[2.0, 0.0, 0.0]), Some(Color::rgba(1.0, 0.0, 0.0, 1.0)));
        assert_eq!(Color::from_channels(&[]), None);
    }

    #[test]
    fn test_path_bounds() {
        assert_eq!(Path::Circle { radius: 5.0 }.bounds(), Rect::new(-5.0, -5.0, 5.0, 5.0));
        let poly = Path::Polygon {
            vertices: vec![(0.0, -2.0), (3.0, 1.0), (-1.0, 1.0)],
        };
        assert_eq!(poly.bounds(), Rect::new(-1.0, -2.0, 3.0, 1.0));
    }

    #[test]
    fn test_text_measure() {
        let text = TextData {
            shape: ShapeData::new(Path::Rect {
                width: 0.0,
                height: 0.0,
            }),
            text: "ab\nabcd".into(),
            font: "native".into(),
            size: 10.0,
            baseline_offset: 0.0,
            emboss: None,
        };
        assert_eq!(text.measure(), (20.0, 20.0));
    }
}
