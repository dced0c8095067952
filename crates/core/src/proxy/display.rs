//! Root of the vtable chain: properties every display object has

use super::introspect::{self, PROPERTIES_KEY, TYPE_KEY};
use super::{push_rect, PropertyAccess, ProxyVTable};
use crate::scene::{ObjectFlags, Transform};
use crate::PropertyKeys;
use stagehook_engine::ScriptValue;

#[derive(Debug, Clone, Copy, PartialEq, PropertyKeys)]
#[keys(table_start = 33, hash_chars = 15)]
pub enum DisplayKey {
    #[key(name = "translate")]
    Translate,
    #[key(name = "scale")]
    Scale,
    #[key(name = "rotate")]
    Rotate,
    #[key(name = "getParent")]
    GetParent,
    #[key(name = "setReferencePoint")]
    SetReferencePoint,
    #[key(name = "removeSelf")]
    RemoveSelf,
    #[key(name = "localToContent")]
    LocalToContent,
    #[key(name = "contentToLocal")]
    ContentToLocal,
    #[key(name = "stageBounds", deprecated)]
    StageBounds,
    #[key(name = "stageWidth", deprecated)]
    StageWidth,
    #[key(name = "stageHeight", deprecated)]
    StageHeight,
    #[key(name = "numChildren", deprecated)]
    NumChildren,
    #[key(name = "length", deprecated)]
    Length,
    #[key(name = "isVisible")]
    IsVisible,
    #[key(name = "isHitTestable")]
    IsHitTestable,
    #[key(name = "alpha")]
    Alpha,
    #[key(name = "parent")]
    Parent,
    #[key(name = "stage")]
    Stage,
    #[key(name = "x")]
    X,
    #[key(name = "y")]
    Y,
    #[key(name = "anchorX")]
    AnchorX,
    #[key(name = "anchorY")]
    AnchorY,
    #[key(name = "contentBounds")]
    ContentBounds,
    #[key(name = "contentWidth")]
    ContentWidth,
    #[key(name = "contentHeight")]
    ContentHeight,
    #[key(name = "toFront")]
    ToFront,
    #[key(name = "toBack")]
    ToBack,
    #[key(name = "setMask")]
    SetMask,
    #[key(name = "maskX")]
    MaskX,
    #[key(name = "maskY")]
    MaskY,
    #[key(name = "maskScaleX")]
    MaskScaleX,
    #[key(name = "maskScaleY")]
    MaskScaleY,
    #[key(name = "maskRotation")]
    MaskRotation,
    #[key(name = "isHitTestMasked")]
    IsHitTestMasked,
    #[key(name = "_setHasListener")]
    SetHasListener,
}

impl DisplayKey {
    /// Keys that push a bound method
    pub fn is_method(self) -> bool {
        matches!(
            self,
            Self::Translate
                | Self::Scale
                | Self::Rotate
                | Self::GetParent
                | Self::SetReferencePoint
                | Self::RemoveSelf
                | Self::LocalToContent
                | Self::ContentToLocal
                | Self::ToFront
                | Self::ToBack
                | Self::SetMask
                | Self::SetHasListener
        )
    }
}

/// Transform-derived properties, the last resort of every lookup
#[derive(Debug, Clone, Copy, PartialEq, PropertyKeys)]
pub enum GeometricKey {
    #[key(name = "xScale")]
    XScale,
    #[key(name = "yScale")]
    YScale,
    #[key(name = "rotation")]
    Rotation,
    #[key(name = "width")]
    Width,
    #[key(name = "height")]
    Height,
    #[key(name = "xOrigin", deprecated)]
    XOrigin,
    #[key(name = "yOrigin", deprecated)]
    YOrigin,
}

pub struct DisplayVTable;

pub static DISPLAY: DisplayVTable = DisplayVTable;

impl DisplayVTable {
    fn value(&self, access: &mut PropertyAccess<'_>, key: DisplayKey) -> i32 {
        if key.is_method() {
            access.state.push_function(key.name());
            return 1;
        }

        let id = access.object;
        let stage = access.scene.stage();
        let on_stage = access.scene.is_on_stage(id);
        let Some(object) = access.object() else {
            return 0;
        };
        let mask = object.mask.as_ref().map(|m| m.transform).unwrap_or_default();

        let value = match key {
            DisplayKey::StageBounds | DisplayKey::ContentBounds => {
                let bounds = access.scene.content_bounds(id);
                push_rect(access.state, bounds);
                return 1;
            }
            DisplayKey::StageWidth | DisplayKey::ContentWidth => {
                let bounds = access.scene.content_bounds(id);
                ScriptValue::Number(bounds.width().trunc() as f64)
            }
            DisplayKey::StageHeight | DisplayKey::ContentHeight => {
                let bounds = access.scene.content_bounds(id);
                ScriptValue::Number(bounds.height().trunc() as f64)
            }
            DisplayKey::NumChildren => ScriptValue::Nil,
            DisplayKey::Length => {
                tracing::warn!("object.length is deprecated, use group.numChildren");
                ScriptValue::Number(object.children().len() as f64)
            }
            DisplayKey::IsVisible => object.is_visible().into(),
            DisplayKey::IsHitTestable => object.flags.contains(ObjectFlags::HIT_TESTABLE).into(),
            DisplayKey::Alpha => ScriptValue::Number(object.alpha as f64 / 255.0),
            DisplayKey::Parent => {
                // Only objects under the stage report a parent
                let parent = object.parent().filter(|_| on_stage);
                access.push_object(parent);
                return 1;
            }
            DisplayKey::Stage => {
                access.push_object(on_stage.then_some(stage));
                return 1;
            }
            DisplayKey::X => object.transform.x.into(),
            DisplayKey::Y => object.transform.y.into(),
            DisplayKey::AnchorX => object.anchor.0.into(),
            DisplayKey::AnchorY => object.anchor.1.into(),
            DisplayKey::MaskX => mask.x.into(),
            DisplayKey::MaskY => mask.y.into(),
            DisplayKey::MaskScaleX => mask.x_scale.into(),
            DisplayKey::MaskScaleY => mask.y_scale.into(),
            DisplayKey::MaskRotation => mask.rotation.into(),
            DisplayKey::IsHitTestMasked => {
                object.flags.contains(ObjectFlags::HIT_TEST_MASKED).into()
            }
            _ => return 0,
        };
        access.state.push(value);
        1
    }

    fn set_value(&self, access: &mut PropertyAccess<'_>, key: DisplayKey, value_index: i32) -> bool {
        let clamp = access.scene.clamp_anchors();
        let number = access.number(value_index);
        let truthy = access.state.to_bool(value_index);
        let is_number = matches!(access.state.get(value_index), Some(ScriptValue::Number(_)));

        let Some(object) = access.object_mut() else {
            return false;
        };

        match key {
            DisplayKey::IsVisible => {
                object.set_flag(ObjectFlags::VISIBLE, truthy);
                object.invalidate();
            }
            DisplayKey::IsHitTestable => object.set_flag(ObjectFlags::HIT_TESTABLE, truthy),
            DisplayKey::Alpha => {
                if !(0.0..=1.0).contains(&number) {
                    tracing::warn!(
                        "object.alpha set to {} which is outside [0, 1]; clamping",
                        number
                    );
                }
                object.alpha = ((number * 255.0) as i64).clamp(0, 255) as u8;
            }
            DisplayKey::Parent | DisplayKey::Stage | DisplayKey::StageBounds => {}
            DisplayKey::X => {
                object.transform.x = number;
                object.invalidate();
            }
            DisplayKey::Y => {
                object.transform.y = number;
                object.invalidate();
            }
            DisplayKey::AnchorX | DisplayKey::AnchorY => {
                if !is_number {
                    tracing::warn!("o.{} can only be set to a number", key.name());
                    return true;
                }
                let value = if clamp { number.clamp(0.0, 1.0) } else { number };
                if key == DisplayKey::AnchorX {
                    object.anchor.0 = value;
                } else {
                    object.anchor.1 = value;
                }
                object.invalidate();
            }
            DisplayKey::MaskX
            | DisplayKey::MaskY
            | DisplayKey::MaskScaleX
            | DisplayKey::MaskScaleY
            | DisplayKey::MaskRotation => {
                if let Some(mask) = object.mask.as_mut() {
                    set_mask_property(&mut mask.transform, key, number);
                }
            }
            DisplayKey::IsHitTestMasked => object.set_flag(ObjectFlags::HIT_TEST_MASKED, truthy),
            _ => return false,
        }
        true
    }

    fn geometric_value(&self, access: &mut PropertyAccess<'_>, key: GeometricKey) -> i32 {
        let id = access.object;
        let value = match key {
            GeometricKey::Width => access.scene.get_self_bounds(id).width(),
            GeometricKey::Height => access.scene.get_self_bounds(id).height(),
            _ => {
                let Some(object) = access.object() else {
                    return 0;
                };
                let t = &object.transform;
                match key {
                    GeometricKey::XScale => t.x_scale,
                    GeometricKey::YScale => t.y_scale,
                    GeometricKey::Rotation => t.rotation,
                    GeometricKey::XOrigin => t.x,
                    _ => t.y,
                }
            }
        };
        access.state.push(value.into());
        1
    }

    fn set_geometric(&self, access: &mut PropertyAccess<'_>, key: GeometricKey, value: f32) {
        let id = access.object;
        let bounds = match key {
            GeometricKey::Width | GeometricKey::Height => access.scene.get_self_bounds(id),
            _ => Default::default(),
        };
        let Some(object) = access.object_mut() else {
            return;
        };

        let t = &mut object.transform;
        match key {
            GeometricKey::XScale => t.x_scale = value,
            GeometricKey::YScale => t.y_scale = value,
            GeometricKey::Rotation => t.rotation = value,
            // Size is reached by scaling the untransformed bounds
            GeometricKey::Width if bounds.width() > 0.0 => t.x_scale = value / bounds.width(),
            GeometricKey::Height if bounds.height() > 0.0 => t.y_scale = value / bounds.height(),
            GeometricKey::Width | GeometricKey::Height => return,
            GeometricKey::XOrigin => t.x = value,
            GeometricKey::YOrigin => t.y = value,
        }
        object.invalidate();
    }

    /// `_properties` at the root: geometric values, then display values
    fn properties(&self, access: &mut PropertyAccess<'_>) -> i32 {
        let mut map = serde_json::Map::new();
        for key in GeometricKey::visible() {
            let pushed = self.geometric_value(access, key);
            introspect::insert_popped(access.state, &mut map, key.name(), pushed);
        }
        introspect::collect::<DisplayKey>(self, access, &mut map);
        introspect::push_map(access.state, map)
    }
}

fn set_mask_property(transform: &mut Transform, key: DisplayKey, value: f32) {
    match key {
        DisplayKey::MaskX => transform.x = value,
        DisplayKey::MaskY => transform.y = value,
        DisplayKey::MaskScaleX => transform.x_scale = value,
        DisplayKey::MaskScaleY => transform.y_scale = value,
        _ => transform.rotation = value,
    }
}

impl ProxyVTable for DisplayVTable {
    fn name(&self) -> &'static str {
        "DisplayObject"
    }

    fn parent(&self) -> Option<&'static dyn ProxyVTable> {
        None
    }

    fn value_for_key(&self, access: &mut PropertyAccess<'_>, key: &str) -> i32 {
        if let Some(display) = DisplayKey::lookup(key) {
            return self.value(access, display);
        }
        if let Some(geometric) = GeometricKey::lookup(key) {
            return self.geometric_value(access, geometric);
        }

        match key {
            PROPERTIES_KEY => self.properties(access),
            TYPE_KEY => match access.object() {
                Some(object) => {
                    let name = object.kind().type_name();
                    access.state.push_str(name);
                    1
                }
                None => 0,
            },
            _ => 0,
        }
    }

    fn set_value_for_key(
        &self,
        access: &mut PropertyAccess<'_>,
        key: &str,
        value_index: i32,
    ) -> bool {
        if let Some(display) = DisplayKey::lookup(key) {
            if self.set_value(access, display, value_index) {
                return true;
            }
        }
        match GeometricKey::lookup(key) {
            Some(geometric) => {
                let value = access.number(value_index);
                self.set_geometric(access, geometric, value);
                true
            }
            None => false,
        }
    }
}
