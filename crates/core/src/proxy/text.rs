//! Text and embossed text

use super::introspect::{self, PROPERTIES_KEY};
use super::shape::SHAPE;
use super::{PropertyAccess, ProxyVTable};
use crate::PropertyKeys;
use stagehook_engine::ScriptValue;

#[derive(Debug, Clone, Copy, PartialEq, PropertyKeys)]
#[keys(table_start = 2, hash_chars = 2)]
pub enum TextKey {
    #[key(name = "text")]
    Text,
    #[key(name = "size")]
    Size,
    #[key(name = "setMask")]
    SetMask,
    #[key(name = "setTextColor", deprecated)]
    SetTextColor,
    #[key(name = "baselineOffset")]
    BaselineOffset,
}

#[derive(Debug, Clone, Copy, PartialEq, PropertyKeys)]
#[keys(table_start = 4, hash_chars = 9)]
pub enum EmbossedTextKey {
    #[key(name = "setText")]
    SetText,
    #[key(name = "setSize")]
    SetSize,
    #[key(name = "setEmbossColor")]
    SetEmbossColor,
    #[key(name = "setTextColor")]
    SetTextColor,
    #[key(name = "setFillColor")]
    SetFillColor,
}

pub struct TextVTable;

pub static TEXT: TextVTable = TextVTable;

pub struct EmbossedTextVTable;

pub static EMBOSSED_TEXT: EmbossedTextVTable = EmbossedTextVTable;

impl TextVTable {
    fn value(&self, access: &mut PropertyAccess<'_>, key: TextKey) -> i32 {
        let Some(text) = access.object().and_then(|o| o.text()) else {
            return 0;
        };
        let value = match key {
            TextKey::Text => text.text.as_str().into(),
            TextKey::Size => text.size.into(),
            TextKey::BaselineOffset => text.baseline_offset.into(),
            // Text cannot be masked
            TextKey::SetMask => return 0,
            TextKey::SetTextColor => {
                access.state.push_function("setFillColor");
                return 1;
            }
        };
        access.state.push(value);
        1
    }

    fn set_value(&self, access: &mut PropertyAccess<'_>, key: TextKey, value_index: i32) -> bool {
        let string = access.state.get(value_index).and_then(|v| match v {
            ScriptValue::String(s) => Some(s.clone()),
            ScriptValue::Number(n) => Some(n.to_string()),
            _ => None,
        });
        let size = access.state.to_number(value_index);

        let Some(object) = access.object_mut() else {
            return false;
        };
        let Some(text) = object.text_mut() else {
            return false;
        };

        match key {
            TextKey::Text => match string {
                Some(s) => text.text = s,
                None => tracing::warn!("text.text expects a string"),
            },
            TextKey::Size => match size {
                Some(size) if size > 0.0 => text.size = size as f32,
                _ => tracing::warn!("text.size expects a positive number"),
            },
            TextKey::SetMask | TextKey::SetTextColor | TextKey::BaselineOffset => return true,
        }
        object.invalidate();
        true
    }
}

impl ProxyVTable for TextVTable {
    fn name(&self) -> &'static str {
        "TextObject"
    }

    fn parent(&self) -> Option<&'static dyn ProxyVTable> {
        Some(&SHAPE)
    }

    fn value_for_key(&self, access: &mut PropertyAccess<'_>, key: &str) -> i32 {
        match TextKey::lookup(key) {
            Some(TextKey::SetMask) => 0,
            Some(text) => match self.value(access, text) {
                0 => SHAPE.value_for_key(access, key),
                pushed => pushed,
            },
            None if key == PROPERTIES_KEY => introspect::extend::<TextKey>(self, &SHAPE, access),
            None => SHAPE.value_for_key(access, key),
        }
    }

    fn set_value_for_key(
        &self,
        access: &mut PropertyAccess<'_>,
        key: &str,
        value_index: i32,
    ) -> bool {
        if let Some(text) = TextKey::lookup(key) {
            if self.set_value(access, text, value_index) {
                return true;
            }
        }
        SHAPE.set_value_for_key(access, key, value_index)
    }
}

impl ProxyVTable for EmbossedTextVTable {
    fn name(&self) -> &'static str {
        "EmbossedTextObject"
    }

    fn parent(&self) -> Option<&'static dyn ProxyVTable> {
        Some(&TEXT)
    }

    fn value_for_key(&self, access: &mut PropertyAccess<'_>, key: &str) -> i32 {
        match EmbossedTextKey::lookup(key) {
            Some(
                method @ (EmbossedTextKey::SetText
                | EmbossedTextKey::SetSize
                | EmbossedTextKey::SetEmbossColor),
            ) => {
                access.state.push_function(method.name());
                1
            }
            Some(EmbossedTextKey::SetTextColor | EmbossedTextKey::SetFillColor) => {
                // A flat color replaces the emboss effect
                if let Some(text) = access.object_mut().and_then(|o| o.text_mut()) {
                    text.emboss = None;
                }
                TEXT.value_for_key(access, key)
            }
            // Emboss colors are not data, so enumeration is the text's
            None => TEXT.value_for_key(access, key),
        }
    }

    fn set_value_for_key(
        &self,
        access: &mut PropertyAccess<'_>,
        key: &str,
        value_index: i32,
    ) -> bool {
        TEXT.set_value_for_key(access, key, value_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::tests::{get, set};
    use crate::proxy::value_for_key;
    use crate::scene::{Color, KindData, ObjectId, Scene, TextData};
    use stagehook_engine::{MemoryState, NativeFunction};
    use stagehook_sdk::ObjectKind;

    fn text(scene: &mut Scene, kind: ObjectKind) -> ObjectId {
        let mut data = TextData::new("hello", "sans", 10.0);
        if kind == ObjectKind::EmbossedText {
            data.emboss = Some((Color::WHITE, Color::BLACK));
        }
        let id = scene.create(kind, KindData::Text(data));
        let stage = scene.stage();
        scene.insert(stage, None, id);
        id
    }

    #[test]
    fn test_text_and_size() {
        let mut scene = Scene::new();
        let mut state = MemoryState::new();
        let id = text(&mut scene, ObjectKind::Text);

        assert_eq!(get(&mut scene, &mut state, id, "text"), ScriptValue::from("hello"));
        assert!(set(&mut scene, &mut state, id, "text", "bye".into()));
        assert!(set(&mut scene, &mut state, id, "size", ScriptValue::Number(20.0)));
        let data = scene.get(id).unwrap().text().unwrap();
        assert_eq!(data.text, "bye");
        assert_eq!(data.size, 20.0);

        // Numbers become their string form
        assert!(set(&mut scene, &mut state, id, "text", ScriptValue::Number(3.0)));
        assert_eq!(get(&mut scene, &mut state, id, "text"), ScriptValue::from("3"));
    }

    #[test]
    fn test_set_mask_is_a_miss() {
        let mut scene = Scene::new();
        let mut state = MemoryState::new();
        let id = text(&mut scene, ObjectKind::Text);
        assert_eq!(value_for_key(&mut scene, &mut state, id, "setMask"), 0);
    }

    #[test]
    fn test_shape_keys_reach_text() {
        let mut scene = Scene::new();
        let mut state = MemoryState::new();
        let id = text(&mut scene, ObjectKind::Text);

        assert_eq!(
            get(&mut scene, &mut state, id, "setTextColor"),
            ScriptValue::Function(NativeFunction::new("setFillColor"))
        );
        assert!(set(&mut scene, &mut state, id, "fill", ScriptValue::Number(0.0)));
        assert_eq!(
            scene.get(id).unwrap().shape().unwrap().fill,
            Some(Color::BLACK)
        );
    }

    #[test]
    fn test_embossed_text() {
        let mut scene = Scene::new();
        let mut state = MemoryState::new();
        let id = text(&mut scene, ObjectKind::EmbossedText);

        assert_eq!(
            get(&mut scene, &mut state, id, "setEmbossColor"),
            ScriptValue::Function(NativeFunction::new("setEmbossColor"))
        );
        assert_eq!(get(&mut scene, &mut state, id, "text"), ScriptValue::from("hello"));
        assert!(scene.get(id).unwrap().text().unwrap().emboss.is_some());

        // Reaching for a flat color drops the emboss
        assert!(matches!(
            get(&mut scene, &mut state, id, "setFillColor"),
            ScriptValue::Function(_)
        ));
        assert!(scene.get(id).unwrap().text().unwrap().emboss.is_none());
        assert_eq!(
            get(&mut scene, &mut state, id, "_type"),
            ScriptValue::from("EmbossedTextObject")
        );
    }
}
