//! Animated sprite properties

use super::introspect::{self, PROPERTIES_KEY};
use super::shape::SHAPE;
use super::{PropertyAccess, ProxyVTable};
use crate::PropertyKeys;
use stagehook_engine::ScriptValue;

/// Playback speed limits
const MIN_TIME_SCALE: f32 = 0.05;
const MAX_TIME_SCALE: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, PropertyKeys)]
#[keys(table_start = 25, hash_chars = 7)]
pub enum SpriteKey {
    #[key(name = "timeScale")]
    TimeScale,
    #[key(name = "frame")]
    Frame,
    #[key(name = "numFrames")]
    NumFrames,
    #[key(name = "isPlaying")]
    IsPlaying,
    #[key(name = "sequence")]
    Sequence,
    #[key(name = "play")]
    Play,
    #[key(name = "pause")]
    Pause,
    #[key(name = "setSequence")]
    SetSequence,
    #[key(name = "setFrame")]
    SetFrame,
    #[key(name = "useFrameForAnchors")]
    UseFrameForAnchors,
}

impl SpriteKey {
    fn is_method(self) -> bool {
        matches!(
            self,
            Self::Play | Self::Pause | Self::SetSequence | Self::SetFrame | Self::UseFrameForAnchors
        )
    }
}

pub struct SpriteVTable;

pub static SPRITE: SpriteVTable = SpriteVTable;

impl SpriteVTable {
    fn value(&self, access: &mut PropertyAccess<'_>, key: SpriteKey) -> i32 {
        if key.is_method() {
            access.state.push_function(key.name());
            return 1;
        }
        let Some(sprite) = access.object().and_then(|o| o.sprite()) else {
            return 0;
        };
        let value = match key {
            SpriteKey::TimeScale => sprite.time_scale.into(),
            SpriteKey::Frame => ScriptValue::Number(sprite.frame as f64),
            SpriteKey::NumFrames => ScriptValue::Number(sprite.num_frames as f64),
            SpriteKey::IsPlaying => sprite.playing.into(),
            SpriteKey::Sequence => match &sprite.sequence {
                Some(name) => name.as_str().into(),
                None => ScriptValue::Nil,
            },
            _ => return 0,
        };
        access.state.push(value);
        1
    }

    fn set_value(&self, access: &mut PropertyAccess<'_>, key: SpriteKey, value_index: i32) -> bool {
        if key != SpriteKey::TimeScale {
            // Everything else is read-only or a method
            return true;
        }
        let scale = access.number(value_index);
        let Some(sprite) = access.object_mut().and_then(|o| o.sprite_mut()) else {
            return false;
        };

        if !(MIN_TIME_SCALE..=MAX_TIME_SCALE).contains(&scale) {
            tracing::warn!(
                "sprite.timeScale must be in [{}, {}], got {}; clamping",
                MIN_TIME_SCALE,
                MAX_TIME_SCALE,
                scale
            );
        }
        sprite.time_scale = scale.clamp(MIN_TIME_SCALE, MAX_TIME_SCALE);
        true
    }
}

impl ProxyVTable for SpriteVTable {
    fn name(&self) -> &'static str {
        "SpriteObject"
    }

    fn parent(&self) -> Option<&'static dyn ProxyVTable> {
        Some(&SHAPE)
    }

    fn value_for_key(&self, access: &mut PropertyAccess<'_>, key: &str) -> i32 {
        match SpriteKey::lookup(key) {
            Some(sprite) => match self.value(access, sprite) {
                0 => SHAPE.value_for_key(access, key),
                pushed => pushed,
            },
            None if key == PROPERTIES_KEY => introspect::extend::<SpriteKey>(self, &SHAPE, access),
            None => SHAPE.value_for_key(access, key),
        }
    }

    fn set_value_for_key(
        &self,
        access: &mut PropertyAccess<'_>,
        key: &str,
        value_index: i32,
    ) -> bool {
        if let Some(sprite) = SpriteKey::lookup(key) {
            if self.set_value(access, sprite, value_index) {
                return true;
            }
        }
        SHAPE.set_value_for_key(access, key, value_index)
    }
}
