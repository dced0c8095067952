//! Particle emitter properties
//!
//! The tuning values map one to one onto [`EmitterData::fields`], in key
//! order after `absolutePosition`.
//!
//! [`EmitterData::fields`]: crate::scene::EmitterData::fields

use super::display::DISPLAY;
use super::introspect::{self, PROPERTIES_KEY};
use super::{PropertyAccess, ProxyVTable};
use crate::scene::{AbsolutePosition, EmitterState, EMITTER_FIELDS};
use crate::PropertyKeys;
use stagehook_engine::ScriptValue;

#[derive(Debug, Clone, Copy, PartialEq, PropertyKeys)]
#[keys(table_start = 12, hash_chars = 14)]
pub enum EmitterKey {
    #[key(name = "absolutePosition")]
    AbsolutePosition,
    #[key(name = "gravityx")]
    GravityX,
    #[key(name = "gravityy")]
    GravityY,
    #[key(name = "startColorRed")]
    StartColorRed,
    #[key(name = "startColorGreen")]
    StartColorGreen,
    #[key(name = "startColorBlue")]
    StartColorBlue,
    #[key(name = "startColorAlpha")]
    StartColorAlpha,
    #[key(name = "startColorVarianceRed")]
    StartColorVarianceRed,
    #[key(name = "startColorVarianceGreen")]
    StartColorVarianceGreen,
    #[key(name = "startColorVarianceBlue")]
    StartColorVarianceBlue,
    #[key(name = "startColorVarianceAlpha")]
    StartColorVarianceAlpha,
    #[key(name = "finishColorRed")]
    FinishColorRed,
    #[key(name = "finishColorGreen")]
    FinishColorGreen,
    #[key(name = "finishColorBlue")]
    FinishColorBlue,
    #[key(name = "finishColorAlpha")]
    FinishColorAlpha,
    #[key(name = "finishColorVarianceRed")]
    FinishColorVarianceRed,
    #[key(name = "finishColorVarianceGreen")]
    FinishColorVarianceGreen,
    #[key(name = "finishColorVarianceBlue")]
    FinishColorVarianceBlue,
    #[key(name = "finishColorVarianceAlpha")]
    FinishColorVarianceAlpha,
    #[key(name = "startParticleSize")]
    StartParticleSize,
    #[key(name = "startParticleSizeVariance")]
    StartParticleSizeVariance,
    #[key(name = "finishParticleSize")]
    FinishParticleSize,
    #[key(name = "finishParticleSizeVariance")]
    FinishParticleSizeVariance,
    #[key(name = "maxRadius")]
    MaxRadius,
    #[key(name = "maxRadiusVariance")]
    MaxRadiusVariance,
    #[key(name = "minRadius")]
    MinRadius,
    #[key(name = "minRadiusVariance")]
    MinRadiusVariance,
    #[key(name = "rotatePerSecond")]
    RotatePerSecond,
    #[key(name = "rotatePerSecondVariance")]
    RotatePerSecondVariance,
    #[key(name = "rotationStart")]
    RotationStart,
    #[key(name = "rotationStartVariance")]
    RotationStartVariance,
    #[key(name = "rotationEnd")]
    RotationEnd,
    #[key(name = "rotationEndVariance")]
    RotationEndVariance,
    #[key(name = "speed")]
    Speed,
    #[key(name = "speedVariance")]
    SpeedVariance,
    #[key(name = "emissionRateInParticlesPerSeconds")]
    EmissionRate,
    #[key(name = "radialAcceleration")]
    RadialAcceleration,
    #[key(name = "radialAccelVariance")]
    RadialAccelVariance,
    #[key(name = "tangentialAcceleration")]
    TangentialAcceleration,
    #[key(name = "tangentialAccelVariance")]
    TangentialAccelVariance,
    #[key(name = "sourcePositionVariancex")]
    SourcePositionVarianceX,
    #[key(name = "sourcePositionVariancey")]
    SourcePositionVarianceY,
    #[key(name = "angle")]
    Angle,
    #[key(name = "angleVariance")]
    AngleVariance,
    #[key(name = "particleLifespan")]
    ParticleLifespan,
    #[key(name = "particleLifespanVariance")]
    ParticleLifespanVariance,
    #[key(name = "duration")]
    Duration,
    #[key(name = "maxParticles")]
    MaxParticles,
    #[key(name = "start")]
    Start,
    #[key(name = "stop")]
    Stop,
    #[key(name = "pause")]
    Pause,
    #[key(name = "state")]
    State,
}

impl EmitterKey {
    /// Slot in [`EmitterData::fields`](crate::scene::EmitterData::fields)
    pub fn field_index(self) -> Option<usize> {
        let index = self.index();
        (1..=EMITTER_FIELDS).contains(&index).then(|| index - 1)
    }

    fn is_method(self) -> bool {
        matches!(self, Self::Start | Self::Stop | Self::Pause)
    }
}

pub struct EmitterVTable;

pub static EMITTER: EmitterVTable = EmitterVTable;

impl EmitterVTable {
    fn value(&self, access: &mut PropertyAccess<'_>, key: EmitterKey) -> i32 {
        if key.is_method() {
            access.state.push_function(key.name());
            return 1;
        }
        let Some(emitter) = access.object().and_then(|o| o.emitter()) else {
            return 0;
        };

        let value = match key {
            EmitterKey::AbsolutePosition => match emitter.absolute_position {
                AbsolutePosition::Group(group) => {
                    access.push_object(Some(group));
                    return 1;
                }
                AbsolutePosition::Parent => true.into(),
                AbsolutePosition::Off => false.into(),
            },
            EmitterKey::MaxParticles => ScriptValue::Number(emitter.max_particles as f64),
            EmitterKey::State => emitter.state.name().into(),
            _ => match key.field_index() {
                Some(field) => emitter.fields[field].into(),
                None => return 0,
            },
        };
        access.state.push(value);
        1
    }

    fn set_value(&self, access: &mut PropertyAccess<'_>, key: EmitterKey, value_index: i32) -> bool {
        match key {
            EmitterKey::AbsolutePosition => self.set_absolute_position(access, value_index),
            EmitterKey::MaxParticles
            | EmitterKey::Start
            | EmitterKey::Stop
            | EmitterKey::Pause
            | EmitterKey::State => {}
            _ => {
                let value = access.number(value_index);
                let (Some(field), Some(emitter)) =
                    (key.field_index(), access.object_mut().and_then(|o| o.emitter_mut()))
                else {
                    return false;
                };
                emitter.fields[field] = value;
            }
        }
        true
    }

    /// A group proxy pins particles to that group; any other truthy value
    /// pins them to the parent
    fn set_absolute_position(&self, access: &mut PropertyAccess<'_>, value_index: i32) {
        let id = access.object;
        let position = match access.object_at(value_index) {
            Some(group) if access.scene.get(group).is_some_and(|o| o.is_group()) => {
                if !access.scene.is_ancestor(group, id) {
                    tracing::warn!(
                        "emitter.absolutePosition group {:?} is not an ancestor of the emitter",
                        group
                    );
                }
                AbsolutePosition::Group(group)
            }
            _ if access.state.to_bool(value_index) => AbsolutePosition::Parent,
            _ => AbsolutePosition::Off,
        };
        if let Some(emitter) = access.object_mut().and_then(|o| o.emitter_mut()) {
            emitter.absolute_position = position;
        }
    }
}

impl ProxyVTable for EmitterVTable {
    fn name(&self) -> &'static str {
        "EmitterObject"
    }

    fn parent(&self) -> Option<&'static dyn ProxyVTable> {
        Some(&DISPLAY)
    }

    fn value_for_key(&self, access: &mut PropertyAccess<'_>, key: &str) -> i32 {
        match EmitterKey::lookup(key) {
            Some(emitter) => match self.value(access, emitter) {
                0 => DISPLAY.value_for_key(access, key),
                pushed => pushed,
            },
            None if key == PROPERTIES_KEY => {
                introspect::extend::<EmitterKey>(self, &DISPLAY, access)
            }
            None => DISPLAY.value_for_key(access, key),
        }
    }

    fn set_value_for_key(
        &self,
        access: &mut PropertyAccess<'_>,
        key: &str,
        value_index: i32,
    ) -> bool {
        if let Some(emitter) = EmitterKey::lookup(key) {
            if self.set_value(access, emitter, value_index) {
                return true;
            }
        }
        DISPLAY.set_value_for_key(access, key, value_index)
    }
}

impl EmitterState {
    /// State after one of the playback methods
    pub(crate) fn after(self, method: EmitterKey) -> Self {
        match method {
            EmitterKey::Start => Self::Playing,
            EmitterKey::Stop => Self::Stopped,
            EmitterKey::Pause => Self::Paused,
            _ => self,
        }
    }
}
