//! Groups, containers and the stage

use super::display::DISPLAY;
use super::introspect::{self, PROPERTIES_KEY};
use super::{PropertyAccess, ProxyVTable};
use crate::scene::ObjectFlags;
use crate::PropertyKeys;
use stagehook_engine::ScriptValue;

#[derive(Debug, Clone, Copy, PartialEq, PropertyKeys)]
#[keys(table_start = 0, hash_chars = 1)]
pub enum GroupKey {
    #[key(name = "insert")]
    Insert,
    #[key(name = "remove")]
    Remove,
    #[key(name = "numChildren")]
    NumChildren,
    #[key(name = "anchorChildren")]
    AnchorChildren,
}

#[derive(Debug, Clone, Copy, PartialEq, PropertyKeys)]
pub enum StageKey {
    #[key(name = "setFocus")]
    SetFocus,
}

pub struct GroupVTable;

pub static GROUP: GroupVTable = GroupVTable;

pub struct StageVTable;

pub static STAGE: StageVTable = StageVTable;

/// One-based child index, for keys like `group[2]`
fn child_index(key: &str) -> Option<usize> {
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

impl GroupVTable {
    fn value(&self, access: &mut PropertyAccess<'_>, key: GroupKey) -> i32 {
        let Some(object) = access.object() else {
            return 0;
        };
        let value = match key {
            GroupKey::Insert | GroupKey::Remove => {
                access.state.push_function(key.name());
                return 1;
            }
            GroupKey::NumChildren => ScriptValue::Number(object.children().len() as f64),
            GroupKey::AnchorChildren => object.flags.contains(ObjectFlags::ANCHOR_CHILDREN).into(),
        };
        access.state.push(value);
        1
    }

    fn child(&self, access: &mut PropertyAccess<'_>, index: usize) -> i32 {
        let child = index
            .checked_sub(1)
            .and_then(|i| access.object()?.children().get(i).copied());
        access.push_object(child);
        1
    }
}

impl ProxyVTable for GroupVTable {
    fn name(&self) -> &'static str {
        "GroupObject"
    }

    fn parent(&self) -> Option<&'static dyn ProxyVTable> {
        Some(&DISPLAY)
    }

    fn value_for_key(&self, access: &mut PropertyAccess<'_>, key: &str) -> i32 {
        if let Some(index) = child_index(key) {
            return self.child(access, index);
        }
        match GroupKey::lookup(key) {
            Some(group) => {
                let pushed = self.value(access, group);
                if pushed > 0 {
                    return pushed;
                }
            }
            None if key == PROPERTIES_KEY => {
                return introspect::extend::<GroupKey>(self, &DISPLAY, access);
            }
            None => {}
        }
        DISPLAY.value_for_key(access, key)
    }

    fn set_value_for_key(
        &self,
        access: &mut PropertyAccess<'_>,
        key: &str,
        value_index: i32,
    ) -> bool {
        match GroupKey::lookup(key) {
            Some(GroupKey::AnchorChildren) => {
                let on = access.state.to_bool(value_index);
                if let Some(object) = access.object_mut() {
                    object.set_flag(ObjectFlags::ANCHOR_CHILDREN, on);
                    object.invalidate();
                }
                true
            }
            // Methods and the child count are read-only
            Some(_) => true,
            None => DISPLAY.set_value_for_key(access, key, value_index),
        }
    }
}

impl ProxyVTable for StageVTable {
    fn name(&self) -> &'static str {
        "StageObject"
    }

    fn parent(&self) -> Option<&'static dyn ProxyVTable> {
        Some(&GROUP)
    }

    fn value_for_key(&self, access: &mut PropertyAccess<'_>, key: &str) -> i32 {
        match StageKey::lookup(key) {
            Some(StageKey::SetFocus) => {
                access.state.push_function(StageKey::SetFocus.name());
                1
            }
            None if key == PROPERTIES_KEY => introspect::extend::<StageKey>(self, &GROUP, access),
            None => GROUP.value_for_key(access, key),
        }
    }

    fn set_value_for_key(
        &self,
        access: &mut PropertyAccess<'_>,
        key: &str,
        value_index: i32,
    ) -> bool {
        match StageKey::lookup(key) {
            Some(_) => true,
            None => GROUP.set_value_for_key(access, key, value_index),
        }
    }
}
