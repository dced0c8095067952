//! `_properties` and `_type`
//!
//! `_properties` is a JSON object built root first: the root encodes its own
//! keys, then every level below reads its parent's object back and adds its
//! own non-deprecated keys. Bound methods are left out.

use serde_json::{Map, Value};

use super::{PropertyAccess, ProxyVTable};
use crate::PropertyKeys;
use stagehook_engine::{ScriptState, ScriptValue};

/// Introspection key answered with a JSON object of readable properties
pub const PROPERTIES_KEY: &str = "_properties";

/// Introspection key answered with the object's type name
pub const TYPE_KEY: &str = "_type";

/// JSON form of a script value; `None` for values that are not data
pub(crate) fn to_json(value: &ScriptValue) -> Option<Value> {
    Some(match value {
        ScriptValue::Nil | ScriptValue::Proxy(_) | ScriptValue::Userdata(_) => Value::Null,
        ScriptValue::Boolean(b) => Value::Bool(*b),
        ScriptValue::Number(n) => serde_json::Number::from_f64(*n)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ScriptValue::String(s) => Value::String(s.clone()),
        ScriptValue::Function(_) => return None,
        ScriptValue::Table(entries) => Value::Object(
            entries
                .iter()
                .filter_map(|(k, v)| Some((k.clone(), to_json(v)?)))
                .collect(),
        ),
    })
}

/// Pop `pushed` values and record them under `name`
///
/// Several values become an array.
pub(crate) fn insert_popped(
    state: &mut dyn ScriptState,
    map: &mut Map<String, Value>,
    name: &str,
    pushed: i32,
) {
    let mut values = Vec::new();
    for _ in 0..pushed {
        if let Some(value) = state.pop() {
            values.push(value);
        }
    }
    values.reverse();

    let json = match values.as_slice() {
        [] => return,
        [single] => to_json(single),
        many => many.iter().map(to_json).collect::<Option<Vec<_>>>().map(Value::Array),
    };
    if let Some(json) = json {
        map.insert(name.to_owned(), json);
    }
}

/// Add every visible key of `K`, read through `vtable`
pub(crate) fn collect<K: PropertyKeys>(
    vtable: &dyn ProxyVTable,
    access: &mut PropertyAccess<'_>,
    map: &mut Map<String, Value>,
) {
    for key in K::visible() {
        let pushed = vtable.value_for_key(access, key.name());
        insert_popped(access.state, map, key.name(), pushed);
    }
}

pub(crate) fn push_map(state: &mut dyn ScriptState, map: Map<String, Value>) -> i32 {
    match serde_json::to_string(&Value::Object(map)) {
        Ok(json) => state.push_str(&json),
        Err(e) => {
            tracing::warn!("Failed to encode properties: {}", e);
            state.push_nil();
        }
    }
    1
}

/// `_properties` for a level below the root
pub(crate) fn extend<K: PropertyKeys>(
    vtable: &dyn ProxyVTable,
    parent: &dyn ProxyVTable,
    access: &mut PropertyAccess<'_>,
) -> i32 {
    let pushed = parent.value_for_key(access, PROPERTIES_KEY);
    let mut map = Map::new();
    if pushed > 0 {
        let inherited = access.state.pop();
        if let Some(Ok(Value::Object(inherited))) = inherited
            .as_ref()
            .and_then(ScriptValue::as_str)
            .map(serde_json::from_str::<Value>)
        {
            map = inherited;
        }
        for _ in 1..pushed {
            access.state.pop();
        }
    }

    collect::<K>(vtable, access, &mut map);
    push_map(access.state, map)
}
