//! The value stack interface
//!
//! Stack indices follow the scripting runtime's convention: `1` is the bottom,
//! `-1` the top. Index `0` is never valid.

use slotmap::new_key_type;

use crate::error::ScriptError;
use crate::value::{NativeFunction, ScriptValue};

new_key_type! {
    /// Reference into the runtime registry
    pub struct RegistryRef;
}

/// Opaque stack machine owned by the scripting runtime
pub trait ScriptState {
    /// Number of values on the stack
    fn top(&self) -> usize;

    /// Truncate (or pad with nil) to exactly `top` values
    fn set_top(&mut self, top: usize);

    fn push(&mut self, value: ScriptValue);

    fn pop(&mut self) -> Option<ScriptValue>;

    /// Value at a stack index, `None` when out of range
    fn get(&self, index: i32) -> Option<&ScriptValue>;

    /// Store a value in the registry, keeping it alive until released
    fn reference(&mut self, value: ScriptValue) -> RegistryRef;

    /// Release a registry entry, returning its value
    fn unreference(&mut self, reference: RegistryRef) -> Option<ScriptValue>;

    fn registry_get(&self, reference: RegistryRef) -> Option<&ScriptValue>;

    /// Keep a value alive under an identity key
    ///
    /// Returns `false` when something is already guarded under that key.
    fn guard(&mut self, identity: usize, value: ScriptValue) -> bool;

    fn is_guarded(&self, identity: usize) -> bool;

    fn push_nil(&mut self) {
        self.push(ScriptValue::Nil);
    }

    fn push_bool(&mut self, value: bool) {
        self.push(ScriptValue::Boolean(value));
    }

    fn push_number(&mut self, value: f64) {
        self.push(ScriptValue::Number(value));
    }

    fn push_str(&mut self, value: &str) {
        self.push(ScriptValue::String(value.to_owned()));
    }

    fn push_function(&mut self, name: &'static str) {
        self.push(ScriptValue::Function(NativeFunction::new(name)));
    }

    /// Script type name at an index ("no value" when out of range)
    fn type_name_at(&self, index: i32) -> &'static str {
        self.get(index).map(ScriptValue::type_name).unwrap_or("no value")
    }

    fn to_number(&self, index: i32) -> Option<f64> {
        self.get(index).and_then(ScriptValue::as_number)
    }

    fn to_bool(&self, index: i32) -> bool {
        self.get(index).map(ScriptValue::is_truthy).unwrap_or(false)
    }

    fn to_str(&self, index: i32) -> Option<&str> {
        self.get(index).and_then(ScriptValue::as_str)
    }

    /// Numeric argument or a descriptive error
    fn check_number(&self, index: i32) -> Result<f64, ScriptError> {
        match self.get(index) {
            None | Some(ScriptValue::Nil) => Err(ScriptError::MissingArgument {
                index,
                expected: "number",
            }),
            Some(v) => v.as_number().ok_or(ScriptError::TypeMismatch {
                index,
                expected: "number",
                found: v.type_name(),
            }),
        }
    }

    /// String argument or a descriptive error
    fn check_str(&self, index: i32) -> Result<&str, ScriptError> {
        match self.get(index) {
            None | Some(ScriptValue::Nil) => Err(ScriptError::MissingArgument {
                index,
                expected: "string",
            }),
            Some(ScriptValue::String(s)) => Ok(s),
            Some(v) => Err(ScriptError::TypeMismatch {
                index,
                expected: "string",
                found: v.type_name(),
            }),
        }
    }
}
