//! In-memory scripting runtime
//!
//! A plain stack plus registry, enough to drive the core without a real
//! interpreter. Hosts embedding a real runtime implement [`ScriptState`]
//! over its API instead.

use std::collections::HashMap;

use slotmap::SlotMap;

use crate::state::{RegistryRef, ScriptState};
use crate::value::ScriptValue;

/// Vector-backed [`ScriptState`]
#[derive(Debug, Default)]
pub struct MemoryState {
    stack: Vec<ScriptValue>,
    registry: SlotMap<RegistryRef, ScriptValue>,
    guards: HashMap<usize, ScriptValue>,
}

impl MemoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the given values on the stack, bottom first
    pub fn with_stack(values: impl IntoIterator<Item = ScriptValue>) -> Self {
        Self {
            stack: values.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Current stack contents, bottom first
    pub fn stack(&self) -> &[ScriptValue] {
        &self.stack
    }

    /// Number of live registry entries
    pub fn registry_len(&self) -> usize {
        self.registry.len()
    }

    fn absolute(&self, index: i32) -> Option<usize> {
        let len = self.stack.len() as i64;
        let index = index as i64;
        let abs = if index > 0 { index } else { len + index + 1 };
        (abs >= 1 && abs <= len).then(|| abs as usize - 1)
    }
}

impl ScriptState for MemoryState {
    fn top(&self) -> usize {
        self.stack.len()
    }

    fn set_top(&mut self, top: usize) {
        self.stack.resize(top, ScriptValue::Nil);
    }

    fn push(&mut self, value: ScriptValue) {
        self.stack.push(value);
    }

    fn pop(&mut self) -> Option<ScriptValue> {
        self.stack.pop()
    }

    fn get(&self, index: i32) -> Option<&ScriptValue> {
        self.absolute(index).map(|i| &self.stack[i])
    }

    fn reference(&mut self, value: ScriptValue) -> RegistryRef {
        let key = self.registry.insert(value);
        tracing::trace!("registry ref {:?} created", key);
        key
    }

    fn unreference(&mut self, reference: RegistryRef) -> Option<ScriptValue> {
        let value = self.registry.remove(reference);
        if value.is_some() {
            tracing::trace!("registry ref {:?} released", reference);
        }
        value
    }

    fn registry_get(&self, reference: RegistryRef) -> Option<&ScriptValue> {
        self.registry.get(reference)
    }

    fn guard(&mut self, identity: usize, value: ScriptValue) -> bool {
        if self.guards.contains_key(&identity) {
            return false;
        }
        self.guards.insert(identity, value);
        true
    }

    fn is_guarded(&self, identity: usize) -> bool {
        self.guards.contains_key(&identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScriptError;

    #[test]
    fn test_stack_indices() {
        let state = MemoryState::with_stack([
            ScriptValue::Number(1.0),
            ScriptValue::from("two"),
            ScriptValue::Boolean(true),
        ]);
        assert_eq!(state.top(), 3);
        assert_eq!(state.to_number(1), Some(1.0));
        assert_eq!(state.to_str(-2), Some("two"));
        assert!(state.to_bool(-1));
        assert!(state.get(0).is_none());
        assert!(state.get(4).is_none());
        assert!(state.get(-4).is_none());
    }

    #[test]
    fn test_set_top_pads_and_truncates() {
        let mut state = MemoryState::new();
        state.set_top(2);
        assert_eq!(state.top(), 2);
        assert!(state.get(1).unwrap().is_nil());
        state.push_number(5.0);
        state.set_top(0);
        assert_eq!(state.top(), 0);
    }

    #[test]
    fn test_check_errors() {
        let state = MemoryState::with_stack([ScriptValue::Boolean(true)]);
        assert_eq!(
            state.check_number(1),
            Err(ScriptError::TypeMismatch {
                index: 1,
                expected: "number",
                found: "boolean"
            })
        );
        assert_eq!(
            state.check_str(2),
            Err(ScriptError::MissingArgument {
                index: 2,
                expected: "string"
            })
        );
    }

    #[test]
    fn test_registry_lifecycle() {
        let mut state = MemoryState::new();
        let r = state.reference(ScriptValue::from("kept"));
        assert_eq!(state.registry_get(r).and_then(|v| v.as_str()), Some("kept"));
        assert!(state.unreference(r).is_some());
        assert!(state.registry_get(r).is_none());
        assert!(state.unreference(r).is_none());
    }

    #[test]
    fn test_guard_once_per_identity() {
        let mut state = MemoryState::new();
        assert!(state.guard(0x1000, ScriptValue::Nil));
        assert!(!state.guard(0x1000, ScriptValue::Nil));
        assert!(state.is_guarded(0x1000));
        assert!(!state.is_guarded(0x2000));
    }
}
