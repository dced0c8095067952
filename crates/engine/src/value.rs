//! Values exchanged with the scripting runtime

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A dynamically typed script value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ScriptValue {
    #[default]
    Nil,
    Boolean(bool),
    Number(f64),
    String(String),
    /// Bound native method, resolved by name when called
    Function(NativeFunction),
    /// Script-visible proxy for a scene object
    Proxy(ProxyRef),
    /// Table with string keys; array parts use the keys "1", "2", ...
    Table(Vec<(String, ScriptValue)>),
    Userdata(Userdata),
}

impl ScriptValue {
    /// Script-facing type name
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Boolean(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Function(_) => "function",
            Self::Proxy(_) | Self::Table(_) => "table",
            Self::Userdata(_) => "userdata",
        }
    }

    /// Script truthiness: only nil and false are false
    #[inline]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Self::Nil | Self::Boolean(false))
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Numeric value, converting numeric strings
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// String value, without number conversion
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Build a table from named fields
    pub fn table<K: Into<String>>(fields: impl IntoIterator<Item = (K, ScriptValue)>) -> Self {
        Self::Table(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build an array-style table
    pub fn array(items: impl IntoIterator<Item = ScriptValue>) -> Self {
        Self::Table(
            items
                .into_iter()
                .enumerate()
                .map(|(i, v)| ((i + 1).to_string(), v))
                .collect(),
        )
    }

    /// Field of a table value
    pub fn field(&self, name: &str) -> Option<&ScriptValue> {
        match self {
            Self::Table(entries) => entries.iter().find(|(k, _)| k == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Consecutive array items starting at key "1"
    pub fn array_items(&self) -> Vec<&ScriptValue> {
        let mut items = Vec::new();
        if let Self::Table(_) = self {
            let mut i = 1usize;
            while let Some(v) = self.field(&i.to_string()) {
                items.push(v);
                i += 1;
            }
        }
        items
    }
}

impl From<bool> for ScriptValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<f64> for ScriptValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<f32> for ScriptValue {
    fn from(v: f32) -> Self {
        Self::Number(v as f64)
    }
}

impl From<&str> for ScriptValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<String> for ScriptValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

/// Native method pushed as a property value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeFunction {
    pub name: &'static str,
}

impl NativeFunction {
    #[inline]
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }
}

/// Opaque identity of a proxied scene object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProxyRef(pub u64);

/// Native data owned by the runtime
///
/// The metatable name identifies what the data is; consumers check it before
/// downcasting.
#[derive(Clone)]
pub struct Userdata {
    metatable: &'static str,
    data: Arc<dyn Any + Send + Sync>,
}

impl Userdata {
    pub fn new(metatable: &'static str, data: Arc<dyn Any + Send + Sync>) -> Self {
        Self { metatable, data }
    }

    #[inline]
    pub fn metatable(&self) -> &'static str {
        self.metatable
    }

    /// Typed shared access, if the metatable matches and the type fits
    pub fn downcast<T: Any + Send + Sync>(&self, metatable: &str) -> Option<Arc<T>> {
        if self.metatable != metatable {
            return None;
        }
        Arc::clone(&self.data).downcast::<T>().ok()
    }

    /// Address of the shared allocation, stable while any clone lives
    pub fn identity(&self) -> usize {
        Arc::as_ptr(&self.data) as *const () as usize
    }
}

impl PartialEq for Userdata {
    fn eq(&self, other: &Self) -> bool {
        self.metatable == other.metatable && self.identity() == other.identity()
    }
}

impl fmt::Debug for Userdata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Userdata({}: {:#x})", self.metatable, self.identity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!ScriptValue::Nil.is_truthy());
        assert!(!ScriptValue::Boolean(false).is_truthy());
        assert!(ScriptValue::Number(0.0).is_truthy());
        assert!(ScriptValue::from("").is_truthy());
    }

    #[test]
    fn test_numeric_strings() {
        assert_eq!(ScriptValue::from("12.5").as_number(), Some(12.5));
        assert_eq!(ScriptValue::from("abc").as_number(), None);
        assert_eq!(ScriptValue::Boolean(true).as_number(), None);
    }

    #[test]
    fn test_array_items() {
        let t = ScriptValue::array([1.0, 2.0, 3.0].map(ScriptValue::Number));
        let items = t.array_items();
        assert_eq!(items.len(), 3);
        assert_eq!(items[2].as_number(), Some(3.0));
        assert_eq!(t.type_name(), "table");
    }

    #[test]
    fn test_userdata_downcast_checks_metatable() {
        let ud = Userdata::new("numbers", Arc::new(42u32));
        assert_eq!(ud.downcast::<u32>("numbers").as_deref(), Some(&42));
        assert!(ud.downcast::<u32>("other").is_none());
        assert!(ud.downcast::<u64>("numbers").is_none());
        assert_eq!(ud.clone(), ud);
    }
}
