//! Free-form annotations attached to states and transitions.

use serde::Deserialize;
use serde_json::Value;

/// Free-form `properties` annotation of a state or transition.
///
/// Graph authors write either a list of flags or a keyed map, so lookups
/// accept both shapes: a key matches a list element, a map key, or a map
/// value. Element and value matching is strict: only strings compare equal
/// to the key, so `"3"` does not match the number `3`.
///
/// # Example
///
/// ```rust
/// use graphstate::core::Properties;
/// use serde_json::json;
///
/// let flags = Properties::from(json!(["editable", "visible"]));
/// assert!(flags.contains("editable"));
///
/// let keyed = Properties::from(json!({ "color": "green" }));
/// assert!(keyed.contains("color"));
/// assert!(keyed.contains("green"));
/// assert!(!keyed.contains("red"));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct Properties(Value);

impl Properties {
    /// The raw annotation value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Keyed lookup; `None` for list-shaped annotations.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.as_object()?.get(key)
    }

    /// Dual-mode membership test (list element, map key or map string value).
    pub fn contains(&self, key: &str) -> bool {
        match &self.0 {
            Value::Array(items) => items.iter().any(|item| item.as_str() == Some(key)),
            Value::Object(map) => {
                map.contains_key(key) || map.values().any(|value| value.as_str() == Some(key))
            }
            _ => false,
        }
    }
}

impl From<Value> for Properties {
    fn from(value: Value) -> Self {
        Properties(value)
    }
}
