//! State access contract between the engine and domain objects.
//!
//! The engine never touches a domain object's fields directly. It reads and
//! writes the state value through a [`StateAccessor`], addressed by the
//! graph's property path.

use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while reading or writing a state property.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AccessError {
    /// The object has no property at the given path.
    #[error("No such property \"{path}\"")]
    NoSuchProperty { path: String },

    /// The property exists but holds no state value (null or a container).
    #[error("Property \"{path}\" does not hold a state value")]
    NotAState { path: String },
}

/// Reads and writes the state value of a domain object.
///
/// `NoSuchProperty` must be returned when the path does not resolve, since
/// engine construction relies on it to report misconfigured graphs.
/// `NotAState` is for a property that exists without a state value; the
/// engine treats the object as being in no state.
pub trait StateAccessor<O: ?Sized> {
    /// Read the current state value at `path`.
    fn get(&self, object: &O, path: &str) -> Result<String, AccessError>;

    /// Write `value` as the new state at `path`.
    fn set(&self, object: &mut O, path: &str, value: &str) -> Result<(), AccessError>;
}

/// Domain objects that expose their state properties by path.
///
/// # Example
///
/// ```rust
/// use graphstate::core::Stateful;
///
/// struct Article {
///     status: String,
/// }
///
/// impl Stateful for Article {
///     fn read_property(&self, path: &str) -> Option<String> {
///         (path == "status").then(|| self.status.clone())
///     }
///
///     fn write_property(&mut self, path: &str, value: &str) -> bool {
///         if path != "status" {
///             return false;
///         }
///         self.status = value.to_string();
///         true
///     }
/// }
///
/// let mut article = Article { status: "draft".into() };
/// assert!(article.write_property("status", "published"));
/// assert_eq!(article.read_property("status").as_deref(), Some("published"));
/// assert_eq!(article.read_property("title"), None);
/// ```
pub trait Stateful {
    /// Read the property at `path`, `None` if there is no such property or
    /// it holds no state value.
    fn read_property(&self, path: &str) -> Option<String>;

    /// Whether a property exists at `path`, whatever its value.
    fn has_property(&self, path: &str) -> bool {
        self.read_property(path).is_some()
    }

    /// Write the property at `path`. Returns `false` if there is no such property.
    fn write_property(&mut self, path: &str, value: &str) -> bool;
}

/// Default accessor for any [`Stateful`] object.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyAccessor;

impl<O: Stateful + ?Sized> StateAccessor<O> for PropertyAccessor {
    fn get(&self, object: &O, path: &str) -> Result<String, AccessError> {
        match object.read_property(path) {
            Some(state) => Ok(state),
            None if object.has_property(path) => Err(AccessError::NotAState {
                path: path.to_string(),
            }),
            None => Err(AccessError::NoSuchProperty {
                path: path.to_string(),
            }),
        }
    }

    fn set(&self, object: &mut O, path: &str, value: &str) -> Result<(), AccessError> {
        if object.write_property(path, value) {
            Ok(())
        } else {
            Err(AccessError::NoSuchProperty {
                path: path.to_string(),
            })
        }
    }
}

impl Stateful for HashMap<String, String> {
    fn read_property(&self, path: &str) -> Option<String> {
        self.get(path).cloned()
    }

    fn write_property(&mut self, path: &str, value: &str) -> bool {
        match self.get_mut(path) {
            Some(slot) => {
                *slot = value.to_string();
                true
            }
            None => false,
        }
    }
}

/// JSON documents address nested fields with dotted paths (`"meta.status"`).
/// Strings are used as-is; numbers and booleans are rendered to text. Null
/// and containers exist but hold no state.
impl Stateful for Value {
    fn read_property(&self, path: &str) -> Option<String> {
        match self.pointer(&json_pointer(path))? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn has_property(&self, path: &str) -> bool {
        self.pointer(&json_pointer(path)).is_some()
    }

    fn write_property(&mut self, path: &str, value: &str) -> bool {
        match self.pointer_mut(&json_pointer(path)) {
            Some(slot) => {
                *slot = Value::String(value.to_string());
                true
            }
            None => false,
        }
    }
}

fn json_pointer(path: &str) -> String {
    path.split('.')
        .map(|segment| segment.replace('~', "~0").replace('/', "~1"))
        .fold(String::new(), |mut pointer, segment| {
            pointer.push('/');
            pointer.push_str(&segment);
            pointer
        })
}
