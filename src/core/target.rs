//! Invocation targets for conditions, actions and method hooks.

use serde::Deserialize;
use std::fmt;

/// Configuration sentinel that binds an invocation to the attached object.
pub const OBJECT_TARGET: &str = "object";

/// Where a configured handler is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum Target {
    /// A method registered for the domain object the engine is attached to.
    Object,
    /// A method of a fixed, externally registered service.
    External(String),
}

impl From<String> for Target {
    fn from(id: String) -> Self {
        if id == OBJECT_TARGET {
            Target::Object
        } else {
            Target::External(id)
        }
    }
}

impl From<&str> for Target {
    fn from(id: &str) -> Self {
        Target::from(id.to_string())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Object => f.write_str(OBJECT_TARGET),
            Target::External(id) => f.write_str(id),
        }
    }
}

/// A `[target, method]` pair from configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "(Target, String)")]
pub struct Invocation {
    pub target: Target,
    pub method: String,
}

impl Invocation {
    /// Invoke `method` on the attached object.
    pub fn object(method: impl Into<String>) -> Self {
        Self {
            target: Target::Object,
            method: method.into(),
        }
    }

    /// Invoke `method` on the external service registered as `target`.
    pub fn external(target: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            target: Target::External(target.into()),
            method: method.into(),
        }
    }
}

impl From<(Target, String)> for Invocation {
    fn from((target, method): (Target, String)) -> Self {
        Self { target, method }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.target, self.method)
    }
}
