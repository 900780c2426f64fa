//! Typed definitions of states, transitions and action callbacks.

use crate::core::{Invocation, Properties, Target};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Gate for an action: invoke a handler with no arguments and compare the
/// result with an expected value.
///
/// Configured as a `[target, method, expected]` triple.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "(Target, String, Value)")]
pub struct Condition {
    invocation: Invocation,
    expected: Value,
}

impl Condition {
    pub fn new(invocation: Invocation, expected: Value) -> Self {
        Self {
            invocation,
            expected,
        }
    }

    pub fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    pub fn expected(&self) -> &Value {
        &self.expected
    }
}

impl From<(Target, String, Value)> for Condition {
    fn from((target, method, expected): (Target, String, Value)) -> Self {
        Self::new(Invocation { target, method }, expected)
    }
}

/// A declared state.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StateDef {
    #[serde(default)]
    pub(crate) actions: Vec<String>,
    #[serde(default)]
    pub(crate) conditions: HashMap<String, Condition>,
    #[serde(default)]
    pub(crate) properties: Option<Properties>,
}

impl StateDef {
    /// Actions available while in this state, in declaration order.
    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    pub fn has_action(&self, action: &str) -> bool {
        self.actions.iter().any(|a| a == action)
    }

    /// Condition gating `action` in this state, if any.
    pub fn condition(&self, action: &str) -> Option<&Condition> {
        self.conditions.get(action)
    }

    pub fn properties(&self) -> Option<&Properties> {
        self.properties.as_ref()
    }
}

/// A declared transition: a named edge from a set of source states to one
/// target state.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransitionDef {
    pub(crate) from: Vec<String>,
    pub(crate) to: String,
    #[serde(default)]
    pub(crate) properties: Option<Properties>,
}

impl TransitionDef {
    pub fn from(&self) -> &[String] {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn properties(&self) -> Option<&Properties> {
        self.properties.as_ref()
    }

    /// Whether the transition is enabled from `state`.
    pub fn allows_from(&self, state: &str) -> bool {
        self.from.iter().any(|s| s == state)
    }
}

/// Binding of an action name to the handler that performs it.
///
/// # Example
///
/// ```rust
/// use graphstate::core::Invocation;
/// use graphstate::graph::ActionCallbackDef;
/// use serde_json::json;
///
/// let callback = ActionCallbackDef::new("publish", Invocation::object("publish"))
///     .on(["draft", "review"])
///     .args(vec![json!("homepage")]);
///
/// assert!(callback.matches("publish", "draft"));
/// assert!(!callback.matches("publish", "archived"));
/// assert!(!callback.matches("archive", "draft"));
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActionCallbackDef {
    pub(crate) action: String,
    #[serde(default)]
    pub(crate) on: Option<Vec<String>>,
    #[serde(rename = "do")]
    pub(crate) invocation: Invocation,
    #[serde(default)]
    pub(crate) args: Vec<Value>,
}

impl ActionCallbackDef {
    pub fn new(action: impl Into<String>, invocation: Invocation) -> Self {
        Self {
            action: action.into(),
            on: None,
            invocation,
            args: Vec::new(),
        }
    }

    /// Restrict the callback to the given states.
    pub fn on<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.on = Some(states.into_iter().map(Into::into).collect());
        self
    }

    /// Arguments passed to the handler, in order.
    pub fn args(mut self, args: Vec<Value>) -> Self {
        self.args = args;
        self
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    pub fn arguments(&self) -> &[Value] {
        &self.args
    }

    /// True if this entry handles `action` while the object is in `state`.
    pub fn matches(&self, action: &str, state: &str) -> bool {
        self.action == action
            && self
                .on
                .as_ref()
                .is_none_or(|states| states.iter().any(|s| s == state))
    }
}
