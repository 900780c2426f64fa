//! Declarative transition graphs.
//!
//! A [`TransitionGraph`] is parsed once from configuration and is immutable
//! afterwards, so one graph can be shared by every engine driving objects of
//! the same family.

mod config;
mod definition;
mod error;
mod validate;

pub use config::{CallbackConfig, GraphConfig};
pub use definition::{ActionCallbackDef, Condition, StateDef, TransitionDef};
pub use error::{ConfigIssue, GraphError};

use crate::hooks::HookDescriptor;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use stillwater::validation::Validation;

/// Property path used when the configuration does not name one.
pub const DEFAULT_PROPERTY_PATH: &str = "state";

/// Pipeline slot a hook runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HookPosition {
    Guard,
    Lock,
    Before,
    After,
    Unlock,
}

impl HookPosition {
    /// All positions, in pipeline order.
    pub const ALL: [HookPosition; 5] = [
        HookPosition::Guard,
        HookPosition::Lock,
        HookPosition::Before,
        HookPosition::After,
        HookPosition::Unlock,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HookPosition::Guard => "guard",
            HookPosition::Lock => "lock",
            HookPosition::Before => "before",
            HookPosition::After => "after",
            HookPosition::Unlock => "unlock",
        }
    }
}

impl fmt::Display for HookPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed, immutable graph of states, transitions, hooks and actions.
///
/// # Example
///
/// ```rust
/// use graphstate::graph::TransitionGraph;
///
/// let graph = TransitionGraph::from_json(r#"{
///     "graph": "ticket",
///     "states": ["open", "closed"],
///     "transitions": {
///         "close": { "from": ["open"], "to": "closed" },
///         "reopen": { "from": ["closed"], "to": "open" }
///     }
/// }"#).unwrap();
///
/// assert_eq!(graph.name(), "ticket");
/// assert_eq!(graph.property_path(), "state");
/// assert_eq!(graph.transition_names().collect::<Vec<_>>(), ["close", "reopen"]);
/// ```
#[derive(Debug, Clone)]
pub struct TransitionGraph {
    name: String,
    property_path: String,
    states: Vec<(String, StateDef)>,
    state_index: HashMap<String, usize>,
    transitions: Vec<(String, TransitionDef)>,
    transition_index: HashMap<String, usize>,
    callbacks: CallbackConfig,
}

impl TransitionGraph {
    /// Parse and check a JSON document.
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let config: GraphConfig = serde_json::from_str(json)?;
        Self::try_from(config)
    }

    /// Parse and check an already loaded JSON value.
    pub fn from_value(value: Value) -> Result<Self, GraphError> {
        let config: GraphConfig = serde_json::from_value(value)?;
        Self::try_from(config)
    }

    /// Graph identifier, used in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the state property on attached objects.
    pub fn property_path(&self) -> &str {
        &self.property_path
    }

    pub fn state(&self, name: &str) -> Option<&StateDef> {
        self.state_index.get(name).map(|&i| &self.states[i].1)
    }

    pub fn has_state(&self, name: &str) -> bool {
        self.state_index.contains_key(name)
    }

    /// State names in declaration order.
    pub fn state_names(&self) -> impl Iterator<Item = &str> {
        self.states.iter().map(|(name, _)| name.as_str())
    }

    pub fn transition(&self, name: &str) -> Option<&TransitionDef> {
        self.transition_index
            .get(name)
            .map(|&i| &self.transitions[i].1)
    }

    /// Transition names in declaration order.
    pub fn transition_names(&self) -> impl Iterator<Item = &str> {
        self.transitions.iter().map(|(name, _)| name.as_str())
    }

    /// Hook descriptors configured for `position`, in declaration order.
    pub fn hooks(&self, position: HookPosition) -> &[HookDescriptor] {
        self.callbacks.slot(position)
    }

    pub fn action_callbacks(&self) -> &[ActionCallbackDef] {
        &self.callbacks.action
    }

    /// First action callback bound to `action` that applies in `state`.
    pub fn action_callback(&self, action: &str, state: &str) -> Option<&ActionCallbackDef> {
        self.callbacks
            .action
            .iter()
            .find(|callback| callback.matches(action, state))
    }

    fn assemble(config: GraphConfig) -> Self {
        let (states, state_index) = index_entries(config.states);
        let (transitions, transition_index) = index_entries(config.transitions);

        Self {
            name: config.graph,
            property_path: config
                .property_path
                .unwrap_or_else(|| DEFAULT_PROPERTY_PATH.to_string()),
            states,
            state_index,
            transitions,
            transition_index,
            callbacks: config.callbacks,
        }
    }
}

impl TryFrom<GraphConfig> for TransitionGraph {
    type Error = GraphError;

    fn try_from(config: GraphConfig) -> Result<Self, Self::Error> {
        match validate::validate(&config) {
            Validation::Success(_) => Ok(Self::assemble(config)),
            Validation::Failure(issues) => Err(GraphError::Invalid {
                graph: config.graph,
                issues: issues.iter().cloned().collect(),
            }),
        }
    }
}

/// Later duplicates replace earlier entries but keep the first position.
fn index_entries<T>(entries: Vec<(String, T)>) -> (Vec<(String, T)>, HashMap<String, usize>) {
    let mut ordered: Vec<(String, T)> = Vec::with_capacity(entries.len());
    let mut index = HashMap::with_capacity(entries.len());

    for (name, definition) in entries {
        match index.get(&name) {
            Some(&i) => ordered[i] = (name, definition),
            None => {
                index.insert(name.clone(), ordered.len());
                ordered.push((name, definition));
            }
        }
    }

    (ordered, index)
}
