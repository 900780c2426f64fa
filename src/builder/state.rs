//! Builder for state definitions.

use crate::core::{Invocation, Properties};
use crate::graph::{Condition, StateDef};
use serde_json::Value;

/// Builder for a [`StateDef`].
#[derive(Debug, Clone, Default)]
pub struct StateBuilder {
    state: StateDef,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `action` available in this state.
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.state.actions.push(action.into());
        self
    }

    /// Make `action` available when `invocation` returns `expected`.
    pub fn conditional_action(
        mut self,
        action: impl Into<String>,
        invocation: Invocation,
        expected: Value,
    ) -> Self {
        let action = action.into();
        self.state
            .conditions
            .insert(action.clone(), Condition::new(invocation, expected));
        self.state.actions.push(action);
        self
    }

    pub fn properties(mut self, properties: Value) -> Self {
        self.state.properties = Some(Properties::from(properties));
        self
    }

    pub fn build(self) -> StateDef {
        self.state
    }
}
