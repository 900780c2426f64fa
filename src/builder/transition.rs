//! Builder for transition definitions.

use crate::builder::error::BuildError;
use crate::core::Properties;
use crate::graph::TransitionDef;
use serde_json::Value;

/// Builder for a [`TransitionDef`] with a fluent API.
#[derive(Debug, Clone, Default)]
pub struct TransitionBuilder {
    from: Vec<String>,
    to: Option<String>,
    properties: Option<Properties>,
}

impl TransitionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source state (at least one is required).
    pub fn from(mut self, state: impl Into<String>) -> Self {
        self.from.push(state.into());
        self
    }

    /// Add several source states.
    pub fn from_any<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.from.extend(states.into_iter().map(Into::into));
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: impl Into<String>) -> Self {
        self.to = Some(state.into());
        self
    }

    /// Attach free-form properties.
    pub fn properties(mut self, properties: Value) -> Self {
        self.properties = Some(Properties::from(properties));
        self
    }

    /// Build the definition; `name` is only used in error messages.
    pub fn build(self, name: &str) -> Result<TransitionDef, BuildError> {
        if self.from.is_empty() {
            return Err(BuildError::MissingFromState {
                transition: name.to_string(),
            });
        }
        let to = self.to.ok_or_else(|| BuildError::MissingToState {
            transition: name.to_string(),
        })?;

        Ok(TransitionDef {
            from: self.from,
            to,
            properties: self.properties,
        })
    }
}
