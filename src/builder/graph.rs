//! Builder for transition graphs assembled in code.

use crate::builder::state::StateBuilder;
use crate::builder::transition::TransitionBuilder;
use crate::graph::{
    ActionCallbackDef, GraphConfig, GraphError, HookPosition, StateDef, TransitionGraph,
};
use crate::hooks::HookDescriptor;

/// Builds a [`TransitionGraph`] without a configuration document.
///
/// The result goes through the same structural checks as parsed
/// configuration.
///
/// # Example
///
/// ```rust
/// use graphstate::builder::{GraphBuilder, StateBuilder, TransitionBuilder};
/// use graphstate::graph::HookPosition;
/// use graphstate::hooks::HookDescriptor;
///
/// let graph = GraphBuilder::new("ticket")
///     .states(["open", "closed"])
///     .state("archived", StateBuilder::new().action("purge"))
///     .transition("close", TransitionBuilder::new().from("open").to("closed"))
///     .unwrap()
///     .hook(HookPosition::Guard, HookDescriptor::named("has_owner").on(["close"]))
///     .build()
///     .unwrap();
///
/// assert_eq!(graph.state_names().collect::<Vec<_>>(), ["open", "closed", "archived"]);
/// assert_eq!(graph.hooks(HookPosition::Guard).len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    config: GraphConfig,
}

impl GraphBuilder {
    pub fn new(graph: impl Into<String>) -> Self {
        Self {
            config: GraphConfig::new(graph),
        }
    }

    /// Path of the state property on attached objects (default `"state"`).
    pub fn property_path(mut self, path: impl Into<String>) -> Self {
        self.config.property_path = Some(path.into());
        self
    }

    /// Declare a state with actions, conditions or properties.
    pub fn state(mut self, name: impl Into<String>, state: StateBuilder) -> Self {
        self.config.states.push((name.into(), state.build()));
        self
    }

    /// Declare several plain states.
    pub fn states<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config
            .states
            .extend(names.into_iter().map(|name| (name.into(), StateDef::default())));
        self
    }

    /// Add a transition using a builder.
    /// Returns [`GraphError::Build`] if the builder fails validation.
    pub fn transition(
        mut self,
        name: impl Into<String>,
        builder: TransitionBuilder,
    ) -> Result<Self, GraphError> {
        let name = name.into();
        let transition = builder.build(&name)?;
        self.config.transitions.push((name, transition));
        Ok(self)
    }

    /// Append a hook to the given position.
    pub fn hook(mut self, position: HookPosition, descriptor: HookDescriptor) -> Self {
        self.config.callbacks.slot_mut(position).push(descriptor);
        self
    }

    /// Bind an action to its handler.
    pub fn action(mut self, callback: ActionCallbackDef) -> Self {
        self.config.callbacks.action.push(callback);
        self
    }

    pub fn build(self) -> Result<TransitionGraph, GraphError> {
        TransitionGraph::try_from(self.config)
    }
}
