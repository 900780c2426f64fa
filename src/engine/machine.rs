//! The transition engine bound to one domain object.

use super::error::EngineError;
use super::pipeline::HookCache;
use crate::builder::EngineBuilder;
use crate::core::{AccessError, Properties, PropertyAccessor, StateAccessor, Stateful};
use crate::events::{EventBus, Topic, TransitionEvent};
use crate::graph::{HookPosition, StateDef, TransitionDef, TransitionGraph};
use crate::hooks::{HookResolver, Registry};
use serde_json::Value;
use std::any::type_name;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Drives the state of one domain object through a [`TransitionGraph`].
///
/// Operations take `&mut self` because hooks and handlers may mutate the
/// attached object. One engine is bound to exactly one object.
///
/// # Example
///
/// ```rust
/// use graphstate::{TransitionEngine, TransitionGraph};
/// use serde_json::json;
///
/// let graph = TransitionGraph::from_value(json!({
///     "graph": "ticket",
///     "states": ["open", "closed"],
///     "transitions": { "close": { "from": ["open"], "to": "closed" } }
/// }))
/// .unwrap();
///
/// let mut engine = TransitionEngine::new(json!({ "state": "open" }), graph).unwrap();
///
/// assert!(engine.can("close").unwrap());
/// assert!(engine.apply("close").unwrap());
/// assert_eq!(engine.state().unwrap(), "closed");
/// assert!(!engine.can("close").unwrap());
/// ```
pub struct TransitionEngine<O: 'static, A = PropertyAccessor> {
    object: O,
    graph: Arc<TransitionGraph>,
    accessor: A,
    registry: Arc<Registry<O>>,
    bus: Arc<dyn EventBus>,
    resolver: Arc<dyn HookResolver<O>>,
    hooks: HookCache<O>,
}

impl<O: Stateful + 'static> TransitionEngine<O, PropertyAccessor> {
    /// Attach `object` to `graph` with no handlers, no event bus and the
    /// default property accessor.
    pub fn new(object: O, graph: impl Into<Arc<TransitionGraph>>) -> Result<Self, EngineError> {
        EngineBuilder::new(graph).attach(object)
    }
}

impl<O: 'static, A: StateAccessor<O>> TransitionEngine<O, A> {
    /// Reads the state property once before returning the engine.
    pub(crate) fn assemble(
        object: O,
        graph: Arc<TransitionGraph>,
        accessor: A,
        registry: Arc<Registry<O>>,
        bus: Arc<dyn EventBus>,
        resolver: Arc<dyn HookResolver<O>>,
    ) -> Result<Self, EngineError> {
        if let Err(AccessError::NoSuchProperty { path }) =
            accessor.get(&object, graph.property_path())
        {
            return Err(EngineError::Configuration {
                path,
                object: type_name::<O>().to_string(),
                graph: graph.name().to_string(),
            });
        }

        debug!(
            graph = graph.name(),
            object = type_name::<O>(),
            property_path = graph.property_path(),
            "state machine attached"
        );

        Ok(Self {
            object,
            graph,
            accessor,
            registry,
            bus,
            resolver,
            hooks: HookCache::new(),
        })
    }

    /// Current state of the attached object.
    ///
    /// Fails with [`AccessError::NotAState`] when the property holds no state
    /// value; the other operations treat that object as being in no state.
    pub fn state(&self) -> Result<String, EngineError> {
        self.accessor
            .get(&self.object, self.graph.property_path())
            .map_err(|source| self.access_error(source))
    }

    pub fn object(&self) -> &O {
        &self.object
    }

    /// Direct access to the object. Changing its state here bypasses every
    /// hook and event.
    pub fn object_mut(&mut self) -> &mut O {
        &mut self.object
    }

    /// Detach and return the object.
    pub fn into_inner(self) -> O {
        self.object
    }

    pub fn graph(&self) -> &TransitionGraph {
        &self.graph
    }

    pub fn graph_name(&self) -> &str {
        self.graph.name()
    }

    /// Whether `transition` can be applied from the current state.
    ///
    /// Short-circuits to `false` without events or hooks when the current
    /// state is not a source of the transition. Otherwise publishes
    /// `test_transition` and, unless a subscriber rejects, runs the guards.
    pub fn can(&mut self, transition: &str) -> Result<bool, EngineError> {
        let config = self.transition_def(transition)?.clone();
        let state = self.current_state()?;

        if !config.allows_from(&state) {
            trace!(
                graph = self.graph.name(),
                transition,
                state = %state,
                "current state is not a source of the transition"
            );
            return Ok(false);
        }

        let mut event = TransitionEvent::new(self.graph.name(), transition, state, config);
        self.bus.publish(Topic::TestTransition, &mut event);
        if event.is_rejected() {
            debug!(
                graph = self.graph.name(),
                transition,
                state = event.state(),
                "transition rejected by test subscriber"
            );
            return Ok(false);
        }

        self.call_hooks(&event, HookPosition::Guard)
    }

    /// Apply `transition`, failing with `TransitionNotAllowed` if `can` is false.
    ///
    /// Returns `Ok(false)` if a `pre_transition` subscriber rejects.
    pub fn apply(&mut self, transition: &str) -> Result<bool, EngineError> {
        self.apply_transition(transition, false)
    }

    /// Apply `transition`, returning `Ok(false)` instead of failing when `can`
    /// is false. Lock and unlock failures are still errors.
    pub fn apply_soft(&mut self, transition: &str) -> Result<bool, EngineError> {
        self.apply_transition(transition, true)
    }

    fn apply_transition(&mut self, transition: &str, soft: bool) -> Result<bool, EngineError> {
        if !self.can(transition)? {
            if soft {
                trace!(
                    graph = self.graph.name(),
                    transition,
                    "transition not allowed, soft apply"
                );
                return Ok(false);
            }
            return Err(EngineError::TransitionNotAllowed {
                transition: transition.to_string(),
                state: self.current_state()?,
                object: self.object_type(),
                graph: self.graph.name().to_string(),
            });
        }

        let config = self.transition_def(transition)?.clone();
        let state = self.current_state()?;
        let mut event = TransitionEvent::new(self.graph.name(), transition, state, config);

        self.bus.publish(Topic::PreTransition, &mut event);
        if event.is_rejected() {
            debug!(
                graph = self.graph.name(),
                transition,
                state = event.state(),
                "transition rejected by pre subscriber"
            );
            return Ok(false);
        }

        if !self.call_hooks(&event, HookPosition::Lock)? {
            warn!(
                graph = self.graph.name(),
                transition,
                state = event.state(),
                "lock hooks refused the transition"
            );
            return Err(EngineError::LockFailed {
                transition: transition.to_string(),
                object: self.object_type(),
                graph: self.graph.name().to_string(),
            });
        }

        self.call_hooks(&event, HookPosition::Before)?;

        self.set_state(event.config().to())?;

        self.call_hooks(&event, HookPosition::After)?;

        if !self.call_hooks(&event, HookPosition::Unlock)? {
            warn!(
                graph = self.graph.name(),
                transition,
                state = event.config().to(),
                "unlock hooks failed after the state change"
            );
            return Err(EngineError::UnlockFailed {
                transition: transition.to_string(),
                object: self.object_type(),
                graph: self.graph.name().to_string(),
            });
        }

        self.bus.publish(Topic::PostTransition, &mut event);

        debug!(
            graph = self.graph.name(),
            transition,
            from = event.state(),
            to = event.config().to(),
            event_id = %event.id(),
            "transition applied"
        );
        Ok(true)
    }

    /// Whether `action` is available in the current state and its condition,
    /// if any, holds.
    pub fn can_action(&mut self, action: &str) -> Result<bool, EngineError> {
        let state = self.current_state()?;
        let Some(definition) = self.graph.state(&state) else {
            return Ok(false);
        };
        if !definition.has_action(action) {
            return Ok(false);
        }
        let Some(condition) = definition.condition(action) else {
            return Ok(true);
        };

        let result = self
            .registry
            .invoke(condition.invocation(), &mut self.object, &[])?;
        let allowed = result == *condition.expected();

        trace!(
            graph = self.graph.name(),
            action,
            state = %state,
            condition = %condition.invocation(),
            allowed,
            "action condition evaluated"
        );
        Ok(allowed)
    }

    /// Run the handler bound to `action`, failing with `ActionNotAllowed` if
    /// `can_action` is false. Returns the handler's result.
    pub fn apply_action(&mut self, action: &str) -> Result<Value, EngineError> {
        self.run_action(action, false)
    }

    /// Like [`apply_action`](Self::apply_action) but returns `false` when the
    /// action is not allowed. A missing callback is still an error.
    pub fn apply_action_soft(&mut self, action: &str) -> Result<Value, EngineError> {
        self.run_action(action, true)
    }

    fn run_action(&mut self, action: &str, soft: bool) -> Result<Value, EngineError> {
        if !self.can_action(action)? {
            if soft {
                return Ok(Value::Bool(false));
            }
            return Err(EngineError::ActionNotAllowed {
                action: action.to_string(),
                state: self.current_state()?,
                object: self.object_type(),
                graph: self.graph.name().to_string(),
            });
        }

        let state = self.current_state()?;
        let Some(callback) = self.graph.action_callback(action, &state) else {
            return Err(EngineError::CallbackNotFound {
                action: action.to_string(),
                state,
                object: self.object_type(),
                graph: self.graph.name().to_string(),
            });
        };

        let result =
            self.registry
                .invoke(callback.invocation(), &mut self.object, callback.arguments())?;

        debug!(
            graph = self.graph.name(),
            action,
            state = %state,
            handler = %callback.invocation(),
            "action applied"
        );
        Ok(result)
    }

    /// Transitions, in declaration order, that `can` currently allows.
    pub fn possible_transitions(&mut self) -> Result<Vec<String>, EngineError> {
        let graph = Arc::clone(&self.graph);
        let mut possible = Vec::new();
        for transition in graph.transition_names() {
            if self.can(transition)? {
                possible.push(transition.to_string());
            }
        }
        Ok(possible)
    }

    /// Actions of the current state, in declaration order, that
    /// `can_action` currently allows.
    pub fn possible_actions(&mut self) -> Result<Vec<String>, EngineError> {
        let graph = Arc::clone(&self.graph);
        let state = self.current_state()?;
        let Some(definition) = graph.state(&state) else {
            return Ok(Vec::new());
        };

        let mut possible = Vec::new();
        for action in definition.actions() {
            if self.can_action(action)? {
                possible.push(action.clone());
            }
        }
        Ok(possible)
    }

    /// Properties of `transition`; `None` if absent or the transition is unknown.
    pub fn transition_properties(&self, transition: &str) -> Option<&Properties> {
        self.graph.transition(transition)?.properties()
    }

    /// Properties of the current state; `None` if absent.
    pub fn state_properties(&self) -> Result<Option<&Properties>, EngineError> {
        let state = self.current_state()?;
        Ok(self.graph.state(&state).and_then(StateDef::properties))
    }

    pub fn has_transition_property(&self, transition: &str, property: &str) -> bool {
        self.transition_properties(transition)
            .is_some_and(|properties| properties.contains(property))
    }

    pub fn has_state_property(&self, property: &str) -> Result<bool, EngineError> {
        Ok(self
            .state_properties()?
            .is_some_and(|properties| properties.contains(property)))
    }

    // A property without a state value reads as the blank state, which no
    // checked graph declares: no transition, action or property applies.
    fn current_state(&self) -> Result<String, EngineError> {
        match self.accessor.get(&self.object, self.graph.property_path()) {
            Ok(state) => Ok(state),
            Err(AccessError::NotAState { .. }) => Ok(String::new()),
            Err(source) => Err(self.access_error(source)),
        }
    }

    fn transition_def(&self, transition: &str) -> Result<&TransitionDef, EngineError> {
        self.graph
            .transition(transition)
            .ok_or_else(|| EngineError::UnknownTransition {
                transition: transition.to_string(),
                object: self.object_type(),
                graph: self.graph.name().to_string(),
            })
    }

    // The target state is only checked here, after lock and before hooks ran.
    fn set_state(&mut self, state: &str) -> Result<(), EngineError> {
        if !self.graph.has_state(state) {
            return Err(EngineError::UnknownState {
                state: state.to_string(),
                object: self.object_type(),
                graph: self.graph.name().to_string(),
            });
        }

        self.accessor
            .set(&mut self.object, self.graph.property_path(), state)
            .map_err(|source| self.access_error(source))
    }

    fn call_hooks(
        &mut self,
        event: &TransitionEvent,
        position: HookPosition,
    ) -> Result<bool, EngineError> {
        self.hooks.run(
            position,
            self.graph.hooks(position),
            self.resolver.as_ref(),
            event,
            &mut self.object,
        )
    }

    fn object_type(&self) -> String {
        type_name::<O>().to_string()
    }

    fn access_error(&self, source: AccessError) -> EngineError {
        EngineError::Access {
            object: self.object_type(),
            graph: self.graph.name().to_string(),
            source,
        }
    }
}

impl<O: 'static, A> fmt::Debug for TransitionEngine<O, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionEngine")
            .field("graph", &self.graph.name())
            .field("object", &type_name::<O>())
            .field("resolved_hooks", &self.hooks.len())
            .finish()
    }
}
