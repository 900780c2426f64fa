//! Builder wiring an object, a graph and its collaborators into an engine.

use crate::core::{PropertyAccessor, StateAccessor};
use crate::engine::{EngineError, TransitionEngine};
use crate::events::{EventBus, NoopBus};
use crate::graph::TransitionGraph;
use crate::hooks::{HookResolver, Registry, RegistryResolver};
use std::sync::Arc;

/// Builder for a [`TransitionEngine`].
///
/// Defaults: an empty registry, no event bus, the registry-backed hook
/// resolver and [`PropertyAccessor`].
///
/// # Example
///
/// ```rust
/// use graphstate::builder::EngineBuilder;
/// use graphstate::events::{Dispatcher, Topic};
/// use graphstate::graph::TransitionGraph;
/// use graphstate::hooks::Registry;
/// use serde_json::{json, Value};
///
/// let graph = TransitionGraph::from_value(json!({
///     "graph": "ticket",
///     "states": ["open", "closed"],
///     "transitions": { "close": { "from": ["open"], "to": "closed" } },
///     "callbacks": { "guard": [{ "do": "has_owner" }] }
/// }))
/// .unwrap();
///
/// let registry = Registry::<Value>::new()
///     .hook("has_owner", |_event, ticket| Ok(ticket["owner"].is_string()));
///
/// let mut bus = Dispatcher::new();
/// bus.subscribe(Topic::PostTransition, |event| {
///     assert_eq!(event.transition(), "close");
/// });
///
/// let mut engine = EngineBuilder::new(graph)
///     .registry(registry)
///     .bus(bus)
///     .attach(json!({ "state": "open", "owner": "ana" }))
///     .unwrap();
///
/// assert!(engine.apply("close").unwrap());
/// ```
pub struct EngineBuilder<O: 'static, A = PropertyAccessor> {
    graph: Arc<TransitionGraph>,
    accessor: A,
    registry: Arc<Registry<O>>,
    bus: Arc<dyn EventBus>,
    resolver: Option<Arc<dyn HookResolver<O>>>,
}

impl<O: 'static> EngineBuilder<O, PropertyAccessor> {
    pub fn new(graph: impl Into<Arc<TransitionGraph>>) -> Self {
        Self {
            graph: graph.into(),
            accessor: PropertyAccessor,
            registry: Arc::new(Registry::new()),
            bus: Arc::new(NoopBus),
            resolver: None,
        }
    }
}

impl<O: 'static, A> EngineBuilder<O, A> {
    /// Handlers referenced by the graph.
    pub fn registry(mut self, registry: impl Into<Arc<Registry<O>>>) -> Self {
        self.registry = registry.into();
        self
    }

    /// Event bus receiving test, pre and post transition events.
    pub fn bus<B: EventBus + 'static>(mut self, bus: B) -> Self {
        self.bus = Arc::new(bus);
        self
    }

    /// Replace the registry-backed hook resolver.
    pub fn resolver<R: HookResolver<O> + 'static>(mut self, resolver: R) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Replace the state accessor.
    pub fn accessor<B>(self, accessor: B) -> EngineBuilder<O, B> {
        EngineBuilder {
            graph: self.graph,
            accessor,
            registry: self.registry,
            bus: self.bus,
            resolver: self.resolver,
        }
    }

    /// Bind `object` and check that its state property is readable.
    pub fn attach(self, object: O) -> Result<TransitionEngine<O, A>, EngineError>
    where
        A: StateAccessor<O>,
    {
        let resolver = match self.resolver {
            Some(resolver) => resolver,
            None => Arc::new(RegistryResolver::new(Arc::clone(&self.registry))),
        };

        TransitionEngine::assemble(
            object,
            self.graph,
            self.accessor,
            self.registry,
            self.bus,
            resolver,
        )
    }
}
