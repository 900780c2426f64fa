//! Lookup table of named handlers.
//!
//! Configuration refers to behaviour by name only. Every name a graph uses
//! must be registered here before the engine first needs it.

use super::error::HandlerError;
use super::Hook;
use crate::core::{Invocation, Target};
use crate::engine::EngineError;
use crate::events::TransitionEvent;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Handler registered for the attached object (`"object"` target).
pub type ObjectMethod<O> =
    Arc<dyn Fn(&mut O, &[Value]) -> Result<Value, HandlerError> + Send + Sync>;

/// Handler registered for an external target id.
pub type ServiceMethod = Arc<dyn Fn(&[Value]) -> Result<Value, HandlerError> + Send + Sync>;

/// A resolved `[target, method]` handler.
pub enum Handler<O> {
    Object(ObjectMethod<O>),
    Service(ServiceMethod),
}

impl<O> Handler<O> {
    pub fn call(&self, object: &mut O, args: &[Value]) -> Result<Value, HandlerError> {
        match self {
            Handler::Object(method) => method(object, args),
            Handler::Service(method) => method(args),
        }
    }
}

impl<O> Clone for Handler<O> {
    fn clone(&self) -> Self {
        match self {
            Handler::Object(method) => Handler::Object(Arc::clone(method)),
            Handler::Service(method) => Handler::Service(Arc::clone(method)),
        }
    }
}

/// Named hooks, object methods and external service methods.
///
/// # Example
///
/// ```rust
/// use graphstate::core::Invocation;
/// use graphstate::hooks::Registry;
/// use serde_json::{json, Value};
///
/// struct Article {
///     ready: bool,
/// }
///
/// let registry = Registry::<Article>::new()
///     .method("is_ready", |article, _args| Ok(Value::Bool(article.ready)))
///     .service("mailer", "send", |args| Ok(json!({ "sent": args.len() })));
///
/// let mut article = Article { ready: true };
/// let ready = registry
///     .invoke(&Invocation::object("is_ready"), &mut article, &[])
///     .unwrap();
/// assert_eq!(ready, json!(true));
/// ```
pub struct Registry<O> {
    hooks: HashMap<String, Hook<O>>,
    methods: HashMap<String, ObjectMethod<O>>,
    services: HashMap<(String, String), ServiceMethod>,
}

impl<O> Registry<O> {
    pub fn new() -> Self {
        Self {
            hooks: HashMap::new(),
            methods: HashMap::new(),
            services: HashMap::new(),
        }
    }

    /// Register an event-aware hook under `name`.
    pub fn hook<F>(mut self, name: impl Into<String>, hook: F) -> Self
    where
        F: Fn(&TransitionEvent, &mut O) -> Result<bool, HandlerError> + Send + Sync + 'static,
    {
        self.hooks.insert(name.into(), Arc::new(hook));
        self
    }

    /// Register a method invokable on the attached object.
    pub fn method<F>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(&mut O, &[Value]) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Arc::new(method));
        self
    }

    /// Register a method of the external target `target`.
    pub fn service<F>(mut self, target: impl Into<String>, method: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        self.services
            .insert((target.into(), method.into()), Arc::new(handler));
        self
    }

    pub fn named_hook(&self, name: &str) -> Option<Hook<O>> {
        self.hooks.get(name).cloned()
    }

    pub fn handler(&self, invocation: &Invocation) -> Option<Handler<O>> {
        match &invocation.target {
            Target::Object => self
                .methods
                .get(&invocation.method)
                .map(|method| Handler::Object(Arc::clone(method))),
            Target::External(id) => self
                .services
                .get(&(id.clone(), invocation.method.clone()))
                .map(|method| Handler::Service(Arc::clone(method))),
        }
    }

    /// Look up and call the handler for `invocation`.
    pub fn invoke(
        &self,
        invocation: &Invocation,
        object: &mut O,
        args: &[Value],
    ) -> Result<Value, EngineError> {
        let handler = self
            .handler(invocation)
            .ok_or_else(|| EngineError::UnknownHandler {
                handler: invocation.to_string(),
            })?;
        Ok(handler.call(object, args)?)
    }
}

impl<O> Default for Registry<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> fmt::Debug for Registry<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("hooks", &self.hooks.keys().collect::<Vec<_>>())
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .field("services", &self.services.keys().collect::<Vec<_>>())
            .finish()
    }
}
