//! Turning hook descriptors into invokable hooks.

use super::descriptor::{HookCall, HookDescriptor};
use super::registry::Registry;
use super::Hook;
use crate::engine::EngineError;
use crate::events::TransitionEvent;
use serde_json::Value;
use std::sync::Arc;

/// Resolves configuration descriptors into hooks.
///
/// The engine calls `resolve` at most once per hook slot and caches the
/// result, so resolution may be relatively expensive.
pub trait HookResolver<O>: Send + Sync {
    fn resolve(&self, descriptor: &HookDescriptor) -> Result<Hook<O>, EngineError>;
}

/// Default resolver backed by a [`Registry`].
///
/// Named calls use the registered hook as-is. Method calls are wrapped so
/// that the handler result is read by truthiness. Filtered descriptors are
/// wrapped so that non-matching events pass without running the hook.
pub struct RegistryResolver<O> {
    registry: Arc<Registry<O>>,
}

impl<O> RegistryResolver<O> {
    pub fn new(registry: Arc<Registry<O>>) -> Self {
        Self { registry }
    }
}

impl<O: 'static> HookResolver<O> for RegistryResolver<O> {
    fn resolve(&self, descriptor: &HookDescriptor) -> Result<Hook<O>, EngineError> {
        let hook: Hook<O> = match descriptor.call() {
            HookCall::Named(name) => {
                self.registry
                    .named_hook(name)
                    .ok_or_else(|| EngineError::UnknownHandler {
                        handler: name.clone(),
                    })?
            }
            HookCall::Method(invocation) => {
                let handler =
                    self.registry
                        .handler(invocation)
                        .ok_or_else(|| EngineError::UnknownHandler {
                            handler: invocation.to_string(),
                        })?;
                let args = descriptor.arguments().to_vec();
                let method: Hook<O> = Arc::new(move |_event: &TransitionEvent, object: &mut O| {
                    handler.call(object, &args).map(|result| is_truthy(&result))
                });
                method
            }
        };

        if !descriptor.is_filtered() {
            return Ok(hook);
        }

        let filter = descriptor.clone();
        Ok(Arc::new(move |event: &TransitionEvent, object: &mut O| {
            if filter.matches(event) {
                hook(event, object)
            } else {
                Ok(true)
            }
        }))
    }
}

/// Loose boolean reading of a handler result: `null`, `false`, zero, empty
/// strings and empty collections are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
