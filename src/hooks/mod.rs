//! Hooks, handlers and their resolution from configuration.
//!
//! - `Registry`: named hooks, object methods and external service methods
//! - `HookDescriptor`: an unresolved hook entry from graph configuration
//! - `HookResolver`: turns descriptors into invokable hooks

mod descriptor;
mod error;
mod registry;
mod resolver;

pub use descriptor::{HookCall, HookDescriptor};
pub use error::HandlerError;
pub use registry::{Handler, ObjectMethod, Registry, ServiceMethod};
pub use resolver::{is_truthy, HookResolver, RegistryResolver};

use crate::events::TransitionEvent;
use std::sync::Arc;

/// An invokable hook. Receives the transition event and the attached object;
/// `Ok(false)` vetoes guard, lock and unlock positions.
pub type Hook<O> =
    Arc<dyn Fn(&TransitionEvent, &mut O) -> Result<bool, HandlerError> + Send + Sync>;
