//! Core contracts shared by the graph model and the engine.
//!
//! - State access via the `StateAccessor` / `Stateful` traits
//! - Free-form `Properties` annotations with dual-mode lookup
//! - Invocation targets for configured handlers

mod properties;
mod state;
mod target;

pub use properties::Properties;
pub use state::{AccessError, PropertyAccessor, StateAccessor, Stateful};
pub use target::{Invocation, Target, OBJECT_TARGET};
