//! Graphstate: a configuration-driven state machine engine
//!
//! A graph of states and named transitions is declared once, as JSON or with
//! the builders, and then drives any number of domain objects. Each object is
//! attached to a [`TransitionEngine`] that reads and writes its state property
//! and runs configured hooks around every transition.
//!
//! # Core Concepts
//!
//! - **Graph**: immutable states, transitions, hooks and action bindings
//! - **Hooks**: guard, lock, before, after and unlock pipelines resolved by name
//! - **Events**: test, pre and post transition events with subscriber veto
//! - **Actions**: per-state operations with optional conditions
//!
//! # Example
//!
//! ```rust
//! use graphstate::{EngineBuilder, Registry, TransitionGraph};
//! use serde_json::{json, Value};
//!
//! let graph = TransitionGraph::from_value(json!({
//!     "graph": "article",
//!     "states": {
//!         "draft": { "actions": ["publish"], "conditions": { "publish": ["object", "is_ready", true] } },
//!         "published": {}
//!     },
//!     "transitions": { "go_live": { "from": ["draft"], "to": "published" } },
//!     "callbacks": {
//!         "action": [{ "action": "publish", "do": ["object", "go_live"] }]
//!     }
//! }))
//! .unwrap();
//!
//! let registry = Registry::<Value>::new()
//!     .method("is_ready", |article, _| Ok(article["ready"].clone()))
//!     .method("go_live", |article, _| {
//!         article["live"] = Value::Bool(true);
//!         Ok(json!("ok"))
//!     });
//!
//! let mut engine = EngineBuilder::new(graph)
//!     .registry(registry)
//!     .attach(json!({ "state": "draft", "ready": true }))
//!     .unwrap();
//!
//! assert_eq!(engine.possible_actions().unwrap(), ["publish"]);
//! assert_eq!(engine.apply_action("publish").unwrap(), json!("ok"));
//! assert!(engine.apply("go_live").unwrap());
//! assert_eq!(engine.state().unwrap(), "published");
//! ```

pub mod builder;
pub mod core;
pub mod engine;
pub mod events;
pub mod graph;
pub mod hooks;

// Re-export commonly used types
pub use builder::{EngineBuilder, GraphBuilder};
pub use core::{Properties, PropertyAccessor, StateAccessor, Stateful};
pub use engine::{EngineError, TransitionEngine};
pub use events::{Dispatcher, EventBus, Topic, TransitionEvent};
pub use graph::{GraphError, HookPosition, TransitionGraph};
pub use hooks::{HandlerError, HookDescriptor, Registry};
