//! Builder API for assembling graphs and engines in code.
//!
//! Configuration documents are the usual source of graphs. These builders
//! cover the cases where a graph is known at compile time or is generated,
//! and they wire engines to their registry, event bus and accessor.

mod engine;
mod error;
mod graph;
mod state;
mod transition;

pub use engine::EngineBuilder;
pub use error::BuildError;
pub use graph::GraphBuilder;
pub use state::StateBuilder;
pub use transition::TransitionBuilder;
