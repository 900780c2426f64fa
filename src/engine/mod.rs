//! The engine that drives an attached object through a graph.

mod error;
mod machine;
mod pipeline;

pub use error::EngineError;
pub use machine::TransitionEngine;
