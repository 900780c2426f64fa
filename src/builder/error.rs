//! Build errors for graph and transition builders.

use thiserror::Error;

/// Errors that can occur when building graphs and transitions in code.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("Transition \"{transition}\" has no source state. Call .from(state)")]
    MissingFromState { transition: String },

    #[error("Transition \"{transition}\" has no target state. Call .to(state)")]
    MissingToState { transition: String },
}
