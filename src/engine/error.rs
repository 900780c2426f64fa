//! Engine error taxonomy.

use crate::core::AccessError;
use crate::hooks::HandlerError;
use thiserror::Error;

/// Errors raised by the transition engine.
///
/// Rejection by an event subscriber is not an error: `can` and `apply`
/// report it as `Ok(false)`.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    #[error("Cannot access configured property path \"{path}\" on object {object} with graph \"{graph}\"")]
    Configuration {
        path: String,
        object: String,
        graph: String,
    },

    #[error("Transition \"{transition}\" does not exist on object \"{object}\" with graph \"{graph}\"")]
    UnknownTransition {
        transition: String,
        object: String,
        graph: String,
    },

    #[error("Cannot set the state to \"{state}\" on object \"{object}\" with graph \"{graph}\" because it is not declared")]
    UnknownState {
        state: String,
        object: String,
        graph: String,
    },

    #[error("Transition \"{transition}\" cannot be applied on state \"{state}\" of object \"{object}\" with graph \"{graph}\"")]
    TransitionNotAllowed {
        transition: String,
        state: String,
        object: String,
        graph: String,
    },

    #[error("Cannot lock object \"{object}\" for transition \"{transition}\" with graph \"{graph}\"")]
    LockFailed {
        transition: String,
        object: String,
        graph: String,
    },

    #[error("Cannot unlock object \"{object}\" for transition \"{transition}\" with graph \"{graph}\"")]
    UnlockFailed {
        transition: String,
        object: String,
        graph: String,
    },

    #[error("Action \"{action}\" cannot be applied on state \"{state}\" of object \"{object}\" with graph \"{graph}\"")]
    ActionNotAllowed {
        action: String,
        state: String,
        object: String,
        graph: String,
    },

    #[error("Callback not found for action \"{action}\" on state \"{state}\" of object \"{object}\" with graph \"{graph}\"")]
    CallbackNotFound {
        action: String,
        state: String,
        object: String,
        graph: String,
    },

    #[error("No handler registered for \"{handler}\"")]
    UnknownHandler { handler: String },

    #[error("State access failed on object \"{object}\" with graph \"{graph}\": {source}")]
    Access {
        object: String,
        graph: String,
        #[source]
        source: AccessError,
    },

    #[error(transparent)]
    Handler(#[from] HandlerError),
}
