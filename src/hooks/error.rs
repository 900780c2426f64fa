//! Errors reported by user-supplied hooks and handlers.

use thiserror::Error;

/// Failure raised by a hook, condition or action handler.
///
/// The engine does not wrap or retry these; they reach the caller as
/// [`EngineError::Handler`](crate::engine::EngineError::Handler).
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}
