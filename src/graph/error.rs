//! Graph configuration errors.

use crate::builder::BuildError;
use thiserror::Error;

/// A structural problem found while checking a graph configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigIssue {
    #[error("graph name is blank")]
    BlankGraphName,

    #[error("property path is blank")]
    BlankPropertyPath,

    #[error("blank {kind} name in {location}")]
    BlankName {
        kind: &'static str,
        location: String,
    },

    #[error("blank handler method in {location}")]
    BlankMethod { location: String },

    #[error("blank target id in {location}")]
    BlankTarget { location: String },
}

/// Errors that can occur when building a graph from configuration.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Cannot parse graph configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid graph \"{graph}\": {}", join_issues(.issues))]
    Invalid {
        graph: String,
        issues: Vec<ConfigIssue>,
    },

    #[error(transparent)]
    Build(#[from] BuildError),
}

fn join_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
