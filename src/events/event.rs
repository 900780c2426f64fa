//! Transition events and their topics.

use crate::graph::TransitionDef;
use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

/// Lifecycle topic an event is published on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Published by `can`; subscribers may veto.
    TestTransition,
    /// Published by `apply` before any hook runs; subscribers may veto.
    PreTransition,
    /// Published by `apply` after the state change has been committed.
    PostTransition,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::TestTransition => "test_transition",
            Topic::PreTransition => "pre_transition",
            Topic::PostTransition => "post_transition",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of one transition attempt, handed to subscribers and hooks.
///
/// A fresh event is built for every `can` and every `apply`; within one
/// `apply` the same event travels through `pre_transition`, the hooks and
/// `post_transition`, so its `id` correlates them.
#[derive(Debug, Clone)]
pub struct TransitionEvent {
    id: Uuid,
    occurred_at: DateTime<Utc>,
    graph: String,
    transition: String,
    state: String,
    config: TransitionDef,
    rejected: bool,
}

impl TransitionEvent {
    pub fn new(
        graph: impl Into<String>,
        transition: impl Into<String>,
        state: impl Into<String>,
        config: TransitionDef,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            graph: graph.into(),
            transition: transition.into(),
            state: state.into(),
            config,
            rejected: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn graph(&self) -> &str {
        &self.graph
    }

    pub fn transition(&self) -> &str {
        &self.transition
    }

    /// State of the object when the event was created.
    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn config(&self) -> &TransitionDef {
        &self.config
    }

    /// Veto the transition. Only meaningful on test and pre topics.
    pub fn set_rejected(&mut self) {
        self.rejected = true;
    }

    pub fn is_rejected(&self) -> bool {
        self.rejected
    }
}
