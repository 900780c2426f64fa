//! Hook pipeline execution with per-slot resolution caching.

use crate::engine::EngineError;
use crate::events::TransitionEvent;
use crate::graph::HookPosition;
use crate::hooks::{Hook, HookDescriptor, HookResolver};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// Hooks resolved so far, keyed by (position, index).
///
/// Each slot is resolved on first use and reused afterwards. The graph's
/// descriptor lists are never modified.
pub(crate) struct HookCache<O> {
    resolved: HashMap<(HookPosition, usize), Hook<O>>,
}

impl<O> HookCache<O> {
    pub(crate) fn new() -> Self {
        Self {
            resolved: HashMap::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.resolved.len()
    }

    /// Run every hook of one position and AND their results.
    ///
    /// All hooks run even after one returns `false`. An error stops the
    /// pipeline at the failing hook.
    pub(crate) fn run(
        &mut self,
        position: HookPosition,
        descriptors: &[HookDescriptor],
        resolver: &dyn HookResolver<O>,
        event: &TransitionEvent,
        object: &mut O,
    ) -> Result<bool, EngineError> {
        if descriptors.is_empty() {
            return Ok(true);
        }

        let mut result = true;
        for (index, descriptor) in descriptors.iter().enumerate() {
            let hook = match self.resolved.entry((position, index)) {
                Entry::Occupied(slot) => Arc::clone(slot.get()),
                Entry::Vacant(slot) => Arc::clone(slot.insert(resolver.resolve(descriptor)?)),
            };
            let passed = hook(event, object)?;
            trace!(
                position = %position,
                index,
                hook = descriptor.name().unwrap_or_default(),
                passed,
                "hook ran"
            );
            result = passed && result;
        }

        Ok(result)
    }
}
