//! Serde model of the graph configuration document.
//!
//! ```json
//! {
//!   "graph": "article",
//!   "property_path": "state",
//!   "states": { "draft": { "actions": ["publish"] }, "published": {} },
//!   "transitions": { "publish": { "from": ["draft"], "to": "published" } },
//!   "callbacks": {
//!     "guard": [{ "do": "editor_approved" }],
//!     "action": [{ "action": "publish", "do": ["object", "publish"] }]
//!   }
//! }
//! ```
//!
//! Map sections keep their declaration order, which drives
//! `possible_transitions` and first-match action lookup.

use super::definition::{ActionCallbackDef, StateDef, TransitionDef};
use super::HookPosition;
use crate::hooks::HookDescriptor;
use serde::Deserialize;

/// Raw graph configuration, before structural checks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphConfig {
    pub(crate) graph: String,
    #[serde(default)]
    pub(crate) property_path: Option<String>,
    #[serde(default, deserialize_with = "ordered::states")]
    pub(crate) states: Vec<(String, StateDef)>,
    #[serde(default, deserialize_with = "ordered::entries")]
    pub(crate) transitions: Vec<(String, TransitionDef)>,
    #[serde(default)]
    pub(crate) callbacks: CallbackConfig,
}

impl GraphConfig {
    pub(crate) fn new(graph: impl Into<String>) -> Self {
        Self {
            graph: graph.into(),
            ..Self::default()
        }
    }
}

/// The `callbacks` section: one descriptor list per hook position plus the
/// action bindings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackConfig {
    #[serde(default)]
    pub(crate) guard: Vec<HookDescriptor>,
    #[serde(default)]
    pub(crate) lock: Vec<HookDescriptor>,
    #[serde(default)]
    pub(crate) before: Vec<HookDescriptor>,
    #[serde(default)]
    pub(crate) after: Vec<HookDescriptor>,
    #[serde(default)]
    pub(crate) unlock: Vec<HookDescriptor>,
    #[serde(default)]
    pub(crate) action: Vec<ActionCallbackDef>,
}

impl CallbackConfig {
    pub(crate) fn slot(&self, position: HookPosition) -> &Vec<HookDescriptor> {
        match position {
            HookPosition::Guard => &self.guard,
            HookPosition::Lock => &self.lock,
            HookPosition::Before => &self.before,
            HookPosition::After => &self.after,
            HookPosition::Unlock => &self.unlock,
        }
    }

    pub(crate) fn slot_mut(&mut self, position: HookPosition) -> &mut Vec<HookDescriptor> {
        match position {
            HookPosition::Guard => &mut self.guard,
            HookPosition::Lock => &mut self.lock,
            HookPosition::Before => &mut self.before,
            HookPosition::After => &mut self.after,
            HookPosition::Unlock => &mut self.unlock,
        }
    }
}

mod ordered {
    use super::StateDef;
    use serde::de::{Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
    use std::fmt;
    use std::marker::PhantomData;

    /// Deserialize a map into `(key, value)` pairs in document order.
    pub fn entries<'de, D, T>(deserializer: D) -> Result<Vec<(String, T)>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }

    /// States accept a map (null values allowed) or a plain list of names.
    pub fn states<'de, D>(deserializer: D) -> Result<Vec<(String, StateDef)>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(StatesVisitor)
    }

    struct EntriesVisitor<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for EntriesVisitor<T> {
        type Value = Vec<(String, T)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of named definitions")
        }

        fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<Self::Value, M::Error> {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, T>()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    struct StatesVisitor;

    impl<'de> Visitor<'de> for StatesVisitor {
        type Value = Vec<(String, StateDef)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of states or a list of state names")
        }

        fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<Self::Value, M::Error> {
            let mut states = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((name, state)) = map.next_entry::<String, Option<StateDef>>()? {
                states.push((name, state.unwrap_or_default()));
            }
            Ok(states)
        }

        fn visit_seq<S: SeqAccess<'de>>(self, mut seq: S) -> Result<Self::Value, S::Error> {
            let mut states = Vec::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(name) = seq.next_element::<String>()? {
                states.push((name, StateDef::default()));
            }
            Ok(states)
        }
    }
}
