//! Hook descriptors as written in graph configuration.

use crate::core::Invocation;
use crate::events::TransitionEvent;
use serde::Deserialize;
use serde_json::Value;

/// What a hook descriptor calls.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum HookCall {
    /// A hook registered by name; it receives the event and the object.
    Named(String),
    /// A `[target, method]` handler called with the descriptor's `args`.
    /// Its result is interpreted by truthiness.
    Method(Invocation),
}

/// Unresolved hook entry of a `callbacks.<position>` list.
///
/// Filters restrict the hook to matching events; a hook whose filters do
/// not match is skipped and counts as passed.
///
/// # Example
///
/// ```rust
/// use graphstate::hooks::HookDescriptor;
///
/// let descriptor = HookDescriptor::named("notify_editor")
///     .on(["publish"])
///     .excluding_from(["archived"]);
///
/// assert!(descriptor.is_filtered());
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HookDescriptor {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    on: Vec<String>,
    #[serde(default)]
    from: Vec<String>,
    #[serde(default)]
    to: Vec<String>,
    #[serde(default)]
    excluded_on: Vec<String>,
    #[serde(default)]
    excluded_from: Vec<String>,
    #[serde(default)]
    excluded_to: Vec<String>,
    #[serde(rename = "do")]
    call: HookCall,
    #[serde(default)]
    args: Vec<Value>,
}

impl HookDescriptor {
    fn with_call(call: HookCall) -> Self {
        Self {
            name: None,
            on: Vec::new(),
            from: Vec::new(),
            to: Vec::new(),
            excluded_on: Vec::new(),
            excluded_from: Vec::new(),
            excluded_to: Vec::new(),
            call,
            args: Vec::new(),
        }
    }

    /// Call the hook registered as `hook`.
    pub fn named(hook: impl Into<String>) -> Self {
        Self::with_call(HookCall::Named(hook.into()))
    }

    /// Call a registered handler and use the truthiness of its result.
    pub fn method(invocation: Invocation) -> Self {
        Self::with_call(HookCall::Method(invocation))
    }

    /// Label used in diagnostics.
    pub fn label(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn args(mut self, args: Vec<Value>) -> Self {
        self.args = args;
        self
    }

    /// Only run for these transitions.
    pub fn on<I: IntoIterator<Item = S>, S: Into<String>>(mut self, transitions: I) -> Self {
        self.on = collect(transitions);
        self
    }

    /// Only run when leaving one of these states.
    pub fn from<I: IntoIterator<Item = S>, S: Into<String>>(mut self, states: I) -> Self {
        self.from = collect(states);
        self
    }

    /// Only run when entering one of these states.
    pub fn to<I: IntoIterator<Item = S>, S: Into<String>>(mut self, states: I) -> Self {
        self.to = collect(states);
        self
    }

    pub fn excluding_on<I: IntoIterator<Item = S>, S: Into<String>>(mut self, transitions: I) -> Self {
        self.excluded_on = collect(transitions);
        self
    }

    pub fn excluding_from<I: IntoIterator<Item = S>, S: Into<String>>(mut self, states: I) -> Self {
        self.excluded_from = collect(states);
        self
    }

    pub fn excluding_to<I: IntoIterator<Item = S>, S: Into<String>>(mut self, states: I) -> Self {
        self.excluded_to = collect(states);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn call(&self) -> &HookCall {
        &self.call
    }

    pub fn arguments(&self) -> &[Value] {
        &self.args
    }

    /// True if any filter is configured.
    pub fn is_filtered(&self) -> bool {
        [
            &self.on,
            &self.from,
            &self.to,
            &self.excluded_on,
            &self.excluded_from,
            &self.excluded_to,
        ]
        .iter()
        .any(|list| !list.is_empty())
    }

    /// Whether the filters select `event`.
    pub fn matches(&self, event: &TransitionEvent) -> bool {
        let transition = event.transition();
        let from = event.state();
        let to = event.config().to();

        allows(&self.on, transition)
            && allows(&self.from, from)
            && allows(&self.to, to)
            && !contains(&self.excluded_on, transition)
            && !contains(&self.excluded_from, from)
            && !contains(&self.excluded_to, to)
    }
}

fn collect<I: IntoIterator<Item = S>, S: Into<String>>(items: I) -> Vec<String> {
    items.into_iter().map(Into::into).collect()
}

fn contains(list: &[String], value: &str) -> bool {
    list.iter().any(|item| item == value)
}

// An empty filter list selects everything.
fn allows(list: &[String], value: &str) -> bool {
    list.is_empty() || contains(list, value)
}
