//! Structural checks over a parsed graph configuration.
//!
//! Every issue is collected, not just the first. Semantic checks such as
//! "the target state of a transition is declared" are left to the engine,
//! which reports them when the transition is applied.

use super::config::GraphConfig;
use super::error::ConfigIssue;
use super::HookPosition;
use crate::core::{Invocation, Target};
use crate::hooks::HookCall;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<ConfigIssue>>;

/// Check a configuration, accumulating ALL issues.
pub(crate) fn validate(config: &GraphConfig) -> Check {
    let mut checks: Vec<Check> = Vec::new();

    checks.push(require(!is_blank(&config.graph), || {
        ConfigIssue::BlankGraphName
    }));

    if let Some(path) = &config.property_path {
        checks.push(require(!is_blank(path), || ConfigIssue::BlankPropertyPath));
    }

    for (name, state) in &config.states {
        checks.push(named("state", name, "states"));
        for action in state.actions() {
            checks.push(named("action", action, &format!("states.{name}.actions")));
        }
        for (action, condition) in &state.conditions {
            let location = format!("states.{name}.conditions.{action}");
            checks.push(named("action", action, &location));
            checks.extend(invocation(condition.invocation(), &location));
        }
    }

    for (name, transition) in &config.transitions {
        let location = format!("transitions.{name}");
        checks.push(named("transition", name, "transitions"));
        checks.push(named("state", transition.to(), &location));
        for source in transition.from() {
            checks.push(named("state", source, &location));
        }
    }

    for position in HookPosition::ALL {
        for (index, descriptor) in config.callbacks.slot(position).iter().enumerate() {
            let location = format!("callbacks.{position}[{index}]");
            match descriptor.call() {
                HookCall::Named(name) => checks.push(named("hook", name, &location)),
                HookCall::Method(target) => checks.extend(invocation(target, &location)),
            }
        }
    }

    for (index, callback) in config.callbacks.action.iter().enumerate() {
        let location = format!("callbacks.action[{index}]");
        checks.push(named("action", callback.action(), &location));
        checks.extend(invocation(callback.invocation(), &location));
    }

    Validation::all_vec(checks).map(|_| ())
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn require(ok: bool, issue: impl FnOnce() -> ConfigIssue) -> Check {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(issue())
    }
}

fn named(kind: &'static str, name: &str, location: &str) -> Check {
    require(!is_blank(name), || ConfigIssue::BlankName {
        kind,
        location: location.to_string(),
    })
}

fn invocation(invocation: &Invocation, location: &str) -> [Check; 2] {
    let target_ok = match &invocation.target {
        Target::Object => true,
        Target::External(id) => !is_blank(id),
    };
    [
        require(target_ok, || ConfigIssue::BlankTarget {
            location: location.to_string(),
        }),
        require(!is_blank(&invocation.method), || ConfigIssue::BlankMethod {
            location: location.to_string(),
        }),
    ]
}
