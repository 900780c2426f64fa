//! End-to-end scenarios for the transition engine.
//!
//! Domain objects are JSON documents carrying a `log` array that hooks
//! append to, so call order and observed state can be asserted directly.

use graphstate::core::AccessError;
use graphstate::events::{Dispatcher, Topic};
use graphstate::hooks::{HandlerError, Registry};
use graphstate::{EngineBuilder, EngineError, TransitionEngine, TransitionGraph};
use serde_json::{json, Value};

fn record(doc: &mut Value, entry: String) {
    doc["log"].as_array_mut().unwrap().push(Value::String(entry));
}

fn log(engine: &TransitionEngine<Value>) -> Vec<String> {
    engine.object()["log"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry.as_str().unwrap().to_string())
        .collect()
}

fn doc(state: &str) -> Value {
    json!({ "state": state, "log": [] })
}

fn go_graph(callbacks: Value) -> TransitionGraph {
    TransitionGraph::from_value(json!({
        "graph": "simple",
        "states": ["S1", "S2"],
        "transitions": { "go": { "from": ["S1"], "to": "S2" } },
        "callbacks": callbacks
    }))
    .unwrap()
}

/// Registry with one recording hook per position; `refuse` names the
/// positions whose hook returns `false`.
fn recording_registry(refuse: &'static [&'static str]) -> Registry<Value> {
    ["guard", "lock", "before", "after", "unlock"]
        .into_iter()
        .fold(Registry::new(), |registry, position| {
            registry.hook(position, move |_event, doc: &mut Value| {
                let state = doc["state"].as_str().unwrap().to_string();
                record(doc, format!("{position}@{state}"));
                Ok(!refuse.contains(&position))
            })
        })
}

fn all_positions() -> Value {
    json!({
        "guard": [{ "do": "guard" }],
        "lock": [{ "do": "lock" }],
        "before": [{ "do": "before" }],
        "after": [{ "do": "after" }],
        "unlock": [{ "do": "unlock" }]
    })
}

fn recording_engine(refuse: &'static [&'static str]) -> TransitionEngine<Value> {
    EngineBuilder::new(go_graph(all_positions()))
        .registry(recording_registry(refuse))
        .attach(doc("S1"))
        .unwrap()
}

#[test]
fn applies_transition_without_hooks() {
    let mut engine = TransitionEngine::new(doc("S1"), go_graph(json!({}))).unwrap();

    assert!(engine.can("go").unwrap());
    assert!(engine.apply("go").unwrap());
    assert_eq!(engine.state().unwrap(), "S2");
    assert!(!engine.can("go").unwrap());
}

#[test]
fn hooks_run_in_pipeline_order_around_the_state_change() {
    let mut engine = recording_engine(&[]);

    assert!(engine.apply("go").unwrap());

    assert_eq!(
        log(&engine),
        [
            "guard@S1",
            "lock@S1",
            "before@S1",
            "after@S2",
            "unlock@S2"
        ]
    );
}

#[test]
fn failed_lock_leaves_state_unchanged() {
    let mut engine = recording_engine(&["lock"]);

    let error = engine.apply("go").unwrap_err();

    assert!(matches!(error, EngineError::LockFailed { ref transition, .. } if transition == "go"));
    assert_eq!(engine.state().unwrap(), "S1");
    assert_eq!(log(&engine), ["guard@S1", "lock@S1"]);
}

#[test]
fn failed_unlock_keeps_new_state() {
    let mut engine = recording_engine(&["unlock"]);

    let error = engine.apply("go").unwrap_err();

    assert!(matches!(error, EngineError::UnlockFailed { .. }));
    assert_eq!(engine.state().unwrap(), "S2");
    assert_eq!(log(&engine).last().map(String::as_str), Some("unlock@S2"));
}

#[test]
fn refusing_guard_does_not_stop_later_guards() {
    let graph = go_graph(json!({
        "guard": [{ "do": "no" }, { "do": "yes" }]
    }));
    let registry = Registry::<Value>::new()
        .hook("no", |_, doc: &mut Value| {
            record(doc, "no".to_string());
            Ok(false)
        })
        .hook("yes", |_, doc: &mut Value| {
            record(doc, "yes".to_string());
            Ok(true)
        });
    let mut engine = EngineBuilder::new(graph)
        .registry(registry)
        .attach(doc("S1"))
        .unwrap();

    assert!(!engine.can("go").unwrap());
    assert_eq!(log(&engine), ["no", "yes"]);
}

#[test]
fn can_is_false_outside_source_states_without_hooks() {
    let mut engine = EngineBuilder::new(go_graph(all_positions()))
        .registry(recording_registry(&[]))
        .attach(doc("S2"))
        .unwrap();

    assert!(!engine.can("go").unwrap());
    assert!(log(&engine).is_empty());
}

#[test]
fn soft_apply_returns_false_where_strict_apply_fails() {
    let mut engine = TransitionEngine::new(doc("S2"), go_graph(json!({}))).unwrap();

    assert!(!engine.apply_soft("go").unwrap());

    let error = engine.apply("go").unwrap_err();
    match error {
        EngineError::TransitionNotAllowed {
            transition, state, graph, ..
        } => {
            assert_eq!(transition, "go");
            assert_eq!(state, "S2");
            assert_eq!(graph, "simple");
        }
        other => panic!("Expected TransitionNotAllowed, got {other:?}"),
    }
    assert_eq!(engine.state().unwrap(), "S2");
}

#[test]
fn unknown_transition_is_an_error() {
    let mut engine = TransitionEngine::new(doc("S1"), go_graph(json!({}))).unwrap();

    assert!(matches!(
        engine.can("fly"),
        Err(EngineError::UnknownTransition { ref transition, .. }) if transition == "fly"
    ));
    assert!(matches!(
        engine.apply_soft("fly"),
        Err(EngineError::UnknownTransition { .. })
    ));
}

#[test]
fn test_rejection_skips_guards() {
    let mut bus = Dispatcher::new();
    bus.subscribe(Topic::TestTransition, |event| event.set_rejected());

    let mut engine = EngineBuilder::new(go_graph(all_positions()))
        .registry(recording_registry(&[]))
        .bus(bus)
        .attach(doc("S1"))
        .unwrap();

    assert!(!engine.can("go").unwrap());
    assert!(!engine.apply_soft("go").unwrap());
    assert!(matches!(
        engine.apply("go"),
        Err(EngineError::TransitionNotAllowed { .. })
    ));
    assert!(log(&engine).is_empty());
}

#[test]
fn pre_rejection_is_false_not_an_error() {
    let mut bus = Dispatcher::new();
    bus.subscribe(Topic::PreTransition, |event| event.set_rejected());

    let mut engine = EngineBuilder::new(go_graph(all_positions()))
        .registry(recording_registry(&[]))
        .bus(bus)
        .attach(doc("S1"))
        .unwrap();

    assert!(!engine.apply("go").unwrap());
    assert_eq!(engine.state().unwrap(), "S1");
    assert_eq!(log(&engine), ["guard@S1"]);
}

#[test]
fn events_are_published_in_order() {
    use std::sync::{Arc, Mutex};

    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut bus = Dispatcher::new();
    for topic in [
        Topic::TestTransition,
        Topic::PreTransition,
        Topic::PostTransition,
    ] {
        let seen = Arc::clone(&seen);
        bus.subscribe(topic, move |event| {
            seen.lock()
                .unwrap()
                .push(format!("{topic}:{}:{}", event.transition(), event.state()));
        });
    }

    let mut engine = EngineBuilder::new(go_graph(json!({})))
        .bus(bus)
        .attach(doc("S1"))
        .unwrap();
    engine.apply("go").unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        [
            "test_transition:go:S1",
            "pre_transition:go:S1",
            "post_transition:go:S1"
        ]
    );
}

#[test]
fn undeclared_target_state_fails_after_lock_and_before() {
    let graph = TransitionGraph::from_value(json!({
        "graph": "broken",
        "states": ["S1"],
        "transitions": { "go": { "from": ["S1"], "to": "S9" } },
        "callbacks": all_positions()
    }))
    .unwrap();
    let mut engine = EngineBuilder::new(graph)
        .registry(recording_registry(&[]))
        .attach(doc("S1"))
        .unwrap();

    let error = engine.apply("go").unwrap_err();

    assert!(matches!(error, EngineError::UnknownState { ref state, .. } if state == "S9"));
    assert_eq!(engine.state().unwrap(), "S1");
    assert_eq!(log(&engine), ["guard@S1", "lock@S1", "before@S1"]);
}

#[test]
fn handler_errors_propagate_after_state_change() {
    let graph = go_graph(json!({ "after": [{ "do": "explode" }] }));
    let registry = Registry::<Value>::new()
        .hook("explode", |_, _doc: &mut Value| Err(HandlerError::new("disk full")));
    let mut engine = EngineBuilder::new(graph)
        .registry(registry)
        .attach(doc("S1"))
        .unwrap();

    let error = engine.apply("go").unwrap_err();

    assert_eq!(error, EngineError::Handler(HandlerError::new("disk full")));
    assert_eq!(engine.state().unwrap(), "S2");
}

#[test]
fn unregistered_hook_is_reported_when_first_needed() {
    let graph = go_graph(json!({ "before": [{ "do": "missing" }] }));
    let mut engine = TransitionEngine::new(doc("S1"), graph).unwrap();

    assert!(engine.can("go").unwrap());
    assert_eq!(
        engine.apply("go").unwrap_err(),
        EngineError::UnknownHandler {
            handler: "missing".to_string()
        }
    );
}

#[test]
fn filtered_hooks_only_run_for_matching_transitions() {
    let graph = TransitionGraph::from_value(json!({
        "graph": "simple",
        "states": ["S1", "S2"],
        "transitions": {
            "go": { "from": ["S1"], "to": "S2" },
            "back": { "from": ["S2"], "to": "S1" }
        },
        "callbacks": {
            "after": [
                { "on": ["go"], "do": "after" },
                { "excluded_to": ["S2"], "do": "before" }
            ]
        }
    }))
    .unwrap();
    let mut engine = EngineBuilder::new(graph)
        .registry(recording_registry(&[]))
        .attach(doc("S1"))
        .unwrap();

    engine.apply("go").unwrap();
    engine.apply("back").unwrap();

    assert_eq!(log(&engine), ["after@S2", "before@S1"]);
}

#[test]
fn method_hooks_use_result_truthiness() {
    let graph = go_graph(json!({
        "guard": [{ "do": ["object", "quota"], "args": ["uploads"] }]
    }));
    let registry = Registry::<Value>::new().method("quota", |doc, args| {
        let key = args[0].as_str().unwrap_or_default();
        Ok(doc["quota"][key].clone())
    });
    let mut engine = EngineBuilder::new(graph)
        .registry(registry)
        .attach(json!({ "state": "S1", "quota": { "uploads": 0 } }))
        .unwrap();

    assert!(!engine.can("go").unwrap());

    engine.object_mut()["quota"]["uploads"] = json!(3);
    assert!(engine.can("go").unwrap());
}

#[test]
fn possible_transitions_follow_declaration_order() {
    let graph = TransitionGraph::from_value(json!({
        "graph": "pair",
        "states": ["S1", "S2"],
        "transitions": {
            "a": { "from": ["S1"], "to": "S2" },
            "b": { "from": ["S2"], "to": "S1" },
            "c": { "from": ["S1", "S2"], "to": "S1" }
        }
    }))
    .unwrap();
    let mut engine = TransitionEngine::new(doc("S1"), graph).unwrap();

    assert_eq!(engine.possible_transitions().unwrap(), ["a", "c"]);
}

#[test]
fn bad_property_path_is_a_configuration_error() {
    let graph = TransitionGraph::from_value(json!({
        "graph": "article",
        "property_path": "status",
        "states": ["draft"]
    }))
    .unwrap();

    let error = TransitionEngine::new(doc("draft"), graph).unwrap_err();

    assert!(matches!(
        error,
        EngineError::Configuration { ref path, ref graph, .. } if path == "status" && graph == "article"
    ));
}

#[test]
fn null_state_attaches_in_no_state() {
    let mut engine = EngineBuilder::new(article_graph())
        .registry(article_registry())
        .attach(json!({ "state": null, "ready": true, "log": [] }))
        .unwrap();

    assert!(!engine.can("go_live").unwrap());
    assert!(engine.possible_transitions().unwrap().is_empty());
    assert!(engine.possible_actions().unwrap().is_empty());
    assert!(!engine.can_action("publish").unwrap());
    assert_eq!(engine.state_properties().unwrap(), None);
    assert!(!engine.apply_soft("go_live").unwrap());
    assert!(matches!(
        engine.apply("go_live"),
        Err(EngineError::TransitionNotAllowed { ref state, .. }) if state.is_empty()
    ));
    assert!(matches!(
        engine.state(),
        Err(EngineError::Access {
            source: AccessError::NotAState { .. },
            ..
        })
    ));
    assert!(log(&engine).is_empty());
}

#[test]
fn nested_property_path_is_followed() {
    let graph = TransitionGraph::from_value(json!({
        "graph": "article",
        "property_path": "meta.status",
        "states": ["draft", "published"],
        "transitions": { "publish": { "from": ["draft"], "to": "published" } }
    }))
    .unwrap();
    let mut engine =
        TransitionEngine::new(json!({ "meta": { "status": "draft" } }), graph).unwrap();

    engine.apply("publish").unwrap();

    assert_eq!(engine.into_inner()["meta"]["status"], "published");
}

fn article_graph() -> TransitionGraph {
    TransitionGraph::from_value(json!({
        "graph": "article",
        "states": {
            "draft": {
                "actions": ["publish", "edit", "archive"],
                "conditions": { "publish": ["object", "is_ready", true] },
                "properties": { "editable": true, "color": "grey" }
            },
            "published": { "properties": ["visible", "indexed"] }
        },
        "transitions": {
            "go_live": {
                "from": ["draft"],
                "to": "published",
                "properties": { "label": "Go live" }
            }
        },
        "callbacks": {
            "action": [
                { "action": "publish", "do": ["object", "publish"] },
                { "action": "edit", "on": ["draft"], "do": ["editor", "open"], "args": ["markdown"] }
            ]
        }
    }))
    .unwrap()
}

fn article_registry() -> Registry<Value> {
    Registry::new()
        .method("is_ready", |doc: &mut Value, _: &[Value]| Ok(doc["ready"].clone()))
        .method("publish", |doc: &mut Value, _: &[Value]| {
            record(doc, "publish".to_string());
            Ok(json!({ "published": true }))
        })
        .service("editor", "open", |args: &[Value]| {
            Ok(json!({ "mode": args.first().cloned().unwrap_or(Value::Null) }))
        })
}

fn article(ready: bool) -> TransitionEngine<Value> {
    EngineBuilder::new(article_graph())
        .registry(article_registry())
        .attach(json!({ "state": "draft", "ready": ready, "log": [] }))
        .unwrap()
}

#[test]
fn unmet_condition_blocks_action() {
    let mut engine = article(false);

    assert!(!engine.can_action("publish").unwrap());
    assert_eq!(engine.apply_action_soft("publish").unwrap(), json!(false));
    assert!(matches!(
        engine.apply_action("publish"),
        Err(EngineError::ActionNotAllowed { ref action, ref state, .. })
            if action == "publish" && state == "draft"
    ));
    assert!(log(&engine).is_empty());
}

#[test]
fn condition_compares_strictly() {
    let mut engine = EngineBuilder::new(article_graph())
        .registry(article_registry())
        .attach(json!({ "state": "draft", "ready": 1, "log": [] }))
        .unwrap();

    assert!(!engine.can_action("publish").unwrap());
}

#[test]
fn met_condition_runs_action_handler() {
    let mut engine = article(true);

    assert!(engine.can_action("publish").unwrap());
    assert_eq!(
        engine.apply_action("publish").unwrap(),
        json!({ "published": true })
    );
    assert_eq!(log(&engine), ["publish"]);
}

#[test]
fn external_action_receives_configured_arguments() {
    let mut engine = article(false);

    assert_eq!(
        engine.apply_action("edit").unwrap(),
        json!({ "mode": "markdown" })
    );
}

#[test]
fn listed_action_without_callback_is_not_found() {
    let mut engine = article(false);

    assert!(engine.can_action("archive").unwrap());
    assert!(matches!(
        engine.apply_action_soft("archive"),
        Err(EngineError::CallbackNotFound { ref action, .. }) if action == "archive"
    ));
}

#[test]
fn actions_outside_current_state_are_not_allowed() {
    let mut engine = article(true);
    engine.apply("go_live").unwrap();

    assert!(!engine.can_action("publish").unwrap());
    assert!(engine.possible_actions().unwrap().is_empty());
}

#[test]
fn possible_actions_respect_conditions() {
    assert_eq!(article(true).possible_actions().unwrap(), ["publish", "edit", "archive"]);
    assert_eq!(article(false).possible_actions().unwrap(), ["edit", "archive"]);
}

#[test]
fn properties_match_keys_or_values() {
    let mut engine = article(true);

    assert!(engine.has_state_property("editable").unwrap());
    assert!(engine.has_state_property("grey").unwrap());
    assert!(!engine.has_state_property("visible").unwrap());
    assert_eq!(
        engine
            .state_properties()
            .unwrap()
            .and_then(|properties| properties.get("color")),
        Some(&json!("grey"))
    );

    assert!(engine.has_transition_property("go_live", "label"));
    assert!(!engine.has_transition_property("go_live", "hidden"));
    assert!(!engine.has_transition_property("teleport", "label"));
    assert!(engine.transition_properties("teleport").is_none());

    engine.apply("go_live").unwrap();
    assert!(engine.has_state_property("indexed").unwrap());
}

#[test]
fn one_graph_drives_many_objects() {
    let graph = std::sync::Arc::new(go_graph(json!({})));

    let mut first = TransitionEngine::new(doc("S1"), graph.clone()).unwrap();
    let mut second = TransitionEngine::new(doc("S2"), graph).unwrap();

    assert!(first.apply("go").unwrap());
    assert!(!second.apply_soft("go").unwrap());
    assert_eq!(first.graph_name(), second.graph().name());
}
