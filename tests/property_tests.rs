//! Property-based tests for the transition engine.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated graphs and starting states.

use graphstate::events::{Dispatcher, Topic};
use graphstate::hooks::Registry;
use graphstate::{EngineBuilder, EngineError, TransitionEngine, TransitionGraph};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

const STATES: [&str; 4] = ["S0", "S1", "S2", "S3"];

#[derive(Debug, Clone)]
struct Edge {
    from: Vec<&'static str>,
    to: &'static str,
}

prop_compose! {
    fn arbitrary_state()(index in 0..STATES.len()) -> &'static str {
        STATES[index]
    }
}

prop_compose! {
    fn arbitrary_edge()(
        from in proptest::sample::subsequence(STATES.to_vec(), 1..=STATES.len()),
        to in arbitrary_state(),
    ) -> Edge {
        Edge { from, to }
    }
}

fn graph(edges: &[Edge]) -> TransitionGraph {
    let transitions: Map<String, Value> = edges
        .iter()
        .enumerate()
        .map(|(i, edge)| (format!("t{i}"), json!({ "from": edge.from, "to": edge.to })))
        .collect();

    TransitionGraph::from_value(json!({
        "graph": "generated",
        "states": STATES,
        "transitions": transitions,
        "callbacks": {
            "guard": [{ "do": "count" }],
            "lock": [{ "do": "lock" }],
            "before": [{ "do": "count" }],
            "after": [{ "do": "count" }],
            "unlock": [{ "do": "count" }]
        }
    }))
    .unwrap()
}

fn registry(lock_passes: bool) -> Registry<Value> {
    fn bump(doc: &mut Value) {
        let calls = doc["calls"].as_u64().unwrap_or(0);
        doc["calls"] = json!(calls + 1);
    }

    Registry::new()
        .hook("count", |_, doc: &mut Value| {
            bump(doc);
            Ok(true)
        })
        .hook("lock", move |_, doc: &mut Value| {
            bump(doc);
            Ok(lock_passes)
        })
}

fn engine(edges: &[Edge], state: &str, lock_passes: bool) -> TransitionEngine<Value> {
    EngineBuilder::new(graph(edges))
        .registry(registry(lock_passes))
        .attach(json!({ "state": state, "calls": 0 }))
        .unwrap()
}

fn calls(engine: &TransitionEngine<Value>) -> u64 {
    engine.object()["calls"].as_u64().unwrap()
}

proptest! {
    #[test]
    fn can_is_false_outside_source_states(
        edges in prop::collection::vec(arbitrary_edge(), 1..6),
        state in arbitrary_state(),
    ) {
        let mut engine = engine(&edges, state, true);

        for (i, edge) in edges.iter().enumerate() {
            if !edge.from.contains(&state) {
                let allowed = engine.can(&format!("t{i}")).unwrap();
                prop_assert!(!allowed);
            }
        }
        prop_assert_eq!(calls(&engine), 0);
    }

    #[test]
    fn possible_transitions_follow_declaration_order(
        edges in prop::collection::vec(arbitrary_edge(), 0..6),
        state in arbitrary_state(),
    ) {
        let mut engine = engine(&edges, state, true);

        let expected: Vec<String> = edges
            .iter()
            .enumerate()
            .filter(|(_, edge)| edge.from.contains(&state))
            .map(|(i, _)| format!("t{i}"))
            .collect();

        prop_assert_eq!(engine.possible_transitions().unwrap(), expected);
    }

    #[test]
    fn soft_apply_never_fails_when_not_allowed(
        edges in prop::collection::vec(arbitrary_edge(), 1..6),
        state in arbitrary_state(),
    ) {
        let mut engine = engine(&edges, state, true);

        for (i, edge) in edges.iter().enumerate() {
            if edge.from.contains(&state) {
                continue;
            }
            let name = format!("t{i}");
            prop_assert_eq!(engine.apply_soft(&name), Ok(false));
            let strict_failed = matches!(
                engine.apply(&name),
                Err(EngineError::TransitionNotAllowed { .. })
            );
            prop_assert!(strict_failed);
            prop_assert_eq!(engine.state().unwrap(), state);
        }
    }

    #[test]
    fn failed_lock_never_changes_state(
        edge in arbitrary_edge(),
        state in arbitrary_state(),
    ) {
        let mut engine = engine(std::slice::from_ref(&edge), state, false);

        let result = engine.apply_soft("t0");

        if edge.from.contains(&state) {
            let lock_failed = matches!(result, Err(EngineError::LockFailed { .. }));
            prop_assert!(lock_failed);
            // one guard and one lock call
            prop_assert_eq!(calls(&engine), 2);
        } else {
            prop_assert_eq!(result, Ok(false));
        }
        prop_assert_eq!(engine.state().unwrap(), state);
    }

    #[test]
    fn pre_rejection_never_changes_state(
        edge in arbitrary_edge(),
        state in arbitrary_state(),
    ) {
        let mut bus = Dispatcher::new();
        bus.subscribe(Topic::PreTransition, |event| event.set_rejected());
        let mut engine = EngineBuilder::new(graph(std::slice::from_ref(&edge)))
            .registry(registry(true))
            .bus(bus)
            .attach(json!({ "state": state, "calls": 0 }))
            .unwrap();

        prop_assert_eq!(engine.apply("t0").ok(), if edge.from.contains(&state) {
            Some(false)
        } else {
            None
        });
        prop_assert_eq!(engine.state().unwrap(), state);
    }

    #[test]
    fn successful_apply_lands_on_target(
        edge in arbitrary_edge(),
        state in arbitrary_state(),
    ) {
        prop_assume!(edge.from.contains(&state));
        let mut engine = engine(std::slice::from_ref(&edge), state, true);

        prop_assert_eq!(engine.apply("t0"), Ok(true));
        prop_assert_eq!(engine.state().unwrap(), edge.to);
        // guard, lock, before, after and unlock each ran once
        prop_assert_eq!(calls(&engine), 5);
    }
}
