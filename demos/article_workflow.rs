//! Article Publishing Workflow
//!
//! This example drives a plain Rust struct through a graph loaded from JSON.
//!
//! Key concepts:
//! - Graph declared as configuration (draft -> review -> published)
//! - Named guard and lock hooks registered in code
//! - Event subscribers vetoing a transition
//! - State-scoped actions gated by a condition
//!
//! Run with: cargo run --example article_workflow

use graphstate::events::{Dispatcher, Topic};
use graphstate::hooks::{HandlerError, Registry};
use graphstate::{EngineBuilder, EngineError, Stateful, TransitionGraph};
use serde_json::{json, Value};

const GRAPH: &str = r#"{
    "graph": "article",
    "property_path": "status",
    "states": {
        "draft": {
            "actions": ["preview"],
            "properties": { "editable": true }
        },
        "review": {
            "actions": ["preview", "notify"],
            "conditions": { "notify": ["object", "has_reviewer", true] }
        },
        "published": { "properties": ["visible"] }
    },
    "transitions": {
        "submit": { "from": ["draft"], "to": "review" },
        "reject": { "from": ["review"], "to": "draft" },
        "publish": { "from": ["review"], "to": "published", "properties": { "label": "Go live" } }
    },
    "callbacks": {
        "guard": [{ "on": ["submit"], "do": "long_enough" }],
        "lock": [{ "do": "lock" }],
        "unlock": [{ "do": "unlock" }],
        "after": [{ "do": ["audit", "record"], "to": ["published"] }],
        "action": [
            { "action": "preview", "do": ["object", "preview"] },
            { "action": "notify", "do": ["mailer", "send"], "args": ["reviewers"] }
        ]
    }
}"#;

// Article entity
struct Article {
    title: String,
    words: usize,
    status: String,
    reviewer: Option<String>,
    locked: bool,
}

impl Stateful for Article {
    fn read_property(&self, path: &str) -> Option<String> {
        (path == "status").then(|| self.status.clone())
    }

    fn write_property(&mut self, path: &str, value: &str) -> bool {
        if path != "status" {
            return false;
        }
        self.status = value.to_string();
        true
    }
}

fn registry() -> Registry<Article> {
    Registry::<Article>::new()
        .hook("long_enough", |_event, article: &mut Article| {
            Ok(article.words >= 100)
        })
        .hook("lock", |_event, article: &mut Article| {
            if article.locked {
                return Ok(false);
            }
            article.locked = true;
            Ok(true)
        })
        .hook("unlock", |_event, article: &mut Article| {
            article.locked = false;
            Ok(true)
        })
        .method("preview", |article, _args| {
            Ok(json!(format!("<h1>{}</h1>", article.title)))
        })
        .method("has_reviewer", |article, _args| {
            Ok(Value::Bool(article.reviewer.is_some()))
        })
        .service("mailer", "send", |args| {
            let list = args
                .first()
                .and_then(Value::as_str)
                .ok_or_else(|| HandlerError::new("mailer.send needs a recipient list"))?;
            Ok(json!({ "queued_for": list }))
        })
        .service("audit", "record", |_args| Ok(Value::Bool(true)))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Article Publishing Workflow ===\n");

    let graph = TransitionGraph::from_json(GRAPH)?;

    let mut bus = Dispatcher::new();
    bus.subscribe(Topic::PreTransition, |event| {
        if event.transition() == "reject" {
            println!("  [bus] rejections are disabled this week");
            event.set_rejected();
        }
    });
    bus.subscribe(Topic::PostTransition, |event| {
        println!(
            "  [bus] {}: {} -> {}",
            event.transition(),
            event.state(),
            event.config().to()
        );
    });

    let mut engine = EngineBuilder::new(graph)
        .registry(registry())
        .bus(bus)
        .attach(Article {
            title: "Ownership in practice".to_string(),
            words: 40,
            status: "draft".to_string(),
            reviewer: None,
            locked: false,
        })?;

    println!("Initial state: {}", engine.state()?);
    println!("Editable: {}", engine.has_state_property("editable")?);
    println!("Preview: {}", engine.apply_action("preview")?);

    println!("\nSubmitting a 40 word draft...");
    match engine.apply("submit") {
        Err(EngineError::TransitionNotAllowed { state, .. }) => {
            println!("  refused while in {state}")
        }
        other => println!("  unexpected: {other:?}"),
    }

    engine.object_mut().words = 850;
    println!("\nSubmitting after the rewrite...");
    engine.apply("submit")?;
    println!("State: {}", engine.state()?);

    println!("\nPossible actions: {:?}", engine.possible_actions()?);
    println!("Notify (soft): {}", engine.apply_action_soft("notify")?);
    engine.object_mut().reviewer = Some("lee".to_string());
    println!("Notify: {}", engine.apply_action("notify")?);

    println!("\nPossible transitions: {:?}", engine.possible_transitions()?);
    println!("Reject applied: {}", engine.apply("reject")?);
    println!(
        "Publish label present: {}",
        engine.has_transition_property("publish", "label")
    );
    engine.apply("publish")?;

    let article = engine.into_inner();
    println!("\nFinal state: {} (locked: {})", article.status, article.locked);

    Ok(())
}
