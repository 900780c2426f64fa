//! Event buses the engine publishes transition events on.

use super::event::{Topic, TransitionEvent};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Publishes transition events to subscribers.
///
/// Subscribers run synchronously before `publish` returns and may call
/// [`TransitionEvent::set_rejected`] to veto test and pre transitions.
pub trait EventBus: Send + Sync {
    fn publish(&self, topic: Topic, event: &mut TransitionEvent);
}

impl<B: EventBus + ?Sized> EventBus for Arc<B> {
    fn publish(&self, topic: Topic, event: &mut TransitionEvent) {
        (**self).publish(topic, event)
    }
}

/// Bus with no subscribers. Used when no bus is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopBus;

impl EventBus for NoopBus {
    fn publish(&self, _topic: Topic, _event: &mut TransitionEvent) {}
}

/// Subscriber callback.
pub type Subscriber = Box<dyn Fn(&mut TransitionEvent) + Send + Sync>;

/// In-process bus calling subscribers in subscription order.
///
/// # Example
///
/// ```rust
/// use graphstate::events::{Dispatcher, Topic};
///
/// let mut dispatcher = Dispatcher::new();
/// dispatcher.subscribe(Topic::PreTransition, |event| {
///     if event.transition() == "delete" {
///         event.set_rejected();
///     }
/// });
///
/// assert_eq!(dispatcher.subscriber_count(Topic::PreTransition), 1);
/// assert_eq!(dispatcher.subscriber_count(Topic::PostTransition), 0);
/// ```
#[derive(Default)]
pub struct Dispatcher {
    subscribers: HashMap<Topic, Vec<Subscriber>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscriber for `topic`.
    pub fn subscribe<F>(&mut self, topic: Topic, subscriber: F) -> &mut Self
    where
        F: Fn(&mut TransitionEvent) + Send + Sync + 'static,
    {
        self.subscribers
            .entry(topic)
            .or_default()
            .push(Box::new(subscriber));
        self
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.subscribers.get(&topic).map_or(0, Vec::len)
    }
}

impl EventBus for Dispatcher {
    fn publish(&self, topic: Topic, event: &mut TransitionEvent) {
        let Some(subscribers) = self.subscribers.get(&topic) else {
            return;
        };

        trace!(
            topic = %topic,
            transition = event.transition(),
            subscribers = subscribers.len(),
            "publishing transition event"
        );

        for subscriber in subscribers {
            subscriber(event);
        }
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<&str, usize> = self
            .subscribers
            .iter()
            .map(|(topic, subscribers)| (topic.as_str(), subscribers.len()))
            .collect();
        f.debug_struct("Dispatcher")
            .field("subscribers", &counts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TransitionDef;
    use serde_json::json;
    use std::sync::Mutex;

    fn event() -> TransitionEvent {
        let config: TransitionDef =
            serde_json::from_value(json!({ "from": ["draft"], "to": "published" })).unwrap();
        TransitionEvent::new("article", "publish", "draft", config)
    }

    #[test]
    fn subscribers_run_in_order_for_their_topic() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = Dispatcher::new();
        for label in ["first", "second"] {
            let seen = Arc::clone(&seen);
            dispatcher.subscribe(Topic::PreTransition, move |_event| {
                seen.lock().unwrap().push(label);
            });
        }
        let post = Arc::clone(&seen);
        dispatcher.subscribe(Topic::PostTransition, move |_event| {
            post.lock().unwrap().push("post");
        });

        dispatcher.publish(Topic::PreTransition, &mut event());

        assert_eq!(*seen.lock().unwrap(), ["first", "second"]);
    }

    #[test]
    fn subscribers_can_reject() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.subscribe(Topic::TestTransition, |event| event.set_rejected());
        let mut tested = event();
        let mut pre = event();

        dispatcher.publish(Topic::TestTransition, &mut tested);
        dispatcher.publish(Topic::PreTransition, &mut pre);

        assert!(tested.is_rejected());
        assert!(!pre.is_rejected());
    }

    #[test]
    fn noop_bus_never_rejects() {
        let mut event = event();

        NoopBus.publish(Topic::PreTransition, &mut event);

        assert!(!event.is_rejected());
    }

    #[test]
    fn shared_bus_delegates() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.subscribe(Topic::PreTransition, |event| event.set_rejected());
        let shared = Arc::new(dispatcher);
        let mut event = event();

        shared.publish(Topic::PreTransition, &mut event);

        assert!(event.is_rejected());
    }
}
