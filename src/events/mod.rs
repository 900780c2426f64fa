//! Transition lifecycle events.
//!
//! The engine publishes a [`TransitionEvent`] on three topics:
//! `test_transition` (from `can`), `pre_transition` and `post_transition`
//! (from `apply`). Subscribers on the first two may reject the transition.

mod bus;
mod event;

pub use bus::{Dispatcher, EventBus, NoopBus, Subscriber};
pub use event::{Topic, TransitionEvent};
