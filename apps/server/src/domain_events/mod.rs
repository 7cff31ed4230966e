//! Domain events runtime bridge for the web server.
//!
//! Receives domain events via DomainEventSink, debounces them, and:
//! - publishes realtime events to SSE listeners
//! - sends push notifications to the other members of the actor's group

mod planner;
mod push;
mod queue_worker;
mod sink;

pub use planner::PushNotification;
pub use push::{HttpPushGateway, LogPushGateway, PushGateway};
pub use sink::WebDomainEventSink;
