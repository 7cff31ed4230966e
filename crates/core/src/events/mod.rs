//! Domain events module.
//!
//! Provides domain event types and the sink trait for emitting events
//! after successful domain mutations. The server runtime implements the sink
//! to fan events out to realtime listeners and push notifications.

mod domain_event;
mod sink;

pub use domain_event::*;
pub use sink::*;
