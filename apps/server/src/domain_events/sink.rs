//! Web domain event sink implementation.
//!
//! Receives domain events and sends them to a background queue worker.

use std::sync::{Arc, Mutex};

use goalie_core::{
    events::{DomainEvent, DomainEventSink},
    users::UserRepositoryTrait,
};
use tokio::sync::mpsc;

use super::push::PushGateway;
use super::queue_worker::{event_queue_worker, QueueWorkerDeps};
use crate::events::EventBus;

/// Domain event sink for the web server runtime.
///
/// Services receive the sink when they are built; the worker that drains it
/// is started afterwards with [`WebDomainEventSink::start_worker`]. Events
/// emitted in between are buffered by the channel.
pub struct WebDomainEventSink {
    tx: mpsc::UnboundedSender<DomainEvent>,
    rx: Mutex<Option<mpsc::UnboundedReceiver<DomainEvent>>>,
}

impl WebDomainEventSink {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            tx,
            rx: Mutex::new(Some(rx)),
        }
    }

    /// Starts the background worker that processes events. Only the first
    /// call has an effect.
    pub fn start_worker(
        &self,
        event_bus: EventBus,
        user_repo: Arc<dyn UserRepositoryTrait>,
        push: Arc<dyn PushGateway>,
    ) {
        let rx = match self.rx.lock() {
            Ok(mut guard) => guard.take(),
            Err(_) => None,
        };
        let Some(rx) = rx else {
            tracing::warn!("Domain event worker already started");
            return;
        };

        let deps = Arc::new(QueueWorkerDeps {
            event_bus,
            user_repo,
            push,
        });

        tokio::spawn(event_queue_worker(rx, deps));
    }

    #[cfg(test)]
    pub fn with_sender(tx: mpsc::UnboundedSender<DomainEvent>) -> Self {
        Self {
            tx,
            rx: Mutex::new(None),
        }
    }
}

impl Default for WebDomainEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainEventSink for WebDomainEventSink {
    fn emit(&self, event: DomainEvent) {
        // Domain events are best-effort; a closed channel drops the event.
        if let Err(e) = self.tx.send(event) {
            tracing::warn!("Failed to emit domain event: {}", e);
        }
    }
}
