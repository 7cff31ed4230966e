//! Event queue worker for processing domain events.
//!
//! Receives events from an mpsc channel, debounces them briefly, then
//! publishes realtime events and fans out push notifications per batch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use goalie_core::{events::DomainEvent, users::UserRepositoryTrait};
use tokio::sync::mpsc;
use tokio::time::Instant;

use super::planner::{groups_to_notify, plan_push_notifications, plan_realtime_events};
use super::push::PushGateway;
use crate::events::EventBus;

/// Debounce window for collecting events before processing.
const DEBOUNCE_DURATION: Duration = Duration::from_millis(200);

/// Upper bound on how long a batch may keep collecting events.
const MAX_BATCH_AGE: Duration = Duration::from_secs(1);

/// Dependencies needed by the queue worker for processing events.
pub struct QueueWorkerDeps {
    pub event_bus: EventBus,
    pub user_repo: Arc<dyn UserRepositoryTrait>,
    pub push: Arc<dyn PushGateway>,
}

/// Runs the event queue worker until the channel closes.
pub async fn event_queue_worker(
    mut rx: mpsc::UnboundedReceiver<DomainEvent>,
    deps: Arc<QueueWorkerDeps>,
) {
    tracing::info!("Domain event queue worker started");

    let mut pending_events: Vec<DomainEvent> = Vec::new();
    let mut batch_deadline = Instant::now();

    loop {
        if pending_events.is_empty() {
            match rx.recv().await {
                Some(e) => {
                    pending_events.push(e);
                    batch_deadline = Instant::now() + MAX_BATCH_AGE;
                }
                None => {
                    tracing::info!("Domain event queue worker shutting down");
                    return;
                }
            }
            continue;
        }

        let flush_at = (Instant::now() + DEBOUNCE_DURATION).min(batch_deadline);
        tokio::select! {
            event = rx.recv() => {
                match event {
                    Some(e) => pending_events.push(e),
                    None => {
                        process_event_batch(&pending_events, &deps).await;
                        tracing::info!("Domain event queue worker shutting down");
                        return;
                    }
                }
            }
            _ = tokio::time::sleep_until(flush_at) => {
                let batch = std::mem::take(&mut pending_events);
                process_event_batch(&batch, &deps).await;
            }
        }
    }
}

/// Processes a batch of domain events.
async fn process_event_batch(events: &[DomainEvent], deps: &QueueWorkerDeps) {
    tracing::debug!("Processing batch of {} domain event(s)", events.len());

    for event in plan_realtime_events(events) {
        deps.event_bus.publish(event);
    }

    let mut members_by_group = HashMap::new();
    for group_id in groups_to_notify(events) {
        match deps.user_repo.load_group_members(&group_id) {
            Ok(members) => {
                members_by_group.insert(group_id, members);
            }
            Err(e) => tracing::warn!("Could not load members of group {}: {}", group_id, e),
        }
    }

    let notifications = plan_push_notifications(events, &members_by_group);
    if !notifications.is_empty() {
        tracing::info!("Sending {} push notification(s)", notifications.len());
        deps.push.send(notifications).await;
    }
}
