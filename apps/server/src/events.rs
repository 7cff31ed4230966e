use serde_json::Value;
use tokio::sync::broadcast;

/// Realtime event names pushed to connected clients.
pub const CERTIFICATION_CREATED: &str = "certification:created";
pub const GOALS_CHANGED: &str = "goals:changed";
pub const CHALLENGE_JOINED: &str = "challenge:joined";

/// Serializable envelope that carries event names and optional payloads.
#[derive(Clone, Debug)]
pub struct ServerEvent {
    pub name: &'static str,
    pub payload: Option<Value>,
    /// Group the event belongs to; `None` reaches only `audience_user`.
    pub group_id: Option<String>,
    pub audience_user: Option<String>,
}

impl ServerEvent {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            payload: None,
            group_id: None,
            audience_user: None,
        }
    }

    pub fn with_payload(name: &'static str, payload: Value) -> Self {
        Self {
            name,
            payload: Some(payload),
            group_id: None,
            audience_user: None,
        }
    }

    pub fn for_group(mut self, group_id: Option<String>) -> Self {
        self.group_id = group_id;
        self
    }

    pub fn for_user(mut self, user_id: impl Into<String>) -> Self {
        self.audience_user = Some(user_id.into());
        self
    }

    /// Whether a listener signed in as `user_id` in `group_id` should see
    /// this event.
    pub fn is_visible_to(&self, user_id: &str, group_id: Option<&str>) -> bool {
        if self.audience_user.as_deref() == Some(user_id) {
            return true;
        }
        match (&self.group_id, group_id) {
            (Some(event_group), Some(listener_group)) => event_group == listener_group,
            _ => false,
        }
    }
}

/// Lightweight broadcast bus that fans out events to any connected clients.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ServerEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: ServerEvent) {
        // Lagging listeners are ignored to avoid blocking producers.
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility() {
        let event = ServerEvent::new(CERTIFICATION_CREATED)
            .for_group(Some("grp".to_string()))
            .for_user("u1");
        assert!(event.is_visible_to("u1", None));
        assert!(event.is_visible_to("u2", Some("grp")));
        assert!(!event.is_visible_to("u3", Some("other")));
        assert!(!event.is_visible_to("u3", None));
    }

    #[tokio::test]
    async fn test_bus_fans_out() {
        let bus = EventBus::new(8);
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();
        bus.publish(ServerEvent::with_payload(
            GOALS_CHANGED,
            serde_json::json!({ "userId": "u1" }),
        ));
        assert_eq!(a.recv().await.unwrap().name, GOALS_CHANGED);
        assert_eq!(b.recv().await.unwrap().payload.unwrap()["userId"], "u1");
    }
}
