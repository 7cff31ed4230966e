//! Delivery of planned push notifications to the external push gateway.

use async_trait::async_trait;
use futures::future::join_all;

use super::planner::PushNotification;

#[async_trait]
pub trait PushGateway: Send + Sync {
    /// Sends notifications without reporting failures back to the caller.
    async fn send(&self, notifications: Vec<PushNotification>);
}

/// Posts each notification as JSON to the configured gateway URL.
pub struct HttpPushGateway {
    client: reqwest::Client,
    url: String,
}

impl HttpPushGateway {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl PushGateway for HttpPushGateway {
    async fn send(&self, notifications: Vec<PushNotification>) {
        let requests = notifications.iter().map(|notification| async move {
            match self.client.post(&self.url).json(notification).send().await {
                Ok(resp) if resp.status().is_success() => {}
                Ok(resp) => tracing::warn!(
                    "Push gateway answered {} for {}",
                    resp.status(),
                    notification.recipient_id
                ),
                Err(e) => tracing::warn!(
                    "Push to {} failed: {}",
                    notification.recipient_id,
                    e
                ),
            }
        });
        join_all(requests).await;
    }
}

/// Used when no gateway is configured.
pub struct LogPushGateway;

#[async_trait]
impl PushGateway for LogPushGateway {
    async fn send(&self, notifications: Vec<PushNotification>) {
        for notification in notifications {
            tracing::info!(
                "Push (not delivered, no gateway configured) to {}: {}",
                notification.recipient_id,
                notification.title
            );
        }
    }
}
