//! Domain event types.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Domain events emitted by core services after successful mutations.
///
/// These events represent facts about domain data changes. Runtime adapters
/// translate them into platform-specific actions (realtime feed updates,
/// push notifications to group members).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A certification photo was recorded against a goal.
    CertificationCreated {
        certification_id: String,
        user_id: String,
        goal_id: String,
        goal_name: String,
        /// Group of the author at the time of the check-in
        group_id: Option<String>,
        photo_url: String,
        created_at: NaiveDateTime,
    },

    /// A user's goals were created, edited, or deleted.
    GoalsChanged { user_id: String },

    /// A user enrolled in a monthly group challenge.
    ChallengeJoined {
        user_id: String,
        group_id: String,
        year: i32,
        month: u32,
    },
}

impl DomainEvent {
    /// Creates a GoalsChanged event.
    pub fn goals_changed(user_id: String) -> Self {
        Self::GoalsChanged { user_id }
    }

    /// Creates a ChallengeJoined event.
    pub fn challenge_joined(user_id: String, group_id: String, year: i32, month: u32) -> Self {
        Self::ChallengeJoined {
            user_id,
            group_id,
            year,
            month,
        }
    }

    /// User whose action produced the event.
    pub fn actor_id(&self) -> &str {
        match self {
            DomainEvent::CertificationCreated { user_id, .. }
            | DomainEvent::GoalsChanged { user_id }
            | DomainEvent::ChallengeJoined { user_id, .. } => user_id,
        }
    }
}
