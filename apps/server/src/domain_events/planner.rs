//! Event planning functions for domain events.
//!
//! These functions turn a batch of domain events into realtime messages for
//! connected clients and push notifications for group members.

use std::collections::{BTreeSet, HashMap};

use goalie_core::deeplink::DeepLink;
use goalie_core::events::DomainEvent;
use goalie_core::users::User;
use serde::Serialize;
use serde_json::json;

use crate::events::{ServerEvent, CERTIFICATION_CREATED, CHALLENGE_JOINED, GOALS_CHANGED};

/// One notification addressed to one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushNotification {
    pub recipient_id: String,
    pub title: String,
    pub body: String,
    pub data: serde_json::Value,
}

/// Maps every domain event onto the realtime event clients listen for.
pub fn plan_realtime_events(events: &[DomainEvent]) -> Vec<ServerEvent> {
    events
        .iter()
        .map(|event| match event {
            DomainEvent::CertificationCreated {
                certification_id,
                user_id,
                goal_id,
                goal_name,
                group_id,
                photo_url,
                created_at,
            } => ServerEvent::with_payload(
                CERTIFICATION_CREATED,
                json!({
                    "certificationId": certification_id,
                    "userId": user_id,
                    "goalId": goal_id,
                    "goalName": goal_name,
                    "photoUrl": photo_url,
                    "createdAt": created_at,
                }),
            )
            .for_group(group_id.clone())
            .for_user(user_id.clone()),
            DomainEvent::GoalsChanged { user_id } => {
                ServerEvent::with_payload(GOALS_CHANGED, json!({ "userId": user_id }))
                    .for_user(user_id.clone())
            }
            DomainEvent::ChallengeJoined {
                user_id,
                group_id,
                year,
                month,
            } => ServerEvent::with_payload(
                CHALLENGE_JOINED,
                json!({ "userId": user_id, "year": year, "month": month }),
            )
            .for_group(Some(group_id.clone()))
            .for_user(user_id.clone()),
        })
        .collect()
}

/// Groups whose member lists are needed to plan notifications.
pub fn groups_to_notify(events: &[DomainEvent]) -> BTreeSet<String> {
    events
        .iter()
        .filter_map(|event| match event {
            DomainEvent::CertificationCreated {
                group_id: Some(group_id),
                ..
            } => Some(group_id.clone()),
            DomainEvent::ChallengeJoined { group_id, .. } => Some(group_id.clone()),
            _ => None,
        })
        .collect()
}

/// Plans notifications for every member of the actor's group except the
/// actor. Events of users outside a group notify nobody.
pub fn plan_push_notifications(
    events: &[DomainEvent],
    members_by_group: &HashMap<String, Vec<User>>,
) -> Vec<PushNotification> {
    let mut notifications = Vec::new();

    for event in events {
        let (group_id, actor_id) = match event {
            DomainEvent::CertificationCreated {
                group_id: Some(group_id),
                user_id,
                ..
            } => (group_id, user_id),
            DomainEvent::ChallengeJoined {
                group_id, user_id, ..
            } => (group_id, user_id),
            _ => continue,
        };
        let Some(members) = members_by_group.get(group_id) else {
            continue;
        };
        let actor_name = members
            .iter()
            .find(|m| &m.id == actor_id)
            .map(|m| m.display_name.as_str())
            .unwrap_or("A friend");

        let (title, body, data) = match event {
            DomainEvent::CertificationCreated {
                certification_id,
                goal_id,
                goal_name,
                ..
            } => (
                format!("{} checked in", actor_name),
                format!("New certification for \"{}\"", goal_name),
                json!({
                    "type": "certification",
                    "certificationId": certification_id,
                    "goalId": goal_id,
                    "userId": actor_id,
                }),
            ),
            DomainEvent::ChallengeJoined { month, .. } => (
                format!("{} joined the challenge", actor_name),
                format!("See who leads the month {} ranking", month),
                json!({
                    "type": "challenge",
                    "link": DeepLink::Challenge { month: *month }.to_uri(),
                }),
            ),
            DomainEvent::GoalsChanged { .. } => continue,
        };

        for member in members.iter().filter(|m| &m.id != actor_id) {
            notifications.push(PushNotification {
                recipient_id: member.id.clone(),
                title: title.clone(),
                body: body.clone(),
                data: data.clone(),
            });
        }
    }

    notifications
}
