use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use log::debug;
use uuid::Uuid;

use crate::constants::DAYS_PER_WEEK;
use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink};
use crate::goals::goals_model::{Goal, GoalUpdate, NewGoal};
use crate::goals::goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
use crate::goals::weekly_reset::apply_weekly_reset;
use crate::utils::time_utils::{local_date, week_start};

pub struct GoalService {
    goal_repo: Arc<dyn GoalRepositoryTrait>,
    event_sink: Arc<dyn DomainEventSink>,
    tz: Tz,
}

impl GoalService {
    pub fn new(
        goal_repo: Arc<dyn GoalRepositoryTrait>,
        event_sink: Arc<dyn DomainEventSink>,
        tz: Tz,
    ) -> Self {
        GoalService {
            goal_repo,
            event_sink,
            tz,
        }
    }

    /// Loads a goal and checks that `user_id` owns it.
    fn load_owned_goal(&self, user_id: &str, goal_id: &str) -> Result<Goal> {
        let goal = self
            .goal_repo
            .find_goal(goal_id)?
            .ok_or_else(|| Error::NotFound(format!("Goal {}", goal_id)))?;
        if goal.user_id != user_id {
            return Err(Error::Forbidden(format!(
                "goal {} belongs to another user",
                goal_id
            )));
        }
        Ok(goal)
    }
}

#[async_trait]
impl GoalServiceTrait for GoalService {
    fn get_goals(&self, user_id: &str, now: DateTime<Utc>) -> Result<Vec<Goal>> {
        let today = local_date(now, self.tz);
        let goals = self.goal_repo.load_goals_for_user(user_id)?;
        Ok(goals
            .into_iter()
            .map(|goal| apply_weekly_reset(goal, today))
            .collect())
    }

    fn get_goal(&self, user_id: &str, goal_id: &str, now: DateTime<Utc>) -> Result<Goal> {
        let goal = self.load_owned_goal(user_id, goal_id)?;
        Ok(apply_weekly_reset(goal, local_date(now, self.tz)))
    }

    async fn create_goal(
        &self,
        user_id: &str,
        new_goal: NewGoal,
        now: DateTime<Utc>,
    ) -> Result<Goal> {
        new_goal.validate()?;
        let timestamp = now.naive_utc();
        let goal = Goal {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            icon: new_goal.icon,
            color: new_goal.color,
            name: new_goal.name.trim().to_string(),
            weekly_goal: new_goal.weekly_goal,
            progress: 0,
            completed_days: [false; DAYS_PER_WEEK],
            last_reset_date: week_start(local_date(now, self.tz)),
            weekly_history: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
        };
        let created = self.goal_repo.insert_new_goal(goal).await?;
        debug!("Created goal {} for user {}", created.id, user_id);
        self.event_sink
            .emit(DomainEvent::goals_changed(user_id.to_string()));
        Ok(created)
    }

    async fn update_goal(
        &self,
        user_id: &str,
        goal_id: &str,
        update: GoalUpdate,
        now: DateTime<Utc>,
    ) -> Result<Goal> {
        update.validate()?;
        self.load_owned_goal(user_id, goal_id)?;

        let updated = self
            .goal_repo
            .apply_goal_update(
                goal_id.to_string(),
                update,
                local_date(now, self.tz),
                now.naive_utc(),
            )
            .await?;
        self.event_sink
            .emit(DomainEvent::goals_changed(user_id.to_string()));
        Ok(updated)
    }

    async fn delete_goal(&self, user_id: &str, goal_id: &str) -> Result<usize> {
        self.load_owned_goal(user_id, goal_id)?;
        let deleted = self.goal_repo.delete_goal(goal_id.to_string()).await?;
        self.event_sink
            .emit(DomainEvent::goals_changed(user_id.to_string()));
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MockDomainEventSink;
    use crate::test_utils::{at, date, sample_goal, InMemoryStore};
    use crate::utils::time_utils::DEFAULT_TZ;

    fn service(store: &Arc<InMemoryStore>, sink: &MockDomainEventSink) -> GoalService {
        GoalService::new(store.clone(), Arc::new(sink.clone()), DEFAULT_TZ)
    }

    fn new_goal(weekly_goal: i32) -> NewGoal {
        NewGoal {
            icon: "📖".to_string(),
            color: "#3F51B5".to_string(),
            name: "  Read 20 pages ".to_string(),
            weekly_goal,
        }
    }

    #[tokio::test]
    async fn test_create_goal_starts_empty_at_week_start() {
        let store = Arc::new(InMemoryStore::default());
        let sink = MockDomainEventSink::new();
        let svc = service(&store, &sink);

        // Thursday 2024-05-16 in Seoul
        let created = svc
            .create_goal("u1", new_goal(3), at(2024, 5, 16, 3))
            .await
            .unwrap();

        assert_eq!(created.name, "Read 20 pages");
        assert_eq!(created.progress, 0);
        assert_eq!(created.completed_days, [false; 7]);
        assert_eq!(created.last_reset_date, date(2024, 5, 13));
        assert_eq!(sink.len(), 1);
    }

    #[tokio::test]
    async fn test_create_goal_rejects_invalid_target() {
        let store = Arc::new(InMemoryStore::default());
        let sink = MockDomainEventSink::new();
        let svc = service(&store, &sink);

        let err = svc
            .create_goal("u1", new_goal(0), at(2024, 5, 16, 3))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_get_goals_applies_weekly_reset() {
        let store = Arc::new(InMemoryStore::default());
        store.put_goal(sample_goal("g1", "u1", 2, 3, date(2024, 5, 13)));
        store.put_goal(sample_goal("g2", "u2", 1, 3, date(2024, 5, 13)));
        let sink = MockDomainEventSink::new();
        let svc = service(&store, &sink);

        let this_week = svc.get_goals("u1", at(2024, 5, 17, 3)).unwrap();
        assert_eq!(this_week.len(), 1);
        assert_eq!(this_week[0].progress, 2);

        let next_week = svc.get_goals("u1", at(2024, 5, 21, 3)).unwrap();
        assert_eq!(next_week[0].progress, 0);
        assert_eq!(next_week[0].completed_days, [false; 7]);

        // Reads never write back.
        assert_eq!(store.goal("g1").unwrap().progress, 2);
    }

    #[test]
    fn test_get_goal_checks_owner() {
        let store = Arc::new(InMemoryStore::default());
        store.put_goal(sample_goal("g1", "u1", 0, 3, date(2024, 5, 13)));
        let sink = MockDomainEventSink::new();
        let svc = service(&store, &sink);

        assert!(matches!(
            svc.get_goal("u2", "g1", at(2024, 5, 14, 3)),
            Err(Error::Forbidden(_))
        ));
        assert!(svc
            .get_goal("u1", "missing", at(2024, 5, 14, 3))
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_lowering_target_clamps_progress() {
        let store = Arc::new(InMemoryStore::default());
        store.put_goal(sample_goal("g1", "u1", 5, 6, date(2024, 5, 13)));
        let sink = MockDomainEventSink::new();
        let svc = service(&store, &sink);

        let updated = svc
            .update_goal(
                "u1",
                "g1",
                GoalUpdate {
                    weekly_goal: Some(3),
                    ..Default::default()
                },
                at(2024, 5, 15, 3),
            )
            .await
            .unwrap();
        assert_eq!(updated.weekly_goal, 3);
        assert_eq!(updated.progress, 3);
    }

    #[tokio::test]
    async fn test_update_after_week_boundary_persists_rollover() {
        let store = Arc::new(InMemoryStore::default());
        store.put_goal(sample_goal("g1", "u1", 2, 4, date(2024, 5, 13)));
        let sink = MockDomainEventSink::new();
        let svc = service(&store, &sink);

        let updated = svc
            .update_goal(
                "u1",
                "g1",
                GoalUpdate {
                    name: Some("Read".to_string()),
                    ..Default::default()
                },
                at(2024, 5, 22, 3),
            )
            .await
            .unwrap();
        assert_eq!(updated.progress, 0);
        assert_eq!(updated.last_reset_date, date(2024, 5, 20));
        assert_eq!(updated.weekly_history.len(), 1);
        assert_eq!(updated.weekly_history[0].progress, 2);
    }

    #[tokio::test]
    async fn test_delete_goal_requires_owner() {
        let store = Arc::new(InMemoryStore::default());
        store.put_goal(sample_goal("g1", "u1", 0, 3, date(2024, 5, 13)));
        let sink = MockDomainEventSink::new();
        let svc = service(&store, &sink);

        assert!(svc.delete_goal("u2", "g1").await.is_err());
        assert_eq!(svc.delete_goal("u1", "g1").await.unwrap(), 1);
        assert!(store.goal("g1").is_none());
    }
}
