use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use log::info;
use uuid::Uuid;

use crate::challenges::challenges_model::{ChallengeEnrollment, ChallengeMember, ChallengeRanking};
use crate::challenges::challenges_traits::{ChallengeRepositoryTrait, ChallengeServiceTrait};
use crate::challenges::ranking::{rank_members, total_progress};
use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink};
use crate::goals::{apply_weekly_reset, Goal, GoalRepositoryTrait};
use crate::users::{User, UserRepositoryTrait};
use crate::utils::time_utils::{local_date, YearMonth};

pub struct ChallengeService {
    challenge_repo: Arc<dyn ChallengeRepositoryTrait>,
    user_repo: Arc<dyn UserRepositoryTrait>,
    goal_repo: Arc<dyn GoalRepositoryTrait>,
    event_sink: Arc<dyn DomainEventSink>,
    tz: Tz,
}

impl ChallengeService {
    pub fn new(
        challenge_repo: Arc<dyn ChallengeRepositoryTrait>,
        user_repo: Arc<dyn UserRepositoryTrait>,
        goal_repo: Arc<dyn GoalRepositoryTrait>,
        event_sink: Arc<dyn DomainEventSink>,
        tz: Tz,
    ) -> Self {
        ChallengeService {
            challenge_repo,
            user_repo,
            goal_repo,
            event_sink,
            tz,
        }
    }

    /// Loads the user and the group they currently belong to.
    fn load_grouped_user(&self, user_id: &str) -> Result<(User, String)> {
        let user = self
            .user_repo
            .find_user(user_id)?
            .ok_or_else(|| Error::NotFound(format!("User {}", user_id)))?;
        let group_id = user.group_id.clone().ok_or_else(|| {
            Error::ConstraintViolation(format!("user {} is not in a group", user_id))
        })?;
        Ok((user, group_id))
    }
}

#[async_trait]
impl ChallengeServiceTrait for ChallengeService {
    async fn join_challenge(
        &self,
        user_id: &str,
        month: YearMonth,
        now: DateTime<Utc>,
    ) -> Result<ChallengeEnrollment> {
        let (_, group_id) = self.load_grouped_user(user_id)?;

        if let Some(existing) = self.challenge_repo.find_enrollment(user_id, month)? {
            if existing.group_id == group_id {
                return Ok(existing);
            }
            // Enrolled with a previous group; move the enrollment along.
            self.challenge_repo
                .delete_enrollment(user_id.to_string(), month)
                .await?;
        }

        let enrollment = self
            .challenge_repo
            .insert_enrollment(ChallengeEnrollment {
                id: Uuid::new_v4().to_string(),
                user_id: user_id.to_string(),
                group_id: group_id.clone(),
                year: month.year,
                month: month.month,
                joined_at: now.naive_utc(),
            })
            .await?;
        info!("User {} joined the {} challenge of group {}", user_id, month, group_id);

        self.event_sink.emit(DomainEvent::challenge_joined(
            user_id.to_string(),
            group_id,
            month.year,
            month.month,
        ));
        Ok(enrollment)
    }

    async fn leave_challenge(&self, user_id: &str, month: YearMonth) -> Result<usize> {
        self.challenge_repo
            .delete_enrollment(user_id.to_string(), month)
            .await
    }

    fn get_ranking(
        &self,
        user_id: &str,
        month: YearMonth,
        now: DateTime<Utc>,
    ) -> Result<ChallengeRanking> {
        let (_, group_id) = self.load_grouped_user(user_id)?;
        let today = local_date(now, self.tz);

        let member_ids: Vec<String> = self
            .challenge_repo
            .load_enrollments(&group_id, month)?
            .into_iter()
            .map(|enrollment| enrollment.user_id)
            .collect();

        // Members who have since left the group drop off the board.
        let users: Vec<User> = self
            .user_repo
            .load_users(&member_ids)?
            .into_iter()
            .filter(|user| user.group_id.as_deref() == Some(group_id.as_str()))
            .collect();

        let mut goals_by_user: HashMap<String, Vec<Goal>> = HashMap::new();
        for goal in self.goal_repo.load_goals_for_users(&member_ids)? {
            goals_by_user
                .entry(goal.user_id.clone())
                .or_default()
                .push(apply_weekly_reset(goal, today));
        }

        let members = users
            .into_iter()
            .map(|user| {
                let goals = goals_by_user.remove(&user.id).unwrap_or_default();
                ChallengeMember {
                    total_progress: total_progress(&goals),
                    user_id: user.id,
                    display_name: user.display_name,
                    photo_url: user.photo_url,
                    goals,
                    rank: None,
                }
            })
            .collect();

        Ok(ChallengeRanking {
            group_id,
            year: month.year,
            month: month.month,
            members: rank_members(members),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MockDomainEventSink;
    use crate::test_utils::{at, date, sample_goal, sample_user, InMemoryStore};
    use crate::utils::time_utils::DEFAULT_TZ;

    fn service(store: &Arc<InMemoryStore>, sink: &MockDomainEventSink) -> ChallengeService {
        ChallengeService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            Arc::new(sink.clone()),
            DEFAULT_TZ,
        )
    }

    fn may() -> YearMonth {
        YearMonth::new(2024, 5).unwrap()
    }

    #[tokio::test]
    async fn test_join_requires_group_and_is_idempotent() {
        let store = Arc::new(InMemoryStore::default());
        store.put_user(sample_user("solo", None));
        store.put_user(sample_user("u1", Some("grp")));
        let sink = MockDomainEventSink::new();
        let svc = service(&store, &sink);

        let err = svc
            .join_challenge("solo", may(), at(2024, 5, 2, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ConstraintViolation(_)));

        let first = svc.join_challenge("u1", may(), at(2024, 5, 2, 0)).await.unwrap();
        let second = svc.join_challenge("u1", may(), at(2024, 5, 3, 0)).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(sink.len(), 1);
    }

    #[tokio::test]
    async fn test_ranking_orders_members_with_ties() {
        let store = Arc::new(InMemoryStore::default());
        for id in ["a", "b", "c", "d"] {
            store.put_user(sample_user(id, Some("grp")));
        }
        // a: 4/5 = 80, b: (2/2 + 3/5) / 2 = 80, c: 1/2 = 50, d: no goals
        store.put_goal(sample_goal("ga", "a", 4, 5, date(2024, 5, 13)));
        store.put_goal(sample_goal("gb1", "b", 2, 2, date(2024, 5, 13)));
        store.put_goal(sample_goal("gb2", "b", 3, 5, date(2024, 5, 13)));
        store.put_goal(sample_goal("gc", "c", 1, 2, date(2024, 5, 13)));
        let sink = MockDomainEventSink::new();
        let svc = service(&store, &sink);
        for id in ["a", "b", "c", "d"] {
            svc.join_challenge(id, may(), at(2024, 5, 2, 0)).await.unwrap();
        }

        let ranking = svc.get_ranking("a", may(), at(2024, 5, 16, 3)).unwrap();
        let rows: Vec<(&str, f64, Option<u32>)> = ranking
            .members
            .iter()
            .map(|m| (m.user_id.as_str(), m.total_progress, m.rank))
            .collect();
        assert_eq!(rows[0].1, 80.0);
        assert_eq!(rows[1].1, 80.0);
        assert_eq!(rows[0].2, Some(1));
        assert_eq!(rows[1].2, Some(1));
        assert_eq!(rows[2], ("c", 50.0, Some(3)));
        assert_eq!(rows[3], ("d", 0.0, Some(4)));
    }

    #[tokio::test]
    async fn test_ranking_applies_weekly_reset_and_skips_non_members() {
        let store = Arc::new(InMemoryStore::default());
        store.put_user(sample_user("a", Some("grp")));
        store.put_user(sample_user("b", Some("grp")));
        store.put_user(sample_user("not-enrolled", Some("grp")));
        store.put_goal(sample_goal("ga", "a", 2, 2, date(2024, 5, 6)));
        store.put_goal(sample_goal("gb", "b", 1, 2, date(2024, 5, 13)));
        store.put_goal(sample_goal("gx", "not-enrolled", 2, 2, date(2024, 5, 13)));
        let sink = MockDomainEventSink::new();
        let svc = service(&store, &sink);
        svc.join_challenge("a", may(), at(2024, 5, 2, 0)).await.unwrap();
        svc.join_challenge("b", may(), at(2024, 5, 2, 0)).await.unwrap();

        let ranking = svc.get_ranking("b", may(), at(2024, 5, 15, 3)).unwrap();
        assert_eq!(ranking.members.len(), 2);
        assert_eq!(ranking.members[0].user_id, "b");
        assert_eq!(ranking.members[1].total_progress, 0.0);
        assert_eq!(ranking.members[1].rank, Some(2));
    }

    #[tokio::test]
    async fn test_leave_challenge() {
        let store = Arc::new(InMemoryStore::default());
        store.put_user(sample_user("a", Some("grp")));
        let sink = MockDomainEventSink::new();
        let svc = service(&store, &sink);
        svc.join_challenge("a", may(), at(2024, 5, 2, 0)).await.unwrap();

        assert_eq!(svc.leave_challenge("a", may()).await.unwrap(), 1);
        let ranking = svc.get_ranking("a", may(), at(2024, 5, 3, 0)).unwrap();
        assert!(ranking.members.is_empty());
    }
}
