use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use log::{debug, warn};
use uuid::Uuid;

use crate::certifications::certifications_model::{
    Certification, CheckInOutcome, FeedItem, FeedQuery, NewCertification,
};
use crate::certifications::certifications_traits::{
    CertificationRepositoryTrait, CertificationServiceTrait,
};
use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink};
use crate::goals::{Goal, GoalRepositoryTrait};
use crate::photos::{PhotoStoreTrait, PhotoUpload};
use crate::users::{User, UserRepositoryTrait};
use crate::utils::time_utils::local_date;

pub struct CertificationService {
    goal_repo: Arc<dyn GoalRepositoryTrait>,
    certification_repo: Arc<dyn CertificationRepositoryTrait>,
    user_repo: Arc<dyn UserRepositoryTrait>,
    photo_store: Arc<dyn PhotoStoreTrait>,
    event_sink: Arc<dyn DomainEventSink>,
    tz: Tz,
}

impl CertificationService {
    pub fn new(
        goal_repo: Arc<dyn GoalRepositoryTrait>,
        certification_repo: Arc<dyn CertificationRepositoryTrait>,
        user_repo: Arc<dyn UserRepositoryTrait>,
        photo_store: Arc<dyn PhotoStoreTrait>,
        event_sink: Arc<dyn DomainEventSink>,
        tz: Tz,
    ) -> Self {
        CertificationService {
            goal_repo,
            certification_repo,
            user_repo,
            photo_store,
            event_sink,
            tz,
        }
    }

    fn load_user(&self, user_id: &str) -> Result<User> {
        self.user_repo
            .find_user(user_id)?
            .ok_or_else(|| Error::NotFound(format!("User {}", user_id)))
    }

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

    /// Authors whose certifications `user` may see: the whole group, or only
    /// the user when not in a group.
    fn visible_authors(&self, user: &User) -> Result<Vec<String>> {
        match &user.group_id {
            Some(group_id) => {
                let mut ids: Vec<String> = self
                    .user_repo
                    .load_group_members(group_id)?
                    .into_iter()
                    .map(|member| member.id)
                    .collect();
                if !ids.contains(&user.id) {
                    ids.push(user.id.clone());
                }
                Ok(ids)
            }
            None => Ok(vec![user.id.clone()]),
        }
    }
}

#[async_trait]
impl CertificationServiceTrait for CertificationService {
    async fn certify(
        &self,
        user_id: &str,
        goal_id: &str,
        upload: PhotoUpload,
        now: DateTime<Utc>,
    ) -> Result<CheckInOutcome> {
        let goal = self.load_owned_goal(user_id, goal_id)?;
        let user = self.load_user(user_id)?;

        // Nothing is written until the photo has a durable reference.
        let stored = self.photo_store.put(user_id, upload).await?;

        let new_certification = NewCertification {
            id: Uuid::now_v7().to_string(),
            user_id: user_id.to_string(),
            goal_id: goal.id.clone(),
            photo_url: stored.url.clone(),
            created_at: now.naive_utc(),
        };

        let today = local_date(now, self.tz);
        let outcome = match self
            .certification_repo
            .insert_with_check_in(new_certification, today)
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(
                    "Check-in for goal {} failed after upload, removing {}: {}",
                    goal_id, stored.url, e
                );
                if let Err(cleanup) = self.photo_store.delete(&stored.url).await {
                    warn!("Orphaned photo {} could not be removed: {}", stored.url, cleanup);
                }
                return Err(e);
            }
        };

        debug!(
            "User {} certified goal {} ({}/{})",
            user_id, goal_id, outcome.goal.progress, outcome.goal.weekly_goal
        );

        self.event_sink.emit(DomainEvent::CertificationCreated {
            certification_id: outcome.certification.id.clone(),
            user_id: user_id.to_string(),
            goal_id: outcome.goal.id.clone(),
            goal_name: outcome.goal.name.clone(),
            group_id: user.group_id,
            photo_url: outcome.certification.photo_url.clone(),
            created_at: outcome.certification.created_at,
        });

        Ok(outcome)
    }

    fn get_feed(&self, user_id: &str, query: FeedQuery) -> Result<Vec<FeedItem>> {
        let user = self.load_user(user_id)?;
        let authors = self.visible_authors(&user)?;
        self.certification_repo
            .load_feed(
                &authors,
                query.before,
                query.before_id.as_deref(),
                query.effective_limit(),
            )
    }

    fn get_user_certifications(
        &self,
        requester_id: &str,
        user_id: &str,
        query: FeedQuery,
    ) -> Result<Vec<FeedItem>> {
        if requester_id != user_id {
            let requester = self.load_user(requester_id)?;
            let target = self.load_user(user_id)?;
            let same_group = requester.group_id.is_some() && requester.group_id == target.group_id;
            if !same_group {
                return Err(Error::Forbidden(format!(
                    "user {} is not in a group with {}",
                    requester_id, user_id
                )));
            }
        }
        self.certification_repo.load_feed(
            &[user_id.to_string()],
            query.before,
            query.before_id.as_deref(),
            query.effective_limit(),
        )
    }

    fn get_goal_certifications(&self, user_id: &str, goal_id: &str) -> Result<Vec<Certification>> {
        self.load_owned_goal(user_id, goal_id)?;
        self.certification_repo.load_goal_certifications(goal_id)
    }
}
