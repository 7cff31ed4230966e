use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::info;
use uuid::Uuid;

use crate::errors::{Error, Result};
use crate::groups::groups_model::{Group, NewGroup};
use crate::groups::groups_traits::{GroupRepositoryTrait, GroupServiceTrait};
use crate::users::{User, UserChange, UserRepositoryTrait};

pub struct GroupService {
    group_repo: Arc<dyn GroupRepositoryTrait>,
    user_repo: Arc<dyn UserRepositoryTrait>,
}

impl GroupService {
    pub fn new(
        group_repo: Arc<dyn GroupRepositoryTrait>,
        user_repo: Arc<dyn UserRepositoryTrait>,
    ) -> Self {
        GroupService {
            group_repo,
            user_repo,
        }
    }

    fn load_user(&self, user_id: &str) -> Result<User> {
        self.user_repo
            .find_user(user_id)?
            .ok_or_else(|| Error::NotFound(format!("User {}", user_id)))
    }
}

#[async_trait]
impl GroupServiceTrait for GroupService {
    async fn create_group(
        &self,
        owner_id: &str,
        new_group: NewGroup,
        now: DateTime<Utc>,
    ) -> Result<Group> {
        new_group.validate()?;
        self.load_user(owner_id)?;
        let group = Group {
            id: Uuid::new_v4().to_string(),
            name: new_group.name.trim().to_string(),
            owner_id: owner_id.to_string(),
            created_at: now.naive_utc(),
        };
        let created = self.group_repo.insert_group_with_owner(group).await?;
        info!("User {} created group {}", owner_id, created.id);
        Ok(created)
    }

    fn get_group(&self, group_id: &str) -> Result<Group> {
        self.group_repo
            .find_group(group_id)?
            .ok_or_else(|| Error::NotFound(format!("Group {}", group_id)))
    }

    async fn join_group(&self, user_id: &str, group_id: &str, now: DateTime<Utc>) -> Result<User> {
        self.get_group(group_id)?;
        let user = self.load_user(user_id)?;
        if user.group_id.as_deref() == Some(group_id) {
            return Ok(user);
        }
        self.user_repo
            .apply_user_change(
                user.id,
                UserChange::Group(Some(group_id.to_string())),
                now.naive_utc(),
            )
            .await
    }

    async fn leave_group(&self, user_id: &str, now: DateTime<Utc>) -> Result<User> {
        let user = self.load_user(user_id)?;
        if user.group_id.is_none() {
            return Ok(user);
        }
        self.user_repo
            .apply_user_change(user.id, UserChange::Group(None), now.naive_utc())
            .await
    }

    fn get_members(&self, requester_id: &str, group_id: &str) -> Result<Vec<User>> {
        let requester = self.load_user(requester_id)?;
        if requester.group_id.as_deref() != Some(group_id) {
            return Err(Error::Forbidden(format!(
                "user {} is not a member of group {}",
                requester_id, group_id
            )));
        }
        self.user_repo.load_group_members(group_id)
    }
}
