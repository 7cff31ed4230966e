use crate::errors::Result;
use crate::groups::groups_model::{Group, NewGroup};
use crate::users::User;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Trait for group repository operations
#[async_trait]
pub trait GroupRepositoryTrait: Send + Sync {
    fn find_group(&self, group_id: &str) -> Result<Option<Group>>;
    /// Inserts the group and moves its owner into it atomically.
    async fn insert_group_with_owner(&self, group: Group) -> Result<Group>;
}

/// Trait for group service operations
#[async_trait]
pub trait GroupServiceTrait: Send + Sync {
    async fn create_group(
        &self,
        owner_id: &str,
        new_group: NewGroup,
        now: DateTime<Utc>,
    ) -> Result<Group>;
    fn get_group(&self, group_id: &str) -> Result<Group>;
    async fn join_group(&self, user_id: &str, group_id: &str, now: DateTime<Utc>) -> Result<User>;
    async fn leave_group(&self, user_id: &str, now: DateTime<Utc>) -> Result<User>;
    /// Members of `group_id`; the requester must belong to the group.
    fn get_members(&self, requester_id: &str, group_id: &str) -> Result<Vec<User>>;
}
