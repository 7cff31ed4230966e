use crate::errors::Result;
use crate::users::users_model::{AccountDeletion, ProfileUpdate, SocialProfile, User, UserChange};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};

/// Trait for user repository operations
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    fn find_user(&self, user_id: &str) -> Result<Option<User>>;
    fn load_users(&self, user_ids: &[String]) -> Result<Vec<User>>;
    fn load_group_members(&self, group_id: &str) -> Result<Vec<User>>;
    async fn insert_user(&self, user: User) -> Result<User>;
    /// Re-reads the user, applies `change` and writes it back in one
    /// transaction.
    async fn apply_user_change(
        &self,
        user_id: String,
        change: UserChange,
        updated_at: NaiveDateTime,
    ) -> Result<User>;
    /// Deletes the user's certifications, goals, challenge enrollments and
    /// the user record in a single transaction.
    async fn delete_user_cascade(&self, user_id: String) -> Result<AccountDeletion>;
}

/// Trait for user service operations
#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn sign_in(&self, profile: SocialProfile, now: DateTime<Utc>) -> Result<User>;
    fn get_user(&self, user_id: &str) -> Result<User>;
    async fn update_profile(
        &self,
        user_id: &str,
        update: ProfileUpdate,
        now: DateTime<Utc>,
    ) -> Result<User>;
    async fn delete_account(&self, user_id: &str) -> Result<AccountDeletion>;
}
