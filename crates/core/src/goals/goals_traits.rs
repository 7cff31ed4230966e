use crate::errors::Result;
use crate::goals::goals_model::{Goal, GoalUpdate, NewGoal};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Trait for goal repository operations
#[async_trait]
pub trait GoalRepositoryTrait: Send + Sync {
    fn find_goal(&self, goal_id: &str) -> Result<Option<Goal>>;
    fn load_goals_for_user(&self, user_id: &str) -> Result<Vec<Goal>>;
    fn load_goals_for_users(&self, user_ids: &[String]) -> Result<Vec<Goal>>;
    async fn insert_new_goal(&self, goal: Goal) -> Result<Goal>;
    /// Re-reads the goal, applies `update` as of `today` and writes it back
    /// in one transaction.
    async fn apply_goal_update(
        &self,
        goal_id: String,
        update: GoalUpdate,
        today: NaiveDate,
        updated_at: NaiveDateTime,
    ) -> Result<Goal>;
    async fn delete_goal(&self, goal_id: String) -> Result<usize>;
}

/// Trait for goal service operations
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    fn get_goals(&self, user_id: &str, now: DateTime<Utc>) -> Result<Vec<Goal>>;
    fn get_goal(&self, user_id: &str, goal_id: &str, now: DateTime<Utc>) -> Result<Goal>;
    async fn create_goal(
        &self,
        user_id: &str,
        new_goal: NewGoal,
        now: DateTime<Utc>,
    ) -> Result<Goal>;
    async fn update_goal(
        &self,
        user_id: &str,
        goal_id: &str,
        update: GoalUpdate,
        now: DateTime<Utc>,
    ) -> Result<Goal>;
    async fn delete_goal(&self, user_id: &str, goal_id: &str) -> Result<usize>;
}
