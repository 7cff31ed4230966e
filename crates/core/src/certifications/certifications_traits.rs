use crate::certifications::certifications_model::{
    Certification, CheckInOutcome, FeedItem, FeedQuery, NewCertification,
};
use crate::errors::Result;
use crate::photos::PhotoUpload;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Trait for certification repository operations
#[async_trait]
pub trait CertificationRepositoryTrait: Send + Sync {
    /// Certifications authored by any of `user_ids`, newest first, ordered
    /// by `(created_at, id)`. The `(before, before_id)` pair is the
    /// exclusive cursor; `before_id` is ignored without `before`.
    fn load_feed(
        &self,
        user_ids: &[String],
        before: Option<NaiveDateTime>,
        before_id: Option<&str>,
        limit: i64,
    ) -> Result<Vec<FeedItem>>;
    fn load_goal_certifications(&self, goal_id: &str) -> Result<Vec<Certification>>;
    /// Applies the check-in to the goal and inserts the certification in one
    /// transaction. `today` is the local date of the check-in.
    async fn insert_with_check_in(
        &self,
        new_certification: NewCertification,
        today: NaiveDate,
    ) -> Result<CheckInOutcome>;
}

/// Trait for certification service operations
#[async_trait]
pub trait CertificationServiceTrait: Send + Sync {
    async fn certify(
        &self,
        user_id: &str,
        goal_id: &str,
        upload: PhotoUpload,
        now: DateTime<Utc>,
    ) -> Result<CheckInOutcome>;
    fn get_feed(&self, user_id: &str, query: FeedQuery) -> Result<Vec<FeedItem>>;
    fn get_user_certifications(
        &self,
        requester_id: &str,
        user_id: &str,
        query: FeedQuery,
    ) -> Result<Vec<FeedItem>>;
    fn get_goal_certifications(&self, user_id: &str, goal_id: &str) -> Result<Vec<Certification>>;
}
