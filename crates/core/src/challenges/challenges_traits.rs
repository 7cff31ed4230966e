use crate::challenges::challenges_model::{ChallengeEnrollment, ChallengeRanking};
use crate::errors::Result;
use crate::utils::time_utils::YearMonth;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Trait for challenge enrollment repository operations
#[async_trait]
pub trait ChallengeRepositoryTrait: Send + Sync {
    fn load_enrollments(
        &self,
        group_id: &str,
        month: YearMonth,
    ) -> Result<Vec<ChallengeEnrollment>>;
    fn find_enrollment(
        &self,
        user_id: &str,
        month: YearMonth,
    ) -> Result<Option<ChallengeEnrollment>>;
    async fn insert_enrollment(
        &self,
        enrollment: ChallengeEnrollment,
    ) -> Result<ChallengeEnrollment>;
    async fn delete_enrollment(&self, user_id: String, month: YearMonth) -> Result<usize>;
}

/// Trait for challenge service operations
#[async_trait]
pub trait ChallengeServiceTrait: Send + Sync {
    async fn join_challenge(
        &self,
        user_id: &str,
        month: YearMonth,
        now: DateTime<Utc>,
    ) -> Result<ChallengeEnrollment>;
    async fn leave_challenge(&self, user_id: &str, month: YearMonth) -> Result<usize>;
    fn get_ranking(
        &self,
        user_id: &str,
        month: YearMonth,
        now: DateTime<Utc>,
    ) -> Result<ChallengeRanking>;
}
