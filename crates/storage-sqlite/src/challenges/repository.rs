use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;

use goalie_core::challenges::{ChallengeEnrollment, ChallengeRepositoryTrait};
use goalie_core::utils::time_utils::YearMonth;
use goalie_core::Result;

use super::model::ChallengeEnrollmentDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::challenge_enrollments as enrollments;

pub struct ChallengeRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ChallengeRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        ChallengeRepository { pool, writer }
    }
}

#[async_trait]
impl ChallengeRepositoryTrait for ChallengeRepository {
    fn load_enrollments(
        &self,
        group_id: &str,
        month: YearMonth,
    ) -> Result<Vec<ChallengeEnrollment>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = enrollments::table
            .filter(enrollments::group_id.eq(group_id))
            .filter(enrollments::year.eq(month.year))
            .filter(enrollments::month.eq(month.month as i32))
            .order((enrollments::joined_at.asc(), enrollments::id.asc()))
            .select(ChallengeEnrollmentDB::as_select())
            .load::<ChallengeEnrollmentDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(ChallengeEnrollment::from).collect())
    }

    fn find_enrollment(
        &self,
        user_id: &str,
        month: YearMonth,
    ) -> Result<Option<ChallengeEnrollment>> {
        let mut conn = get_connection(&self.pool)?;
        let row = enrollments::table
            .filter(enrollments::user_id.eq(user_id))
            .filter(enrollments::year.eq(month.year))
            .filter(enrollments::month.eq(month.month as i32))
            .select(ChallengeEnrollmentDB::as_select())
            .first::<ChallengeEnrollmentDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(ChallengeEnrollment::from))
    }

    async fn insert_enrollment(
        &self,
        enrollment: ChallengeEnrollment,
    ) -> Result<ChallengeEnrollment> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<ChallengeEnrollment> {
                let row = diesel::insert_into(enrollments::table)
                    .values(ChallengeEnrollmentDB::from(enrollment))
                    .returning(ChallengeEnrollmentDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(row.into())
            })
            .await
    }

    async fn delete_enrollment(&self, user_id: String, month: YearMonth) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(
                    enrollments::table
                        .filter(enrollments::user_id.eq(user_id))
                        .filter(enrollments::year.eq(month.year))
                        .filter(enrollments::month.eq(month.month as i32)),
                )
                .execute(conn)
                .map_err(StorageError::from)?)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_group, seed_user, setup_db, timestamp};
    use goalie_core::errors::DatabaseError;
    use goalie_core::Error;

    fn enrollment(id: &str, user_id: &str, month: u32) -> ChallengeEnrollment {
        ChallengeEnrollment {
            id: id.to_string(),
            user_id: user_id.to_string(),
            group_id: "grp".to_string(),
            year: 2024,
            month,
            joined_at: timestamp(2024, month, 1, 0),
        }
    }

    fn may() -> YearMonth {
        YearMonth::new(2024, 5).unwrap()
    }

    #[tokio::test]
    async fn test_enrollments_are_scoped_by_month() {
        let (pool, writer, _dir) = setup_db();
        seed_group(&pool, "grp", "u1");
        seed_user(&pool, "u1", Some("grp"));
        seed_user(&pool, "u2", Some("grp"));
        let repo = ChallengeRepository::new(pool, writer);

        repo.insert_enrollment(enrollment("e1", "u1", 5)).await.unwrap();
        repo.insert_enrollment(enrollment("e2", "u2", 5)).await.unwrap();
        repo.insert_enrollment(enrollment("e3", "u1", 6)).await.unwrap();

        assert_eq!(repo.load_enrollments("grp", may()).unwrap().len(), 2);
        assert_eq!(
            repo.find_enrollment("u1", may()).unwrap().map(|e| e.id),
            Some("e1".to_string())
        );

        assert_eq!(repo.delete_enrollment("u1".to_string(), may()).await.unwrap(), 1);
        assert_eq!(repo.find_enrollment("u1", may()).unwrap(), None);
        assert!(repo
            .find_enrollment("u1", YearMonth::new(2024, 6).unwrap())
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_one_enrollment_per_user_and_month() {
        let (pool, writer, _dir) = setup_db();
        seed_group(&pool, "grp", "u1");
        seed_user(&pool, "u1", Some("grp"));
        let repo = ChallengeRepository::new(pool, writer);

        repo.insert_enrollment(enrollment("e1", "u1", 5)).await.unwrap();
        let err = repo
            .insert_enrollment(enrollment("e2", "u1", 5))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Database(DatabaseError::UniqueViolation(_))
        ));
    }
}
