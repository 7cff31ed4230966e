use chrono::NaiveDateTime;
use diesel::prelude::*;

use goalie_core::challenges::ChallengeEnrollment;

/// Database model for challenge enrollments
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::challenge_enrollments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ChallengeEnrollmentDB {
    pub id: String,
    pub user_id: String,
    pub group_id: String,
    pub year: i32,
    pub month: i32,
    pub joined_at: NaiveDateTime,
}

impl From<ChallengeEnrollmentDB> for ChallengeEnrollment {
    fn from(db: ChallengeEnrollmentDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            group_id: db.group_id,
            year: db.year,
            // The column is CHECK-constrained to 1..=12.
            month: db.month.unsigned_abs(),
            joined_at: db.joined_at,
        }
    }
}

impl From<ChallengeEnrollment> for ChallengeEnrollmentDB {
    fn from(domain: ChallengeEnrollment) -> Self {
        Self {
            id: domain.id,
            user_id: domain.user_id,
            group_id: domain.group_id,
            year: domain.year,
            month: domain.month as i32,
            joined_at: domain.joined_at,
        }
    }
}
