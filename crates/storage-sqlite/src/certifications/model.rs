use chrono::NaiveDateTime;
use diesel::prelude::*;

use goalie_core::certifications::Certification;

use crate::goals::GoalDB;

/// Database model for certifications
#[derive(
    Queryable, Identifiable, Insertable, Associations, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(belongs_to(GoalDB, foreign_key = goal_id))]
#[diesel(table_name = crate::schema::certifications)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CertificationDB {
    pub id: String,
    pub user_id: String,
    pub goal_id: String,
    pub photo_url: String,
    pub progress_snapshot: f64,
    pub created_at: NaiveDateTime,
}

impl From<CertificationDB> for Certification {
    fn from(db: CertificationDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            goal_id: db.goal_id,
            photo_url: db.photo_url,
            progress_snapshot: db.progress_snapshot,
            created_at: db.created_at,
        }
    }
}

impl From<Certification> for CertificationDB {
    fn from(domain: Certification) -> Self {
        Self {
            id: domain.id,
            user_id: domain.user_id,
            goal_id: domain.goal_id,
            photo_url: domain.photo_url,
            progress_snapshot: domain.progress_snapshot,
            created_at: domain.created_at,
        }
    }
}
