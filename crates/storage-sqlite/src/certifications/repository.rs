use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use diesel::SqliteConnection;

use goalie_core::certifications::{
    record_check_in, Certification, CertificationRepositoryTrait, CheckInOutcome, FeedItem,
    NewCertification,
};
use goalie_core::goals::Goal;
use goalie_core::{Error, Result};

use super::model::CertificationDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::goals::GoalDB;
use crate::schema::{certifications, goals, users};

type FeedRow = (CertificationDB, String, Option<String>, String, String, String);

pub struct CertificationRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl CertificationRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        CertificationRepository { pool, writer }
    }
}

#[async_trait]
impl CertificationRepositoryTrait for CertificationRepository {
    fn load_feed(
        &self,
        user_ids: &[String],
        before: Option<NaiveDateTime>,
        before_id: Option<&str>,
        limit: i64,
    ) -> Result<Vec<FeedItem>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = certifications::table
            .inner_join(users::table)
            .inner_join(goals::table)
            .select((
                CertificationDB::as_select(),
                users::display_name,
                users::photo_url,
                goals::name,
                goals::icon,
                goals::color,
            ))
            .filter(certifications::user_id.eq_any(user_ids))
            .into_boxed();
        match (before, before_id) {
            (Some(before), Some(before_id)) => {
                query = query.filter(
                    certifications::created_at.lt(before).or(certifications::created_at
                        .eq(before)
                        .and(certifications::id.lt(before_id.to_string()))),
                );
            }
            (Some(before), None) => {
                query = query.filter(certifications::created_at.lt(before));
            }
            (None, _) => {}
        }

        let rows = query
            .order((certifications::created_at.desc(), certifications::id.desc()))
            .limit(limit)
            .load::<FeedRow>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(rows
            .into_iter()
            .map(
                |(certification, author_name, author_photo_url, goal_name, goal_icon, goal_color)| {
                    FeedItem {
                        certification: certification.into(),
                        author_name,
                        author_photo_url,
                        goal_name,
                        goal_icon,
                        goal_color,
                    }
                },
            )
            .collect())
    }

    fn load_goal_certifications(&self, goal_id: &str) -> Result<Vec<Certification>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = certifications::table
            .filter(certifications::goal_id.eq(goal_id))
            .order((certifications::created_at.desc(), certifications::id.desc()))
            .select(CertificationDB::as_select())
            .load::<CertificationDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Certification::from).collect())
    }

    async fn insert_with_check_in(
        &self,
        new_certification: NewCertification,
        today: NaiveDate,
    ) -> Result<CheckInOutcome> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<CheckInOutcome> {
                // Read, modify and write happen inside the writer's
                // immediate transaction, so concurrent check-ins serialise.
                let current = goals::table
                    .find(&new_certification.goal_id)
                    .select(GoalDB::as_select())
                    .first::<GoalDB>(conn)
                    .optional()
                    .map_err(StorageError::from)?
                    .ok_or_else(|| {
                        Error::NotFound(format!("Goal {}", new_certification.goal_id))
                    })?;

                let mut goal = record_check_in(Goal::try_from(current)?, today);
                goal.updated_at = new_certification.created_at;
                let progress_snapshot = goal.completion_percent();

                let goal_db = GoalDB::try_from(goal)?;
                let saved = diesel::update(goals::table.find(goal_db.id.clone()))
                    .set(&goal_db)
                    .returning(GoalDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;

                let certification = diesel::insert_into(certifications::table)
                    .values(CertificationDB {
                        id: new_certification.id,
                        user_id: new_certification.user_id,
                        goal_id: new_certification.goal_id,
                        photo_url: new_certification.photo_url,
                        progress_snapshot,
                        created_at: new_certification.created_at,
                    })
                    .returning(CertificationDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;

                Ok(CheckInOutcome {
                    goal: Goal::try_from(saved)?,
                    certification: certification.into(),
                })
            })
            .await
    }
}
