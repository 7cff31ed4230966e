use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;

use chrono::{NaiveDate, NaiveDateTime};
use goalie_core::goals::{Goal, GoalRepositoryTrait, GoalUpdate};
use goalie_core::{Error, Result};

use super::model::{into_goals, GoalDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::goals;
use crate::utils::chunk_for_sqlite;

pub struct GoalRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl GoalRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        GoalRepository { pool, writer }
    }
}

#[async_trait]
impl GoalRepositoryTrait for GoalRepository {
    fn find_goal(&self, goal_id: &str) -> Result<Option<Goal>> {
        let mut conn = get_connection(&self.pool)?;
        let row = goals::table
            .find(goal_id)
            .select(GoalDB::as_select())
            .first::<GoalDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        match row {
            Some(row) => Ok(Some(Goal::try_from(row)?)),
            None => Ok(None),
        }
    }

    fn load_goals_for_user(&self, user_id: &str) -> Result<Vec<Goal>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = goals::table
            .filter(goals::user_id.eq(user_id))
            .order((goals::created_at.asc(), goals::id.asc()))
            .select(GoalDB::as_select())
            .load::<GoalDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(into_goals(rows)?)
    }

    fn load_goals_for_users(&self, user_ids: &[String]) -> Result<Vec<Goal>> {
        let mut conn = get_connection(&self.pool)?;
        let mut loaded = Vec::new();
        for chunk in chunk_for_sqlite(user_ids) {
            let rows = goals::table
                .filter(goals::user_id.eq_any(chunk))
                .order((goals::created_at.asc(), goals::id.asc()))
                .select(GoalDB::as_select())
                .load::<GoalDB>(&mut conn)
                .map_err(StorageError::from)?;
            loaded.extend(into_goals(rows)?);
        }
        Ok(loaded)
    }

    async fn insert_new_goal(&self, goal: Goal) -> Result<Goal> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Goal> {
                let goal_db = GoalDB::try_from(goal)?;
                let row = diesel::insert_into(goals::table)
                    .values(&goal_db)
                    .returning(GoalDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Goal::try_from(row)?)
            })
            .await
    }

    async fn apply_goal_update(
        &self,
        goal_id: String,
        update: GoalUpdate,
        today: NaiveDate,
        updated_at: NaiveDateTime,
    ) -> Result<Goal> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Goal> {
                // Re-read inside the transaction so a check-in committed
                // since the caller's read is kept.
                let current = goals::table
                    .find(&goal_id)
                    .select(GoalDB::as_select())
                    .first::<GoalDB>(conn)
                    .optional()
                    .map_err(StorageError::from)?
                    .ok_or_else(|| Error::NotFound(format!("Goal {}", goal_id)))?;

                let goal = update.apply_to(Goal::try_from(current)?, today, updated_at);
                let goal_db = GoalDB::try_from(goal)?;
                let row = diesel::update(goals::table.find(&goal_id))
                    .set(&goal_db)
                    .returning(GoalDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Goal::try_from(row)?)
            })
            .await
    }

    async fn delete_goal(&self, goal_id: String) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                // Certifications go with the goal through ON DELETE CASCADE.
                Ok(diesel::delete(goals::table.find(goal_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}
