use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;

use chrono::NaiveDateTime;
use goalie_core::users::{AccountDeletion, User, UserChange, UserRepositoryTrait};
use goalie_core::{Error, Result};

use super::model::UserDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{certifications, challenge_enrollments, goals, users};
use crate::utils::chunk_for_sqlite;

pub struct UserRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl UserRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        UserRepository { pool, writer }
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    fn find_user(&self, user_id: &str) -> Result<Option<User>> {
        let mut conn = get_connection(&self.pool)?;
        let user = users::table
            .find(user_id)
            .select(UserDB::as_select())
            .first::<UserDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(user.map(User::from))
    }

    fn load_users(&self, user_ids: &[String]) -> Result<Vec<User>> {
        let mut conn = get_connection(&self.pool)?;
        let mut loaded = Vec::with_capacity(user_ids.len());
        for chunk in chunk_for_sqlite(user_ids) {
            let rows = users::table
                .filter(users::id.eq_any(chunk))
                .order(users::created_at.asc())
                .select(UserDB::as_select())
                .load::<UserDB>(&mut conn)
                .map_err(StorageError::from)?;
            loaded.extend(rows.into_iter().map(User::from));
        }
        Ok(loaded)
    }

    fn load_group_members(&self, group_id: &str) -> Result<Vec<User>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = users::table
            .filter(users::group_id.eq(group_id))
            .order((users::created_at.asc(), users::id.asc()))
            .select(UserDB::as_select())
            .load::<UserDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn insert_user(&self, user: User) -> Result<User> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<User> {
                let row = diesel::insert_into(users::table)
                    .values(UserDB::from(user))
                    .returning(UserDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(User::from(row))
            })
            .await
    }

    async fn apply_user_change(
        &self,
        user_id: String,
        change: UserChange,
        updated_at: NaiveDateTime,
    ) -> Result<User> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<User> {
                let current = users::table
                    .find(&user_id)
                    .select(UserDB::as_select())
                    .first::<UserDB>(conn)
                    .optional()
                    .map_err(StorageError::from)?
                    .ok_or_else(|| Error::NotFound(format!("User {}", user_id)))?;

                let user = change.apply_to(User::from(current), updated_at);
                let row = diesel::update(users::table.find(&user_id))
                    .set(&UserDB::from(user))
                    .returning(UserDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(User::from(row))
            })
            .await
    }

    async fn delete_user_cascade(&self, user_id: String) -> Result<AccountDeletion> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<AccountDeletion> {
                let photo_urls = certifications::table
                    .filter(certifications::user_id.eq(&user_id))
                    .select(certifications::photo_url)
                    .load::<String>(conn)
                    .map_err(StorageError::from)?;

                let certifications_deleted = diesel::delete(
                    certifications::table.filter(certifications::user_id.eq(&user_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;
                let goals_deleted = diesel::delete(goals::table.filter(goals::user_id.eq(&user_id)))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                let enrollments_deleted = diesel::delete(
                    challenge_enrollments::table
                        .filter(challenge_enrollments::user_id.eq(&user_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;
                diesel::delete(users::table.find(&user_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                Ok(AccountDeletion {
                    user_id,
                    goals_deleted,
                    certifications_deleted,
                    enrollments_deleted,
                    photo_urls,
                })
            })
            .await
    }
}
