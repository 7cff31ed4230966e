//! Temporary migrated databases and seed rows for repository tests.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use tempfile::TempDir;

use crate::db::{create_pool, get_connection, init, run_migrations, spawn_writer, DbPool, WriteHandle};
use crate::schema::users;
use crate::users::UserDB;

/// Migrated database in a temp dir; keep the `TempDir` alive for the test.
pub fn setup_db() -> (Arc<DbPool>, WriteHandle, TempDir) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("test.db");
    let db_path = init(&db_path.to_string_lossy()).expect("Failed to init database");
    let pool = create_pool(&db_path).expect("Failed to create pool");
    run_migrations(&pool).expect("Failed to run migrations");
    let writer = spawn_writer((*pool).clone());
    (pool, writer, temp_dir)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn timestamp(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    date(year, month, day).and_hms_opt(hour, 0, 0).unwrap()
}

/// Inserts a user row directly, bypassing the writer.
pub fn seed_user(pool: &DbPool, id: &str, group_id: Option<&str>) {
    let mut conn = get_connection(pool).expect("Failed to get connection");
    diesel::insert_into(users::table)
        .values(UserDB {
            id: id.to_string(),
            display_name: id.to_uppercase(),
            email: None,
            photo_url: None,
            group_id: group_id.map(str::to_string),
            created_at: timestamp(2024, 5, 1, 0),
            updated_at: timestamp(2024, 5, 1, 0),
        })
        .execute(&mut conn)
        .expect("Failed to seed user");
}

/// Inserts a group row directly, bypassing the writer.
pub fn seed_group(pool: &DbPool, id: &str, owner_id: &str) {
    let mut conn = get_connection(pool).expect("Failed to get connection");
    diesel::sql_query(format!(
        "INSERT INTO user_groups (id, name, owner_id, created_at) \
         VALUES ('{}', 'Club {}', '{}', '2024-05-01 00:00:00')",
        id, id, owner_id
    ))
    .execute(&mut conn)
    .expect("Failed to seed group");
}
