//! Database models for users.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use goalie_core::users::User;

/// Database model for users
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
#[serde(rename_all = "camelCase")]
pub struct UserDB {
    pub id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub photo_url: Option<String>,
    pub group_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<UserDB> for User {
    fn from(db: UserDB) -> Self {
        Self {
            id: db.id,
            display_name: db.display_name,
            email: db.email,
            photo_url: db.photo_url,
            group_id: db.group_id,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<User> for UserDB {
    fn from(domain: User) -> Self {
        Self {
            id: domain.id,
            display_name: domain.display_name,
            email: domain.email,
            photo_url: domain.photo_url,
            group_id: domain.group_id,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}
