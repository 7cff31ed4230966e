use chrono::NaiveDateTime;
use diesel::prelude::*;

use goalie_core::groups::Group;

/// Database model for groups
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::user_groups)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GroupDB {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub created_at: NaiveDateTime,
}

impl From<GroupDB> for Group {
    fn from(db: GroupDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            owner_id: db.owner_id,
            created_at: db.created_at,
        }
    }
}

impl From<Group> for GroupDB {
    fn from(domain: Group) -> Self {
        Self {
            id: domain.id,
            name: domain.name,
            owner_id: domain.owner_id,
            created_at: domain.created_at,
        }
    }
}
