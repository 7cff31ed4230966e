use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;

use goalie_core::groups::{Group, GroupRepositoryTrait};
use goalie_core::{Error, Result};

use super::model::GroupDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{user_groups, users};

pub struct GroupRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl GroupRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        GroupRepository { pool, writer }
    }
}

#[async_trait]
impl GroupRepositoryTrait for GroupRepository {
    fn find_group(&self, group_id: &str) -> Result<Option<Group>> {
        let mut conn = get_connection(&self.pool)?;
        let group = user_groups::table
            .find(group_id)
            .select(GroupDB::as_select())
            .first::<GroupDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(group.map(Group::from))
    }

    async fn insert_group_with_owner(&self, group: Group) -> Result<Group> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Group> {
                let group_db = GroupDB::from(group);
                let created = diesel::insert_into(user_groups::table)
                    .values(&group_db)
                    .returning(GroupDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;

                let moved = diesel::update(users::table.find(&created.owner_id))
                    .set(users::group_id.eq(&created.id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if moved == 0 {
                    // Rolls back the group insert.
                    return Err(Error::NotFound(format!("User {}", created.owner_id)));
                }
                Ok(Group::from(created))
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_user, setup_db, timestamp};
    use crate::users::UserRepository;
    use goalie_core::users::UserRepositoryTrait;

    fn group(id: &str, owner_id: &str) -> Group {
        Group {
            id: id.to_string(),
            name: "Morning Club".to_string(),
            owner_id: owner_id.to_string(),
            created_at: timestamp(2024, 5, 1, 0),
        }
    }

    #[tokio::test]
    async fn test_insert_moves_owner_into_group() {
        let (pool, writer, _dir) = setup_db();
        seed_user(&pool, "u1", None);
        let repo = GroupRepository::new(pool.clone(), writer.clone());

        let created = repo.insert_group_with_owner(group("grp", "u1")).await.unwrap();
        assert_eq!(repo.find_group("grp").unwrap(), Some(created));

        let users = UserRepository::new(pool, writer);
        assert_eq!(
            users.find_user("u1").unwrap().unwrap().group_id.as_deref(),
            Some("grp")
        );
    }

    #[tokio::test]
    async fn test_unknown_owner_leaves_no_group_behind() {
        let (pool, writer, _dir) = setup_db();
        let repo = GroupRepository::new(pool, writer);

        let err = repo
            .insert_group_with_owner(group("grp", "ghost"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(repo.find_group("grp").unwrap(), None);
    }
}
