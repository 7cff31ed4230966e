//! Database models for goals.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use goalie_core::goals::{DayCalendar, Goal, WeeklySample};

use crate::errors::StorageError;
use crate::users::UserDB;

/// Database model for goals.
///
/// `completed_days` and `weekly_history` are JSON text columns.
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    Associations,
    AsChangeset,
    Selectable,
    PartialEq,
    Debug,
    Clone,
)]
#[diesel(belongs_to(UserDB, foreign_key = user_id))]
#[diesel(table_name = crate::schema::goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GoalDB {
    pub id: String,
    pub user_id: String,
    pub icon: String,
    pub color: String,
    pub name: String,
    pub weekly_goal: i32,
    pub progress: i32,
    pub completed_days: String,
    pub last_reset_date: NaiveDate,
    pub weekly_history: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<GoalDB> for Goal {
    type Error = StorageError;

    fn try_from(db: GoalDB) -> Result<Self, Self::Error> {
        let completed_days: DayCalendar = serde_json::from_str(&db.completed_days)?;
        let weekly_history: Vec<WeeklySample> = serde_json::from_str(&db.weekly_history)?;
        Ok(Self {
            id: db.id,
            user_id: db.user_id,
            icon: db.icon,
            color: db.color,
            name: db.name,
            weekly_goal: db.weekly_goal,
            progress: db.progress,
            completed_days,
            last_reset_date: db.last_reset_date,
            weekly_history,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl TryFrom<Goal> for GoalDB {
    type Error = StorageError;

    fn try_from(domain: Goal) -> Result<Self, Self::Error> {
        Ok(Self {
            completed_days: serde_json::to_string(&domain.completed_days)?,
            weekly_history: serde_json::to_string(&domain.weekly_history)?,
            id: domain.id,
            user_id: domain.user_id,
            icon: domain.icon,
            color: domain.color,
            name: domain.name,
            weekly_goal: domain.weekly_goal,
            progress: domain.progress,
            last_reset_date: domain.last_reset_date,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        })
    }
}

/// Converts a batch of rows, failing on the first undecodable one.
pub fn into_goals(rows: Vec<GoalDB>) -> Result<Vec<Goal>, StorageError> {
    rows.into_iter().map(Goal::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_columns_round_trip_with_history() {
        let goal = Goal {
            id: "g1".to_string(),
            user_id: "u1".to_string(),
            icon: "🏃".to_string(),
            color: "#000000".to_string(),
            name: "Run".to_string(),
            weekly_goal: 3,
            progress: 1,
            completed_days: [true, false, false, false, false, false, false],
            last_reset_date: NaiveDate::from_ymd_opt(2024, 5, 13).unwrap(),
            weekly_history: vec![WeeklySample {
                week_start: NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
                progress: 2,
                weekly_goal: 3,
            }],
            created_at: NaiveDate::from_ymd_opt(2024, 5, 6)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            updated_at: NaiveDate::from_ymd_opt(2024, 5, 13)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        };

        let row = GoalDB::try_from(goal.clone()).unwrap();
        assert_eq!(row.completed_days, "[true,false,false,false,false,false,false]");
        assert!(row.weekly_history.contains("\"weekStart\":\"2024-05-06\""));
        assert_eq!(Goal::try_from(row).unwrap(), goal);
    }

    #[test]
    fn test_short_calendar_is_rejected() {
        let row = GoalDB {
            id: "g1".to_string(),
            user_id: "u1".to_string(),
            icon: "i".to_string(),
            color: "c".to_string(),
            name: "Run".to_string(),
            weekly_goal: 3,
            progress: 0,
            completed_days: "[true,false]".to_string(),
            last_reset_date: NaiveDate::from_ymd_opt(2024, 5, 13).unwrap(),
            weekly_history: "[]".to_string(),
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        };
        assert!(Goal::try_from(row).is_err());
    }
}
