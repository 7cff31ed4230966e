//! Goals domain models.

use chrono::{NaiveDate, NaiveDateTime};

use super::roll_week;
use serde::{Deserialize, Serialize};

use crate::constants::{DAYS_PER_WEEK, MAX_GOAL_NAME_LEN, MAX_WEEKLY_GOAL, MIN_WEEKLY_GOAL};
use crate::errors::{Error, Result, ValidationError};

/// Per-day completion flags, Monday first.
pub type DayCalendar = [bool; DAYS_PER_WEEK];

/// Domain model representing a weekly goal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    pub icon: String,
    pub color: String,
    pub name: String,
    pub weekly_goal: i32,
    pub progress: i32,
    pub completed_days: DayCalendar,
    pub last_reset_date: NaiveDate,
    pub weekly_history: Vec<WeeklySample>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Progress recorded for a week that has since ended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySample {
    pub week_start: NaiveDate,
    pub progress: i32,
    pub weekly_goal: i32,
}

/// Input model for creating a new goal
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub icon: String,
    pub color: String,
    pub name: String,
    pub weekly_goal: i32,
}

/// Partial update of a goal's editable fields
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct GoalUpdate {
    pub icon: Option<String>,
    pub color: Option<String>,
    pub name: Option<String>,
    pub weekly_goal: Option<i32>,
}

impl Goal {
    /// Completion of the current week as a percentage of the weekly target.
    pub fn completion_percent(&self) -> f64 {
        super::progress_percent(self.progress, self.weekly_goal)
    }

    pub fn is_completed(&self) -> bool {
        self.progress >= self.weekly_goal
    }
}

impl NewGoal {
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        validate_non_empty("icon", &self.icon)?;
        validate_non_empty("color", &self.color)?;
        validate_weekly_goal(self.weekly_goal)
    }
}

impl GoalUpdate {
    /// Applies the edit to the stored goal as of `today`.
    ///
    /// The week is rolled first. Lowering the target clamps progress down.
    pub fn apply_to(&self, goal: Goal, today: NaiveDate, updated_at: NaiveDateTime) -> Goal {
        let mut goal = roll_week(goal, today);
        if let Some(icon) = &self.icon {
            goal.icon = icon.clone();
        }
        if let Some(color) = &self.color {
            goal.color = color.clone();
        }
        if let Some(name) = &self.name {
            goal.name = name.trim().to_string();
        }
        if let Some(weekly_goal) = self.weekly_goal {
            goal.weekly_goal = weekly_goal;
            goal.progress = goal.progress.min(weekly_goal);
        }
        goal.updated_at = updated_at;
        goal
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(icon) = &self.icon {
            validate_non_empty("icon", icon)?;
        }
        if let Some(color) = &self.color {
            validate_non_empty("color", color)?;
        }
        if let Some(weekly_goal) = self.weekly_goal {
            validate_weekly_goal(weekly_goal)?;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation(ValidationError::MissingField(
            "name".to_string(),
        )));
    }
    if trimmed.chars().count() > MAX_GOAL_NAME_LEN {
        return Err(Error::invalid_input(format!(
            "Goal name must be at most {} characters",
            MAX_GOAL_NAME_LEN
        )));
    }
    Ok(())
}

fn validate_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(ValidationError::MissingField(
            field.to_string(),
        )));
    }
    Ok(())
}

fn validate_weekly_goal(weekly_goal: i32) -> Result<()> {
    if !(MIN_WEEKLY_GOAL..=MAX_WEEKLY_GOAL).contains(&weekly_goal) {
        return Err(Error::Validation(ValidationError::OutOfRange {
            field: "weeklyGoal".to_string(),
            min: i64::from(MIN_WEEKLY_GOAL),
            max: i64::from(MAX_WEEKLY_GOAL),
        }));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_goal(name: &str, weekly_goal: i32) -> NewGoal {
        NewGoal {
            icon: "🏃".to_string(),
            color: "#FF8A65".to_string(),
            name: name.to_string(),
            weekly_goal,
        }
    }

    #[test]
    fn test_new_goal_validation() {
        assert!(new_goal("Run", 3).validate().is_ok());
        assert!(new_goal("   ", 3).validate().is_err());
        assert!(new_goal("Run", 0).validate().is_err());
        assert!(new_goal("Run", 8).validate().is_err());
        assert!(new_goal(&"x".repeat(51), 3).validate().is_err());
    }

    #[test]
    fn test_goal_serializes_camel_case() {
        let goal = Goal {
            id: "g1".to_string(),
            user_id: "u1".to_string(),
            icon: "📚".to_string(),
            color: "#000000".to_string(),
            name: "Read".to_string(),
            weekly_goal: 4,
            progress: 2,
            completed_days: [true, false, true, false, false, false, false],
            last_reset_date: NaiveDate::from_ymd_opt(2024, 5, 13).unwrap(),
            weekly_history: vec![],
            created_at: NaiveDate::from_ymd_opt(2024, 5, 13)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            updated_at: NaiveDate::from_ymd_opt(2024, 5, 13)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        };
        let json = serde_json::to_value(&goal).unwrap();
        assert_eq!(json["weeklyGoal"], 4);
        assert_eq!(json["lastResetDate"], "2024-05-13");
        assert_eq!(json["completedDays"][2], true);
        assert_eq!(goal.completion_percent(), 50.0);
    }
}
