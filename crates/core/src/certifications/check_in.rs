use chrono::NaiveDate;

use crate::goals::{roll_week, Goal};
use crate::utils::time_utils::calendar_index_for;

/// Applies one check-in made on `today` to `goal`.
///
/// The week is rolled first, then progress is incremented and clamped to
/// the weekly target. Today's calendar slot is marked even when the target
/// was already reached.
pub fn record_check_in(goal: Goal, today: NaiveDate) -> Goal {
    let mut goal = roll_week(goal, today);
    goal.progress = (goal.progress + 1).min(goal.weekly_goal);
    goal.completed_days[calendar_index_for(today)] = true;
    goal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, sample_goal};

    #[test]
    fn test_check_in_increments_and_marks_day() {
        // Wednesday 2024-05-15
        let goal = sample_goal("g1", "u1", 1, 3, date(2024, 5, 13));
        let after = record_check_in(goal, date(2024, 5, 15));
        assert_eq!(after.progress, 2);
        assert!(after.completed_days[2]);
    }

    #[test]
    fn test_check_in_at_target_is_clamped_but_marks_day() {
        let mut goal = sample_goal("g1", "u1", 3, 3, date(2024, 5, 13));
        goal.completed_days = [false; 7];
        // Sunday 2024-05-19 maps to the last slot
        let after = record_check_in(goal, date(2024, 5, 19));
        assert_eq!(after.progress, 3);
        assert!(after.completed_days[6]);
        assert_eq!(after.completed_days.iter().filter(|d| **d).count(), 1);
    }

    #[test]
    fn test_check_in_after_week_boundary_starts_fresh() {
        let goal = sample_goal("g1", "u1", 3, 3, date(2024, 5, 13));
        // Monday of the following week
        let after = record_check_in(goal, date(2024, 5, 20));
        assert_eq!(after.progress, 1);
        assert_eq!(after.completed_days, [true, false, false, false, false, false, false]);
        assert_eq!(after.last_reset_date, date(2024, 5, 20));
        assert_eq!(after.weekly_history.len(), 1);
    }
}
