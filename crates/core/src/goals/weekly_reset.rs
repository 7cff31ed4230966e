//! Weekly reset rule.
//!
//! Goals are never reset by a background job. Whenever a goal is read (or
//! about to be written) the rule below is evaluated against the current date:
//! a goal whose `last_reset_date` predates this week's Monday has its progress
//! and day calendar zeroed.

use chrono::NaiveDate;

use super::goals_model::{Goal, WeeklySample};
use crate::constants::{DAYS_PER_WEEK, WEEKLY_HISTORY_LIMIT};
use crate::utils::time_utils::week_start;

/// Returns true when `goal` still carries progress from a previous week.
pub fn needs_reset(goal: &Goal, today: NaiveDate) -> bool {
    goal.last_reset_date < week_start(today)
}

/// Applies the weekly reset for display.
///
/// Progress is also clamped into `0..=weekly_goal` so that rows written by
/// older clients never surface out-of-range values.
pub fn apply_weekly_reset(mut goal: Goal, today: NaiveDate) -> Goal {
    if needs_reset(&goal, today) {
        goal.progress = 0;
        goal.completed_days = [false; DAYS_PER_WEEK];
        goal.last_reset_date = week_start(today);
    }
    goal.progress = goal.progress.clamp(0, goal.weekly_goal.max(0));
    goal
}

/// Applies the weekly reset on the write path.
///
/// Identical to [`apply_weekly_reset`] except that the stale week's progress
/// is kept as a [`WeeklySample`] before being zeroed.
pub fn roll_week(mut goal: Goal, today: NaiveDate) -> Goal {
    if needs_reset(&goal, today) {
        goal.weekly_history.push(WeeklySample {
            week_start: week_start(goal.last_reset_date),
            progress: goal.progress.clamp(0, goal.weekly_goal.max(0)),
            weekly_goal: goal.weekly_goal,
        });
        let overflow = goal
            .weekly_history
            .len()
            .saturating_sub(WEEKLY_HISTORY_LIMIT);
        if overflow > 0 {
            goal.weekly_history.drain(..overflow);
        }
    }
    apply_weekly_reset(goal, today)
}

/// `progress / weekly_goal * 100`, or 0 when the target is not positive.
pub fn progress_percent(progress: i32, weekly_goal: i32) -> f64 {
    if weekly_goal <= 0 {
        return 0.0;
    }
    f64::from(progress) / f64::from(weekly_goal) * 100.0
}
