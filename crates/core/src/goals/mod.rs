//! Goals module - domain models, weekly reset rule, services, and traits.

mod goals_model;
mod goals_service;
mod goals_traits;
mod weekly_reset;

pub use goals_model::{DayCalendar, Goal, GoalUpdate, NewGoal, WeeklySample};
pub use goals_service::GoalService;
pub use goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
pub use weekly_reset::{apply_weekly_reset, needs_reset, progress_percent, roll_week};
