/// Number of slots in a goal's day calendar (Monday..Sunday).
pub const DAYS_PER_WEEK: usize = 7;

/// Smallest accepted weekly target.
pub const MIN_WEEKLY_GOAL: i32 = 1;

/// Largest accepted weekly target: one check-in per day.
pub const MAX_WEEKLY_GOAL: i32 = 7;

/// Maximum length of a goal name, in characters.
pub const MAX_GOAL_NAME_LEN: usize = 50;

/// Maximum length of a user display name, in characters.
pub const MAX_DISPLAY_NAME_LEN: usize = 30;

/// Maximum length of a group name, in characters.
pub const MAX_GROUP_NAME_LEN: usize = 40;

/// How many past weeks of progress are kept on a goal.
pub const WEEKLY_HISTORY_LIMIT: usize = 52;

/// Default page size for certification listings.
pub const DEFAULT_FEED_LIMIT: i64 = 20;

/// Upper bound for certification page sizes.
pub const MAX_FEED_LIMIT: i64 = 100;

/// Custom URI scheme used by the mobile client for deep links.
pub const DEEP_LINK_SCHEME: &str = "app";
