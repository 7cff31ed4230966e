//! Certification domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_FEED_LIMIT, MAX_FEED_LIMIT};
use crate::goals::Goal;

/// A timestamped photo check-in against a goal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub id: String,
    pub user_id: String,
    pub goal_id: String,
    pub photo_url: String,
    /// Goal completion percentage right after this check-in
    pub progress_snapshot: f64,
    pub created_at: NaiveDateTime,
}

/// Input model for recording a certification
#[derive(Debug, Clone)]
pub struct NewCertification {
    pub id: String,
    pub user_id: String,
    pub goal_id: String,
    pub photo_url: String,
    pub created_at: NaiveDateTime,
}

/// Goal state and certification produced by one check-in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckInOutcome {
    pub goal: Goal,
    pub certification: Certification,
}

/// Certification joined with the fields a feed card displays
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    #[serde(flatten)]
    pub certification: Certification,
    pub author_name: String,
    pub author_photo_url: Option<String>,
    pub goal_name: String,
    pub goal_icon: String,
    pub goal_color: String,
}

/// Keyset pagination over certifications, newest first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedQuery {
    /// Only return certifications created strictly before this instant
    pub before: Option<NaiveDateTime>,
    /// Id of the last item of the previous page. With `before` set, items
    /// created at exactly `before` with a smaller id are also returned.
    pub before_id: Option<String>,
    pub limit: Option<i64>,
}

impl FeedQuery {
    /// Page size with defaults and bounds applied.
    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_FEED_LIMIT)
            .clamp(1, MAX_FEED_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_limit_bounds() {
        assert_eq!(FeedQuery::default().effective_limit(), DEFAULT_FEED_LIMIT);
        let huge = FeedQuery {
            limit: Some(10_000),
            ..Default::default()
        };
        assert_eq!(huge.effective_limit(), MAX_FEED_LIMIT);
        let zero = FeedQuery {
            limit: Some(0),
            ..Default::default()
        };
        assert_eq!(zero.effective_limit(), 1);
    }
}
