//! Challenge domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::goals::Goal;

/// Persisted enrollment of a user in a group's monthly challenge
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeEnrollment {
    pub id: String,
    pub user_id: String,
    pub group_id: String,
    pub year: i32,
    pub month: u32,
    pub joined_at: NaiveDateTime,
}

/// Leaderboard row, rebuilt on every fetch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeMember {
    pub user_id: String,
    pub display_name: String,
    pub photo_url: Option<String>,
    pub goals: Vec<Goal>,
    pub total_progress: f64,
    pub rank: Option<u32>,
}

/// Ranked leaderboard of one group for one month
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRanking {
    pub group_id: String,
    pub year: i32,
    pub month: u32,
    pub members: Vec<ChallengeMember>,
}
