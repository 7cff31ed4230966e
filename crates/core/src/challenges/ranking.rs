//! Leaderboard arithmetic.

use std::cmp::Ordering;

use super::challenges_model::ChallengeMember;
use crate::goals::{progress_percent, Goal};

/// Mean completion percentage over `goals`; 0 for a member without goals.
pub fn total_progress(goals: &[Goal]) -> f64 {
    if goals.is_empty() {
        return 0.0;
    }
    let sum: f64 = goals
        .iter()
        .map(|goal| progress_percent(goal.progress, goal.weekly_goal))
        .sum();
    sum / goals.len() as f64
}

/// Sorts members by `total_progress` descending and assigns competition
/// ranks: a member equal to the one before shares its rank, otherwise the
/// rank is the 1-based position. `[80, 80, 50]` ranks as `[1, 1, 3]`.
pub fn rank_members(mut members: Vec<ChallengeMember>) -> Vec<ChallengeMember> {
    members.sort_by(|a, b| {
        b.total_progress
            .partial_cmp(&a.total_progress)
            .unwrap_or(Ordering::Equal)
    });

    let mut previous: Option<(f64, u32)> = None;
    for (position, member) in members.iter_mut().enumerate() {
        let rank = match previous {
            Some((score, rank)) if score == member.total_progress => rank,
            _ => position as u32 + 1,
        };
        member.rank = Some(rank);
        previous = Some((member.total_progress, rank));
    }
    members
}
