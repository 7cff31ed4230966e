//! Challenges module - monthly group leaderboards.

mod challenges_model;
mod challenges_service;
mod challenges_traits;
mod ranking;

pub use challenges_model::{ChallengeEnrollment, ChallengeMember, ChallengeRanking};
pub use challenges_service::ChallengeService;
pub use challenges_traits::{ChallengeRepositoryTrait, ChallengeServiceTrait};
pub use ranking::{rank_members, total_progress};
