//! SQLite storage implementation for monthly challenge enrollments.

mod model;
mod repository;

pub use model::ChallengeEnrollmentDB;
pub use repository::ChallengeRepository;
