//! Goalie Core - Domain entities, services, and traits.
//!
//! This crate contains the business rules for weekly goals, photo
//! certifications and monthly group challenges. It is database-agnostic and
//! defines traits that are implemented by the `storage-sqlite` crate and by
//! the server runtime (photo storage, event delivery).

pub mod certifications;
pub mod challenges;
pub mod constants;
pub mod deeplink;
pub mod errors;
pub mod events;
pub mod goals;
pub mod groups;
pub mod photos;
pub mod users;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
