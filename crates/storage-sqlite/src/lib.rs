//! SQLite storage implementation for Goalie.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `goalie-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for users, groups, goals, certifications and challenges
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! The core crate is database-agnostic and works with traits.
//!
//! ```text
//!        core (domain)
//!              │
//!              ▼
//!  storage-sqlite (this crate)
//!              │
//!              ▼
//!          SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod certifications;
pub mod challenges;
pub mod goals;
pub mod groups;
pub mod users;

#[cfg(test)]
mod test_support;

// Re-export database utilities
pub use db::{create_pool, get_connection, init, run_migrations, DbConnection, DbPool, WriteHandle};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from goalie-core for convenience
pub use goalie_core::errors::{DatabaseError, Error, Result};
