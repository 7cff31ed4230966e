//! SQLite storage implementation for groups.

mod model;
mod repository;

pub use model::GroupDB;
pub use repository::GroupRepository;
