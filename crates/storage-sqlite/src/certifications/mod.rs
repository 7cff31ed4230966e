//! SQLite storage implementation for certifications and the feed.

mod model;
mod repository;

pub use model::CertificationDB;
pub use repository::CertificationRepository;
