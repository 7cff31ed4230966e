//! Certifications module - photo check-ins against goals and the shared feed.

mod certifications_model;
mod certifications_service;
mod certifications_traits;
mod check_in;

pub use certifications_model::{
    Certification, CheckInOutcome, FeedItem, FeedQuery, NewCertification,
};
pub use certifications_service::CertificationService;
pub use certifications_traits::{CertificationRepositoryTrait, CertificationServiceTrait};
pub use check_in::record_check_in;
