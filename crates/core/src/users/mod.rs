//! Users module - profiles synthesised from social login, account deletion.

mod users_model;
mod users_service;
mod users_traits;

pub use users_model::{AccountDeletion, ProfileUpdate, SocialProfile, User, UserChange};
pub use users_service::UserService;
pub use users_traits::{UserRepositoryTrait, UserServiceTrait};
