//! Groups module - the circle of users who share a feed and a challenge.

mod groups_model;
mod groups_service;
mod groups_traits;

pub use groups_model::{Group, NewGroup};
pub use groups_service::GroupService;
pub use groups_traits::{GroupRepositoryTrait, GroupServiceTrait};
