//! User domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::constants::MAX_DISPLAY_NAME_LEN;
use crate::errors::{Error, Result, ValidationError};

/// Denormalized copy of a signed-in user's profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub photo_url: Option<String>,
    pub group_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Profile returned by the social login provider for an access token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SocialProfile {
    /// Short provider tag, e.g. `kakao`
    pub provider: String,
    pub provider_user_id: String,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
}

impl SocialProfile {
    /// Identity used by this backend for the provider account.
    pub fn user_id(&self) -> String {
        format!("{}_{}", self.provider, self.provider_user_id)
    }

    /// Nickname trimmed to the display name limit, or a generated fallback.
    pub fn display_name(&self) -> String {
        match self.nickname.as_deref().map(str::trim) {
            Some(nickname) if !nickname.is_empty() => {
                nickname.chars().take(MAX_DISPLAY_NAME_LEN).collect()
            }
            _ => format!("user{}", self.provider_user_id),
        }
    }
}

/// Editable profile fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

impl ProfileUpdate {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.display_name {
            let len = name.trim().chars().count();
            if len == 0 {
                return Err(Error::Validation(ValidationError::MissingField(
                    "displayName".to_string(),
                )));
            }
            if len > MAX_DISPLAY_NAME_LEN {
                return Err(Error::invalid_input(format!(
                    "Display name must be at most {} characters",
                    MAX_DISPLAY_NAME_LEN
                )));
            }
        }
        if let Some(photo_url) = &self.photo_url {
            url::Url::parse(photo_url)?;
        }
        Ok(())
    }
}

/// Column-level change to a stored user, applied inside a write transaction
/// so that concurrent changes to other columns survive.
#[derive(Debug, Clone)]
pub enum UserChange {
    Profile(ProfileUpdate),
    /// Fills provider details the user has not set yet.
    ProviderDetails {
        email: Option<String>,
        photo_url: Option<String>,
    },
    /// Moves the user into a group, or out of any group with `None`.
    Group(Option<String>),
}

impl UserChange {
    pub fn apply_to(self, mut user: User, updated_at: NaiveDateTime) -> User {
        match self {
            UserChange::Profile(update) => {
                if let Some(display_name) = update.display_name {
                    user.display_name = display_name.trim().to_string();
                }
                if let Some(photo_url) = update.photo_url {
                    user.photo_url = Some(photo_url);
                }
            }
            UserChange::ProviderDetails { email, photo_url } => {
                if user.email.is_none() {
                    user.email = email;
                }
                if user.photo_url.is_none() {
                    user.photo_url = photo_url;
                }
            }
            UserChange::Group(group_id) => user.group_id = group_id,
        }
        user.updated_at = updated_at;
        user
    }
}

/// Summary of a bulk account deletion
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountDeletion {
    pub user_id: String,
    pub goals_deleted: usize,
    pub certifications_deleted: usize,
    pub enrollments_deleted: usize,
    /// Photo references of the deleted certifications
    pub photo_urls: Vec<String>,
}
