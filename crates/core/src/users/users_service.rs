use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::errors::{Error, Result};
use crate::photos::PhotoStoreTrait;
use crate::users::users_model::{
    AccountDeletion, ProfileUpdate, SocialProfile, User, UserChange,
};
use crate::users::users_traits::{UserRepositoryTrait, UserServiceTrait};

pub struct UserService {
    user_repo: Arc<dyn UserRepositoryTrait>,
    photo_store: Arc<dyn PhotoStoreTrait>,
}

impl UserService {
    pub fn new(
        user_repo: Arc<dyn UserRepositoryTrait>,
        photo_store: Arc<dyn PhotoStoreTrait>,
    ) -> Self {
        UserService {
            user_repo,
            photo_store,
        }
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    async fn sign_in(&self, profile: SocialProfile, now: DateTime<Utc>) -> Result<User> {
        if profile.provider_user_id.trim().is_empty() {
            return Err(Error::Unauthorized(
                "social profile is missing a user id".to_string(),
            ));
        }
        let user_id = profile.user_id();
        let timestamp = now.naive_utc();

        match self.user_repo.find_user(&user_id)? {
            Some(existing) => {
                // The display name is user-editable; only fill gaps from the provider.
                self.user_repo
                    .apply_user_change(
                        existing.id,
                        UserChange::ProviderDetails {
                            email: profile.email,
                            photo_url: profile.photo_url,
                        },
                        timestamp,
                    )
                    .await
            }
            None => {
                let user = User {
                    id: user_id,
                    display_name: profile.display_name(),
                    email: profile.email,
                    photo_url: profile.photo_url,
                    group_id: None,
                    created_at: timestamp,
                    updated_at: timestamp,
                };
                let created = self.user_repo.insert_user(user).await?;
                info!("Registered new user {}", created.id);
                Ok(created)
            }
        }
    }

    fn get_user(&self, user_id: &str) -> Result<User> {
        self.user_repo
            .find_user(user_id)?
            .ok_or_else(|| Error::NotFound(format!("User {}", user_id)))
    }

    async fn update_profile(
        &self,
        user_id: &str,
        update: ProfileUpdate,
        now: DateTime<Utc>,
    ) -> Result<User> {
        update.validate()?;
        self.user_repo
            .apply_user_change(
                user_id.to_string(),
                UserChange::Profile(update),
                now.naive_utc(),
            )
            .await
    }

    async fn delete_account(&self, user_id: &str) -> Result<AccountDeletion> {
        self.get_user(user_id)?;
        let deletion = self
            .user_repo
            .delete_user_cascade(user_id.to_string())
            .await?;

        for url in &deletion.photo_urls {
            if let Err(e) = self.photo_store.delete(url).await {
                warn!("Failed to remove photo {} of deleted user {}: {}", url, user_id, e);
            }
        }

        info!(
            "Deleted account {}: {} goals, {} certifications, {} enrollments",
            user_id,
            deletion.goals_deleted,
            deletion.certifications_deleted,
            deletion.enrollments_deleted
        );
        Ok(deletion)
    }
}
