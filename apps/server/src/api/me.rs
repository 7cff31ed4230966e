use std::sync::Arc;

use axum::{extract::State, routing::get, Extension, Json, Router};
use chrono::Utc;
use goalie_core::users::{AccountDeletion, ProfileUpdate, User};

use crate::{auth::CurrentUser, error::ApiResult, main_lib::AppState};

async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.user_service.get_user(user.id())?))
}

async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(update): Json<ProfileUpdate>,
) -> ApiResult<Json<User>> {
    let updated = state
        .user_service
        .update_profile(user.id(), update, Utc::now())
        .await?;
    Ok(Json(updated))
}

/// Deletes the caller's account together with everything it owns.
async fn delete_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<AccountDeletion>> {
    Ok(Json(state.user_service.delete_account(user.id()).await?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/me", get(get_me).put(update_me).delete(delete_me))
}
