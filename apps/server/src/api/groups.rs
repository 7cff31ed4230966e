use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use goalie_core::groups::{Group, NewGroup};
use goalie_core::users::User;

use crate::{auth::CurrentUser, error::ApiResult, main_lib::AppState};

async fn create_group(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(new_group): Json<NewGroup>,
) -> ApiResult<(StatusCode, Json<Group>)> {
    let group = state
        .group_service
        .create_group(user.id(), new_group, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(group)))
}

async fn get_group(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Group>> {
    Ok(Json(state.group_service.get_group(&id)?))
}

async fn join_group(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<User>> {
    let updated = state
        .group_service
        .join_group(user.id(), &id, Utc::now())
        .await?;
    Ok(Json(updated))
}

async fn leave_group(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<User>> {
    Ok(Json(
        state.group_service.leave_group(user.id(), Utc::now()).await?,
    ))
}

async fn get_members(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.group_service.get_members(user.id(), &id)?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/groups", post(create_group))
        .route("/groups/leave", post(leave_group))
        .route("/groups/{id}", get(get_group))
        .route("/groups/{id}/join", post(join_group))
        .route("/groups/{id}/members", get(get_members))
}
