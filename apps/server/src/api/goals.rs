use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use chrono::Utc;
use goalie_core::goals::{Goal, GoalUpdate, NewGoal};

use crate::{auth::CurrentUser, error::ApiResult, main_lib::AppState};

async fn get_goals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<Goal>>> {
    let goals = state.goal_service.get_goals(user.id(), Utc::now())?;
    Ok(Json(goals))
}

async fn get_goal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<Goal>> {
    Ok(Json(state.goal_service.get_goal(user.id(), &id, Utc::now())?))
}

async fn create_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(goal): Json<NewGoal>,
) -> ApiResult<(StatusCode, Json<Goal>)> {
    let g = state
        .goal_service
        .create_goal(user.id(), goal, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(g)))
}

async fn update_goal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(update): Json<GoalUpdate>,
) -> ApiResult<Json<Goal>> {
    let g = state
        .goal_service
        .update_goal(user.id(), &id, update, Utc::now())
        .await?;
    Ok(Json(g))
}

async fn delete_goal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<StatusCode> {
    let _ = state.goal_service.delete_goal(user.id(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/goals", get(get_goals).post(create_goal))
        .route(
            "/goals/{id}",
            get(get_goal).put(update_goal).delete(delete_goal),
        )
}
