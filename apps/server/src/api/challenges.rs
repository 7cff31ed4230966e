use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use goalie_core::challenges::{ChallengeEnrollment, ChallengeRanking};
use goalie_core::utils::time_utils::YearMonth;

use crate::{auth::CurrentUser, error::ApiResult, main_lib::AppState};

async fn join_challenge(
    Path((year, month)): Path<(i32, u32)>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<ChallengeEnrollment>> {
    let month = YearMonth::new(year, month)?;
    let enrollment = state
        .challenge_service
        .join_challenge(user.id(), month, Utc::now())
        .await?;
    Ok(Json(enrollment))
}

async fn leave_challenge(
    Path((year, month)): Path<(i32, u32)>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<StatusCode> {
    let month = YearMonth::new(year, month)?;
    let _ = state
        .challenge_service
        .leave_challenge(user.id(), month)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_ranking(
    Path((year, month)): Path<(i32, u32)>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<ChallengeRanking>> {
    let month = YearMonth::new(year, month)?;
    Ok(Json(
        state
            .challenge_service
            .get_ranking(user.id(), month, Utc::now())?,
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/challenges/{year}/{month}/join",
            post(join_challenge).delete(leave_challenge),
        )
        .route("/challenges/{year}/{month}/ranking", get(get_ranking))
}
