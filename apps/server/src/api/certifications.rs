use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use chrono::Utc;
use goalie_core::certifications::{Certification, CheckInOutcome, FeedItem, FeedQuery};
use goalie_core::photos::PhotoUpload;

use crate::{
    auth::CurrentUser,
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

/// Multipart field carrying the certification image.
const PHOTO_FIELD: &str = "photo";

async fn read_photo(mut multipart: Multipart, max_bytes: usize) -> ApiResult<PhotoUpload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(PHOTO_FIELD) {
            continue;
        }
        let content_type = field
            .content_type()
            .map(str::to_string)
            .ok_or_else(|| ApiError::BadRequest("Photo has no content type".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read photo: {}", e)))?;
        if bytes.len() > max_bytes {
            return Err(ApiError::BadRequest(format!(
                "Photo exceeds the {} byte limit",
                max_bytes
            )));
        }
        return Ok(PhotoUpload {
            bytes: bytes.to_vec(),
            content_type,
        });
    }
    Err(ApiError::BadRequest(format!(
        "Missing multipart field '{}'",
        PHOTO_FIELD
    )))
}

async fn certify(
    Path(goal_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<CheckInOutcome>)> {
    let upload = read_photo(multipart, state.max_photo_bytes).await?;
    let outcome = state
        .certification_service
        .certify(user.id(), &goal_id, upload, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

async fn get_goal_certifications(
    Path(goal_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<Certification>>> {
    Ok(Json(
        state
            .certification_service
            .get_goal_certifications(user.id(), &goal_id)?,
    ))
}

async fn get_feed(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<FeedQuery>,
) -> ApiResult<Json<Vec<FeedItem>>> {
    Ok(Json(state.certification_service.get_feed(user.id(), query)?))
}

async fn get_user_certifications(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<FeedQuery>,
) -> ApiResult<Json<Vec<FeedItem>>> {
    Ok(Json(state.certification_service.get_user_certifications(
        user.id(),
        &user_id,
        query,
    )?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/goals/{id}/certifications",
            get(get_goal_certifications).post(certify),
        )
        .route("/feed", get(get_feed))
        .route("/users/{id}/certifications", get(get_user_certifications))
}
