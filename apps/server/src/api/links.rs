use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{Datelike, Utc};
use goalie_core::deeplink::DeepLink;
use goalie_core::utils::time_utils::local_date;
use serde::{Deserialize, Serialize};

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Deserialize)]
struct ResolveQuery {
    uri: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResolvedLink {
    link: String,
    screen: &'static str,
    year: i32,
    month: u32,
    /// API route that serves the linked screen's data.
    api_path: String,
}

/// Resolves an `app://` link against the current year in the server zone.
async fn resolve_link(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ResolveQuery>,
) -> ApiResult<Json<ResolvedLink>> {
    let link = DeepLink::parse(&query.uri)?;
    let year = local_date(Utc::now(), state.timezone).year();
    match link {
        DeepLink::Challenge { month } => Ok(Json(ResolvedLink {
            link: link.to_uri(),
            screen: "challenge",
            year,
            month,
            api_path: format!("/api/v1/challenges/{}/{}/ranking", year, month),
        })),
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/links/resolve", get(resolve_link))
}
