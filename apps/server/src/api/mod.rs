use std::{convert::Infallible, sync::Arc, time::Duration};

use axum::{
    extract::{DefaultBodyLimit, State},
    middleware,
    response::sse::{Event as SseEvent, KeepAlive, Sse},
    routing::{get, post},
    Extension, Router,
};
use futures_core::Stream;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    auth::{require_jwt, social_login, CurrentUser},
    config::Config,
    error::ApiResult,
    main_lib::AppState,
    photos::PHOTO_ROUTE,
};

mod certifications;
mod challenges;
mod goals;
mod groups;
mod health;
mod links;
mod me;

/// Room for multipart framing on top of the photo itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Realtime feed for the caller: their own events and their group's.
/// Dropping the connection releases the subscription.
async fn stream_events(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Sse<impl Stream<Item = Result<SseEvent, Infallible>>>> {
    let group_id = state.user_service.get_user(user.id())?.group_id;
    let user_id = user.0;

    let receiver = BroadcastStream::new(state.event_bus.subscribe());
    let stream = tokio_stream::StreamExt::filter_map(receiver, move |event| match event {
        Ok(evt) => {
            if !evt.is_visible_to(&user_id, group_id.as_deref()) {
                return None;
            }
            let sse_event = SseEvent::default().event(evt.name);
            let sse_event = if let Some(payload) = evt.payload {
                match sse_event.json_data(payload) {
                    Ok(ev) => ev,
                    Err(err) => {
                        tracing::error!(
                            "Failed to serialize SSE payload for {}: {}",
                            evt.name,
                            err
                        );
                        return None;
                    }
                }
            } else {
                sse_event.data("null")
            };
            Some(Ok(sse_event))
        }
        Err(BroadcastStreamRecvError::Lagged(_)) => None,
    });

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    ))
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(origin) => Some(origin),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin {}", o);
                    None
                }
            })
            .collect::<Vec<_>>();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let protected = Router::new()
        .merge(me::router())
        .merge(groups::router())
        .merge(goals::router())
        .merge(certifications::router())
        .merge(challenges::router())
        .merge(links::router())
        .route("/events/stream", get(stream_events))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_jwt));

    let api = Router::new()
        .merge(health::router())
        .route("/auth/social", post(social_login))
        .merge(protected)
        .layer(DefaultBodyLimit::max(
            config.max_photo_bytes + MULTIPART_OVERHEAD_BYTES,
        ));

    Router::new()
        .nest("/api/v1", api)
        .nest_service(PHOTO_ROUTE, ServeDir::new(&config.photo_dir))
        .with_state(state)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
