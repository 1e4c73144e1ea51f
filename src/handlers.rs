use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use std::{path::PathBuf, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::error::FeedError;
use crate::feed;
use crate::metrics;
use crate::render::render_page;
use crate::upstream::MirrorResolver;

#[derive(Clone)]
pub struct AppState {
    pub resolver: MirrorResolver,
    pub playlists_file: Arc<PathBuf>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    Router::new()
        .route("/", get(get_page))
        .route("/feed.json", get(get_feed_json))
        .route("/metrics", get(get_metrics))
        .route("/healthz", get(|| async { "ok" }))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

const NO_STORE: [(header::HeaderName, HeaderValue); 1] = [(
    header::CACHE_CONTROL,
    HeaderValue::from_static("no-store, max-age=0"),
)];

async fn get_page(State(state): State<AppState>) -> impl IntoResponse {
    let outcome = feed::run(&state.resolver, &state.playlists_file).await;
    let status = match &outcome {
        Err(FeedError::ConfigurationUnavailable { .. }) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    };
    (status, NO_STORE, Html(render_page(&outcome))).into_response()
}

async fn get_feed_json(State(state): State<AppState>) -> impl IntoResponse {
    match feed::run(&state.resolver, &state.playlists_file).await {
        Ok(feed) => (StatusCode::OK, NO_STORE, Json(feed)).into_response(),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            NO_STORE,
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

async fn get_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match metrics::encode_text(state.resolver.metrics()) {
        Ok(body) => (
            StatusCode::OK,
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; version=0.0.4"),
            )],
            body,
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        )
            .into_response(),
    }
}
