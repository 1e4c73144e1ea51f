#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use daily_feed::{config::FeedConfig, metrics::Metrics, upstream::MirrorResolver};

/// Closed port on loopback, connection is refused immediately.
pub const UNREACHABLE: &str = "http://127.0.0.1:1";

pub enum Mode {
    /// playlist id -> response body; unknown ids get a 404.
    Serve(HashMap<String, Value>),
    Status(StatusCode),
    Malformed,
    Slow,
    /// Like `Serve`, but each answer waits out the delay first.
    Delayed(Duration, HashMap<String, Value>),
}

#[derive(Default)]
struct Counters {
    hits: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

pub struct FakeInstance {
    pub base: String,
    counters: Arc<Counters>,
}

impl FakeInstance {
    pub fn hits(&self) -> usize {
        self.counters.hits.load(Ordering::SeqCst)
    }

    /// Most requests this instance was handling at the same moment.
    pub fn peak_in_flight(&self) -> usize {
        self.counters.peak_in_flight.load(Ordering::SeqCst)
    }
}

type InstanceState = (Arc<Mode>, Arc<Counters>);

fn listing(lists: &HashMap<String, Value>, id: &str) -> Response {
    match lists.get(id) {
        Some(body) => Json(body.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Playlist does not exist." })),
        )
            .into_response(),
    }
}

async fn serve_playlist(
    State((mode, counters)): State<InstanceState>,
    Path(id): Path<String>,
) -> Response {
    counters.hits.fetch_add(1, Ordering::SeqCst);
    let now = counters.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    counters.peak_in_flight.fetch_max(now, Ordering::SeqCst);
    let resp = respond(&mode, &id).await;
    counters.in_flight.fetch_sub(1, Ordering::SeqCst);
    resp
}

async fn respond(mode: &Mode, id: &str) -> Response {
    match mode {
        Mode::Serve(lists) => listing(lists, id),
        Mode::Delayed(delay, lists) => {
            tokio::time::sleep(*delay).await;
            listing(lists, id)
        }
        Mode::Status(code) => (*code, "unavailable").into_response(),
        Mode::Malformed => (StatusCode::OK, "<html>rate limited</html>").into_response(),
        Mode::Slow => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "videos": [] })).into_response()
        }
    }
}

pub async fn spawn_instance(mode: Mode) -> FakeInstance {
    let counters = Arc::new(Counters::default());
    let app = Router::new()
        .route("/api/v1/playlists/:id", get(serve_playlist))
        .with_state((Arc::new(mode), counters.clone()));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    FakeInstance {
        base: format!("http://{addr}"),
        counters,
    }
}

fn lists_by_id(lists: &[(&str, Value)]) -> HashMap<String, Value> {
    lists
        .iter()
        .map(|(id, body)| (id.to_string(), body.clone()))
        .collect()
}

pub fn serve(lists: &[(&str, Value)]) -> Mode {
    Mode::Serve(lists_by_id(lists))
}

pub fn serve_after(delay: Duration, lists: &[(&str, Value)]) -> Mode {
    Mode::Delayed(delay, lists_by_id(lists))
}

/// Playlist body in the instance API shape.
pub fn playlist(videos: &[(&str, &str)]) -> Value {
    let videos: Vec<Value> = videos
        .iter()
        .map(|(id, title)| {
            json!({
                "title": title,
                "videoId": id,
                "author": "Channel",
                "videoThumbnails": [
                    { "quality": "maxres", "url": format!("https://i.ytimg.com/vi/{id}/maxres.jpg"), "width": 1280, "height": 720 },
                    { "quality": "medium", "url": format!("https://i.ytimg.com/vi/{id}/mqdefault.jpg"), "width": 320, "height": 180 }
                ],
                "lengthSeconds": 120
            })
        })
        .collect();
    json!({ "title": "Test playlist", "playlistId": "PL", "videos": videos })
}

pub fn resolver(endpoints: &[&str], cap: usize) -> MirrorResolver {
    let config = FeedConfig::new(endpoints.iter().map(|e| e.to_string()).collect(), cap)
        .unwrap()
        .with_request_timeout(Duration::from_millis(500));
    let client = reqwest::Client::builder()
        .no_proxy()
        .timeout(config.request_timeout)
        .build()
        .unwrap();
    MirrorResolver::new(client, config, Arc::new(Metrics::new()))
}
