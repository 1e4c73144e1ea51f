use crate::config::FeedConfig;
use crate::domain::{PlaylistId, PlaylistResponse, Video};
use crate::error::{EndpointError, FeedError};
use crate::metrics::Metrics;
use reqwest::{header::ACCEPT, Client};
use std::{sync::Arc, time::Duration};
use tracing::{debug, warn};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// HTTP client shared by all runs; `timeout` bounds each instance attempt.
pub fn build_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .gzip(true)
        .deflate(true)
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}

/// `{endpoint}/api/v1/playlists/{id}` with the id escaped as one path
/// segment. `None` when `endpoint` cannot serve as a base URL.
pub fn playlist_url(endpoint: &str, playlist: &PlaylistId) -> Option<reqwest::Url> {
    let mut url = reqwest::Url::parse(endpoint).ok()?;
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .extend(["api", "v1", "playlists", playlist.as_str()]);
    Some(url)
}

/// Resolves a playlist against the configured instances, first success wins.
#[derive(Clone)]
pub struct MirrorResolver {
    client: Client,
    config: FeedConfig,
    metrics: Arc<Metrics>,
}

impl MirrorResolver {
    pub fn new(client: Client, config: FeedConfig, metrics: Arc<Metrics>) -> Self {
        Self {
            client,
            config,
            metrics,
        }
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Tries each instance in configured order, one at a time, and returns
    /// the first successful listing truncated to the per-playlist cap.
    pub async fn fetch_playlist(&self, playlist: &PlaylistId) -> Result<Vec<Video>, FeedError> {
        for endpoint in self.config.endpoints.iter() {
            match self.fetch_from(endpoint, playlist).await {
                Ok(mut videos) => {
                    videos.truncate(self.config.max_per_playlist);
                    debug!(%playlist, %endpoint, count = videos.len(), "Playlist resolved");
                    return Ok(videos);
                }
                Err(e) => {
                    warn!(%playlist, %endpoint, error = %e, "Instance failed, trying next");
                }
            }
        }
        Err(FeedError::AllInstancesFailed {
            playlist: playlist.clone(),
        })
    }

    async fn fetch_from(
        &self,
        endpoint: &str,
        playlist: &PlaylistId,
    ) -> Result<Vec<Video>, EndpointError> {
        let start = std::time::Instant::now();
        let result = self.request(endpoint, playlist).await;
        let outcome = match &result {
            Ok(_) => "ok",
            Err(EndpointError::Status(_)) => "status",
            Err(EndpointError::Transport(_)) => "transport",
            Err(EndpointError::Decode(_)) => "decode",
            Err(EndpointError::InvalidEndpoint(_)) => "invalid_endpoint",
        };
        self.metrics.on_endpoint_result(
            endpoint,
            outcome,
            start.elapsed().as_secs_f64() * 1000.0,
        );
        result
    }

    async fn request(
        &self,
        endpoint: &str,
        playlist: &PlaylistId,
    ) -> Result<Vec<Video>, EndpointError> {
        let url = playlist_url(endpoint, playlist)
            .ok_or_else(|| EndpointError::InvalidEndpoint(endpoint.to_string()))?;
        let resp = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(EndpointError::Status(resp.status()));
        }
        let body = resp.text().await?;
        let PlaylistResponse { mut videos } = serde_json::from_str(&body)?;
        absolutize_thumbnails(endpoint, &mut videos);
        Ok(videos)
    }
}

/// Some instances return thumbnail paths relative to themselves; make them
/// absolute against the instance that served the listing.
pub fn absolutize_thumbnails(endpoint: &str, videos: &mut [Video]) {
    let Ok(base) = reqwest::Url::parse(endpoint) else {
        return;
    };
    for thumb in videos.iter_mut().flat_map(|v| v.video_thumbnails.iter_mut()) {
        if reqwest::Url::parse(&thumb.url).is_ok() {
            continue;
        }
        if let Ok(abs) = base.join(&thumb.url) {
            thumb.url = abs.to_string();
        }
    }
}
