//! Failure taxonomy for a feed run.
//!
//! Failures are contained at the smallest scope: an [`EndpointError`] only
//! moves the resolver on to the next instance, [`FeedError::AllInstancesFailed`]
//! only drops one playlist. Configuration and empty-result failures reach the
//! page as a visible notice.

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::PlaylistId;

/// A single instance failed to answer a playlist request.
#[derive(Error, Debug)]
pub enum EndpointError {
    #[error("unexpected status {0}")]
    Status(StatusCode),

    /// Connection errors and per-request timeouts.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("instance address {0:?} is not a base URL")]
    InvalidEndpoint(String),

    #[error("malformed playlist payload: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("all instances failed for playlist {playlist}")]
    AllInstancesFailed { playlist: PlaylistId },

    #[error("playlist configuration {path:?} unavailable: {source}")]
    ConfigurationUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no videos could be resolved")]
    NoVideosResolved,
}
