pub mod aggregate;
pub mod config;
pub mod domain;
pub mod error;
pub mod feed;
pub mod handlers;
pub mod metrics;
pub mod playlists;
pub mod render;
pub mod shuffle;
pub mod upstream;
