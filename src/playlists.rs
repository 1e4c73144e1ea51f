use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::debug;

use crate::domain::PlaylistId;
use crate::error::FeedError;

static RE_BARE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid playlist id regex"));

/// Playlist id from one configuration line: the `list` query parameter of
/// a playlist URL, or the line itself when it is a bare id. Either way the
/// id must be made of `[A-Za-z0-9_-]`.
pub fn extract_playlist_id(line: &str) -> Option<PlaylistId> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let parsed = reqwest::Url::parse(line).ok().or_else(|| {
        line.contains('?')
            .then(|| reqwest::Url::parse(&format!("https://{line}")).ok())
            .flatten()
    });
    match parsed {
        Some(url) => url
            .query_pairs()
            .find(|(k, _)| k == "list")
            .filter(|(_, v)| RE_BARE_ID.is_match(v))
            .and_then(|(_, v)| PlaylistId::new(v.into_owned())),
        None if RE_BARE_ID.is_match(line) => PlaylistId::new(line),
        None => None,
    }
}

/// Ids of every usable line, in file order; unusable lines are skipped.
pub fn parse_playlists(text: &str) -> Vec<PlaylistId> {
    text.lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|l| {
            let id = extract_playlist_id(l);
            if id.is_none() && !l.trim_start().starts_with('#') {
                debug!(line = %l.trim(), "Skipping line without playlist id");
            }
            id
        })
        .collect()
}

pub async fn load_playlists(path: &Path) -> Result<Vec<PlaylistId>, FeedError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| FeedError::ConfigurationUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(parse_playlists(&text))
}
