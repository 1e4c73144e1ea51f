use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Non-empty playlist identifier (the `list` query value of a playlist URL).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PlaylistId(String);

impl PlaylistId {
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub quality: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub video_id: String,
    pub title: String,
    #[serde(default)]
    pub video_thumbnails: Vec<Thumbnail>,
}

/// Body of `GET /api/v1/playlists/{id}`; only the fields the feed uses.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistResponse {
    pub videos: Vec<Video>,
}

/// Videos keyed by id, kept in first-arrival order.
///
/// A later video with an id already present replaces the stored record
/// in place, so the position of the first arrival is kept.
#[derive(Debug, Clone, Default)]
pub struct VideoSet {
    index: HashMap<String, usize>,
    videos: Vec<Video>,
}

impl VideoSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, video: Video) {
        match self.index.get(&video.video_id) {
            Some(&pos) => self.videos[pos] = video,
            None => {
                self.index.insert(video.video_id.clone(), self.videos.len());
                self.videos.push(video);
            }
        }
    }

    pub fn get(&self, video_id: &str) -> Option<&Video> {
        self.index.get(video_id).map(|&pos| &self.videos[pos])
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    pub fn as_slice(&self) -> &[Video] {
        &self.videos
    }

    pub fn into_vec(self) -> Vec<Video> {
        self.videos
    }
}

impl Extend<Video> for VideoSet {
    fn extend<I: IntoIterator<Item = Video>>(&mut self, iter: I) {
        for v in iter {
            self.insert(v);
        }
    }
}

impl FromIterator<Video> for VideoSet {
    fn from_iter<I: IntoIterator<Item = Video>>(iter: I) -> Self {
        let mut set = VideoSet::new();
        set.extend(iter);
        set
    }
}
