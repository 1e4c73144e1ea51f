//! Render-ready view of the feed and the HTML page built from it.

use serde::Serialize;

use crate::domain::{PlaylistId, Thumbnail, Video};
use crate::error::FeedError;

pub const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedVideo {
    pub video_id: String,
    pub title: String,
    pub link: String,
    pub thumbnail: Option<String>,
}

/// Final output of one run, videos already in display order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
    pub seed: String,
    pub videos: Vec<RenderedVideo>,
    pub failed_playlists: Vec<PlaylistId>,
}

/// First `medium` thumbnail, else the first one listed.
pub fn select_thumbnail(thumbnails: &[Thumbnail]) -> Option<&str> {
    thumbnails
        .iter()
        .find(|t| t.quality == "medium")
        .or_else(|| thumbnails.first())
        .map(|t| t.url.as_str())
}

pub fn render_video(video: &Video) -> RenderedVideo {
    RenderedVideo {
        video_id: video.video_id.clone(),
        title: video.title.clone(),
        link: format!("{WATCH_URL}{}", video.video_id),
        thumbnail: select_thumbnail(&video.video_thumbnails).map(str::to_string),
    }
}

pub fn render_videos(videos: &[Video]) -> Vec<RenderedVideo> {
    videos.iter().map(render_video).collect()
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Daily feed</title>
<style>
body{font-family:sans-serif;margin:0;padding:1rem;background:#111;color:#eee}
#videos{display:grid;grid-template-columns:repeat(auto-fill,minmax(320px,1fr));gap:1rem}
.video{display:block;color:inherit;text-decoration:none}
.video img{width:100%;aspect-ratio:16/9;object-fit:cover;background:#222}
.title{margin-top:.4rem}
.notice{padding:2rem;text-align:center;color:#aaa}
</style>
</head>
<body>
"#;

const PAGE_TAIL: &str = "</body>\n</html>\n";

/// Full HTML page for a run outcome. Empty feeds and configuration errors
/// become a visible notice instead of an empty grid.
pub fn render_page(outcome: &Result<Feed, FeedError>) -> String {
    let mut out = String::from(PAGE_HEAD);
    match outcome {
        Ok(feed) if feed.videos.is_empty() => {
            out.push_str(&format!(
                "<div id=\"videos\"></div>\n<p class=\"notice no-content\">{}</p>\n",
                escape_html(&FeedError::NoVideosResolved.to_string())
            ));
        }
        Ok(feed) => {
            out.push_str("<div id=\"videos\">\n");
            for v in &feed.videos {
                out.push_str(&format!(
                    "<a class=\"video\" href=\"{}\" target=\"_blank\" rel=\"noopener\">\n",
                    escape_html(&v.link)
                ));
                if let Some(thumb) = &v.thumbnail {
                    out.push_str(&format!(
                        "<img src=\"{}\" alt=\"\" loading=\"lazy\">\n",
                        escape_html(thumb)
                    ));
                }
                out.push_str(&format!(
                    "<div class=\"title\">{}</div>\n</a>\n",
                    escape_html(&v.title)
                ));
            }
            out.push_str("</div>\n");
            if !feed.failed_playlists.is_empty() {
                out.push_str(&format!(
                    "<p class=\"notice partial\">{} playlist(s) unavailable</p>\n",
                    feed.failed_playlists.len()
                ));
            }
        }
        Err(e) => {
            out.push_str(&format!(
                "<p class=\"notice config-error\">{}</p>\n",
                escape_html(&e.to_string())
            ));
        }
    }
    out.push_str(PAGE_TAIL);
    out
}
