use std::path::Path;
use tracing::{info, warn};

use crate::aggregate::aggregate;
use crate::domain::PlaylistId;
use crate::error::FeedError;
use crate::playlists::load_playlists;
use crate::render::{render_videos, Feed};
use crate::shuffle::{seeded_shuffle, today_seed};
use crate::upstream::MirrorResolver;

/// Aggregates, orders and renders `playlists` with `seed`.
pub async fn build_feed(resolver: &MirrorResolver, playlists: &[PlaylistId], seed: String) -> Feed {
    let agg = aggregate(resolver, playlists).await;
    let ordered = seeded_shuffle(agg.videos.as_slice(), &seed);
    let videos = render_videos(&ordered);
    if videos.is_empty() {
        warn!(error = %FeedError::NoVideosResolved, playlists = playlists.len(), "Empty feed");
    }
    Feed {
        seed,
        videos,
        failed_playlists: agg.failed,
    }
}

/// One page load: reads the playlist file fresh, then builds the feed
/// with today's seed. Only an unreadable playlist file is an error.
pub async fn run(resolver: &MirrorResolver, playlists_file: &Path) -> Result<Feed, FeedError> {
    resolver.metrics().runs_total.inc();
    let playlists = match load_playlists(playlists_file).await {
        Ok(p) => p,
        Err(e) => {
            warn!(error = %e, "Playlist configuration unavailable");
            return Err(e);
        }
    };
    let seed = today_seed(resolver.config().timezone);
    let feed = build_feed(resolver, &playlists, seed).await;
    resolver
        .metrics()
        .last_run_videos
        .set(feed.videos.len() as i64);
    info!(seed = %feed.seed, videos = feed.videos.len(), "Feed run complete");
    Ok(feed)
}
