use futures::future::join_all;
use tracing::{info, warn};

use crate::domain::{PlaylistId, VideoSet};
use crate::upstream::MirrorResolver;

/// Merged result of one aggregation pass.
#[derive(Debug, Default)]
pub struct Aggregation {
    pub videos: VideoSet,
    /// Playlists for which every instance failed, in input order.
    pub failed: Vec<PlaylistId>,
}

/// Resolves every playlist concurrently and merges the successes.
///
/// All resolutions run to completion before merging; a failed playlist
/// contributes nothing and never cancels its siblings. Merge order is the
/// playlist input order, so the shuffle input does not depend on which
/// instance answered first.
pub async fn aggregate(resolver: &MirrorResolver, playlists: &[PlaylistId]) -> Aggregation {
    let outcomes = join_all(playlists.iter().map(|p| resolver.fetch_playlist(p))).await;
    let mut agg = Aggregation::default();
    for (playlist, outcome) in playlists.iter().zip(outcomes) {
        match outcome {
            Ok(videos) => agg.videos.extend(videos),
            Err(e) => {
                warn!(%playlist, error = %e, "Failed playlist");
                resolver.metrics().playlist_failures_total.inc();
                agg.failed.push(playlist.clone());
            }
        }
    }
    info!(
        playlists = playlists.len(),
        failed = agg.failed.len(),
        videos = agg.videos.len(),
        "Aggregation complete"
    );
    agg
}
