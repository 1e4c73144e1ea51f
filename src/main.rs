use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use daily_feed::{
    config::{Cli, FeedConfig},
    feed,
    handlers::{router, AppState},
    metrics::Metrics,
    render::render_page,
    upstream::{self, MirrorResolver},
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = FeedConfig::from_cli(&cli)?;
    info!(
        instances = %config.endpoints.join(","),
        max_per_playlist = config.max_per_playlist,
        timezone = ?config.timezone,
        "Feed configuration loaded"
    );
    let metrics = Arc::new(Metrics::new());
    let client = upstream::build_client(config.request_timeout)?;
    let resolver = MirrorResolver::new(client, config, metrics);

    if let Some(output) = cli.output.as_ref() {
        let outcome = feed::run(&resolver, &cli.playlists_file).await;
        if let Err(e) = &outcome {
            warn!(error = %e, "Rendering configuration error page");
        }
        tokio::fs::write(output, render_page(&outcome))
            .await
            .with_context(|| format!("writing {}", output.display()))?;
        info!(output = %output.display(), "Feed page written");
        return Ok(());
    }

    if tokio::fs::metadata(&cli.playlists_file).await.is_err() {
        warn!(path = %cli.playlists_file.display(), "Playlist file not found yet; pages will show a configuration notice");
    }

    let state = AppState {
        resolver,
        playlists_file: Arc::new(cli.playlists_file.clone()),
    };
    let app = router(state);

    let addr = format!("{}:{}", cli.host, cli.port);
    info!(%addr, "Starting server");
    let listener = match tokio::net::TcpListener::bind(addr.clone()).await {
        Ok(l) => l,
        Err(e) => {
            warn!("Bind {} failed ({}), falling back to 0.0.0.0", addr, e);
            tokio::net::TcpListener::bind(format!("0.0.0.0:{}", cli.port)).await?
        }
    };
    let shutdown_signal = async {
        use tokio::signal;
        let ctrl_c = async {
            let _ = signal::ctrl_c().await;
        };
        #[cfg(unix)]
        let terminate = async {
            use tokio::signal::unix::{signal, SignalKind};
            if let Ok(mut stream) = signal(SignalKind::terminate()) {
                let _ = stream.recv().await;
            }
        };
        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();
        tokio::select! { _ = ctrl_c => {}, _ = terminate => {} }
        info!("Shutdown signal received");
    };
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;
    Ok(())
}
