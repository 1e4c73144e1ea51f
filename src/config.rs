use anyhow::{bail, Result};
use chrono_tz::Tz;
use clap::Parser;
use std::{path::PathBuf, sync::Arc, time::Duration};

/// Public Invidious instances tried in this order when none are configured.
pub const DEFAULT_INSTANCES: [&str; 3] = [
    "https://yewtu.be",
    "https://vid.puffyan.us",
    "https://invidious.slipfox.xyz",
];

pub const DEFAULT_MAX_PER_PLAYLIST: usize = 10;

fn default_instances() -> Vec<String> {
    DEFAULT_INSTANCES.iter().map(|s| s.to_string()).collect()
}

fn parse_timezone(s: &str) -> Result<Tz, String> {
    s.parse::<Tz>()
        .map_err(|e| format!("unknown timezone '{s}': {e}"))
}

/// CLI configuration (also reads from env via clap)
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Daily shuffled video feed", long_about = None)]
pub struct Cli {
    /// Server host to bind (env: FEED_HOST)
    #[arg(long, env = "FEED_HOST", default_value_t = String::from("0.0.0.0"))]
    pub host: String,
    /// Server port to bind (env: FEED_PORT)
    #[arg(long, env = "FEED_PORT", default_value_t = 8099)]
    pub port: u16,
    /// Newline-delimited file of playlist URLs, re-read on every page load (env: FEED_PLAYLISTS_FILE)
    #[arg(long, env = "FEED_PLAYLISTS_FILE", default_value = "playlists.txt")]
    pub playlists_file: PathBuf,
    /// Invidious instance base URL, in fallback priority order; repeat or comma separate (env: FEED_INSTANCES)
    #[arg(
        long = "instance",
        env = "FEED_INSTANCES",
        value_delimiter = ',',
        default_values_t = default_instances()
    )]
    pub instances: Vec<String>,
    /// Max videos taken from each playlist (env: FEED_MAX_PER_PLAYLIST)
    #[arg(long, env = "FEED_MAX_PER_PLAYLIST", default_value_t = DEFAULT_MAX_PER_PLAYLIST)]
    pub max_per_playlist: usize,
    /// Per-instance request timeout in seconds (env: FEED_REQUEST_TIMEOUT_SECS)
    #[arg(long, env = "FEED_REQUEST_TIMEOUT_SECS", default_value_t = 10)]
    pub request_timeout_secs: u64,
    /// IANA timezone the daily seed rolls over in; host local time when unset (env: FEED_TIMEZONE)
    #[arg(long, env = "FEED_TIMEZONE", value_parser = parse_timezone)]
    pub timezone: Option<Tz>,
    /// Render the page once into this file and exit instead of serving (env: FEED_OUTPUT)
    #[arg(long, env = "FEED_OUTPUT")]
    pub output: Option<PathBuf>,
}

/// Read-only settings shared by every run.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Instance base URLs without trailing slash; order is fallback priority.
    pub endpoints: Arc<[String]>,
    pub max_per_playlist: usize,
    pub request_timeout: Duration,
    pub timezone: Option<Tz>,
}

impl FeedConfig {
    pub fn new(endpoints: Vec<String>, max_per_playlist: usize) -> Result<Self> {
        let endpoints: Vec<String> = endpoints
            .iter()
            .map(|e| e.trim().trim_end_matches('/').to_string())
            .filter(|e| !e.is_empty())
            .collect();
        if endpoints.is_empty() {
            bail!("at least one instance endpoint is required");
        }
        if max_per_playlist == 0 {
            bail!("max videos per playlist must be at least 1");
        }
        Ok(Self {
            endpoints: endpoints.into(),
            max_per_playlist,
            request_timeout: Duration::from_secs(10),
            timezone: None,
        })
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_timezone(mut self, timezone: Option<Tz>) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn from_cli(cli: &Cli) -> Result<Self> {
        Ok(Self::new(cli.instances.clone(), cli.max_per_playlist)?
            .with_request_timeout(Duration::from_secs(cli.request_timeout_secs))
            .with_timezone(cli.timezone))
    }
}
