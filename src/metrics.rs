use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

pub struct Metrics {
    pub registry: Registry,
    pub runs_total: IntCounter,
    pub endpoint_requests_total: IntCounterVec,
    pub upstream_request_duration_ms: HistogramVec,
    pub playlist_failures_total: IntCounter,
    pub last_run_videos: IntGauge,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();
        let runs_total = IntCounter::new(
            "feed_runs_total",
            "Total number of feed runs (page loads and one-shot renders)",
        )
        .unwrap();
        let endpoint_requests_total = IntCounterVec::new(
            Opts::new(
                "feed_endpoint_requests_total",
                "Playlist requests per instance by outcome (ok, status, transport, decode, invalid_endpoint)",
            ),
            &["endpoint", "outcome"],
        )
        .unwrap();
        let upstream_request_duration_ms = HistogramVec::new(
            HistogramOpts::new(
                "feed_upstream_request_duration_milliseconds",
                "Instance request latency in milliseconds (label=endpoint)",
            )
            .buckets(vec![
                25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2000.0, 3000.0, 5000.0, 8000.0, 12000.0,
            ]),
            &["endpoint"],
        )
        .unwrap();
        let playlist_failures_total = IntCounter::new(
            "feed_playlist_failures_total",
            "Playlists for which every configured instance failed",
        )
        .unwrap();
        let last_run_videos = IntGauge::new(
            "feed_last_run_videos",
            "Number of distinct videos rendered by the most recent run",
        )
        .unwrap();
        registry.register(Box::new(runs_total.clone())).unwrap();
        registry
            .register(Box::new(endpoint_requests_total.clone()))
            .unwrap();
        registry
            .register(Box::new(upstream_request_duration_ms.clone()))
            .unwrap();
        registry
            .register(Box::new(playlist_failures_total.clone()))
            .unwrap();
        registry
            .register(Box::new(last_run_videos.clone()))
            .unwrap();
        Self {
            registry,
            runs_total,
            endpoint_requests_total,
            upstream_request_duration_ms,
            playlist_failures_total,
            last_run_videos,
        }
    }

    pub fn on_endpoint_result(&self, endpoint: &str, outcome: &str, elapsed_ms: f64) {
        self.endpoint_requests_total
            .with_label_values(&[endpoint, outcome])
            .inc();
        self.upstream_request_duration_ms
            .with_label_values(&[endpoint])
            .observe(elapsed_ms);
    }
}

pub fn encode_text(metrics: &Metrics) -> Result<String, String> {
    let encoder = TextEncoder::new();
    let metric_families = metrics.registry.gather();
    let mut buf = Vec::new();
    encoder
        .encode(&metric_families, &mut buf)
        .map_err(|e| e.to_string())?;
    String::from_utf8(buf).map_err(|_| "utf8 error".to_string())
}
