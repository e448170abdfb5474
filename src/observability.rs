use std::net::SocketAddr;
use std::time::Duration;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: availability queries served. Labels: kind.
pub const QUERIES_TOTAL: &str = "cabsched_queries_total";

/// Histogram: availability query latency in seconds. Labels: kind.
pub const QUERY_DURATION_SECONDS: &str = "cabsched_query_duration_seconds";

/// Counter: assignment upserts rejected by the priority gate.
pub const ASSIGNMENTS_REJECTED_TOTAL: &str = "cabsched_assignments_rejected_total";

/// Install the fmt tracing subscriber and, when a port is given, the
/// Prometheus metrics exporter. Call once from the embedding service.
pub fn init(metrics_port: Option<u16>) {
    let _ = tracing_subscriber::fmt::try_init();
    let Some(port) = metrics_port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}

/// Record one served query under its kind label.
pub(crate) fn record_query(kind: &'static str, elapsed: Duration) {
    metrics::counter!(QUERIES_TOTAL, "kind" => kind).increment(1);
    metrics::histogram!(QUERY_DURATION_SECONDS, "kind" => kind).record(elapsed.as_secs_f64());
}
