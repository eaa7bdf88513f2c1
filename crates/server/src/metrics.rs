use once_cell::sync::Lazy;
use prometheus::{register_histogram, register_int_counter, Encoder, Histogram, IntCounter, TextEncoder};

// Prometheus metrics (default registry)
pub static CLICKS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "clicker_clicks_total",
        "Total successful increments"
    )
    .expect("register clicks_total")
});

pub static STORAGE_FAULTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "clicker_storage_faults_total",
        "Total requests answered with a server fault"
    )
    .expect("register storage_faults_total")
});

pub static CLICK_DURATION: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "clicker_click_duration_seconds",
        "Increment latency in seconds, including the database commit",
        vec![0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]
    )
    .expect("register click_duration")
});

/// Touch every metric so it shows up in `/metrics` before the first click.
pub fn register_all() {
    Lazy::force(&CLICKS_TOTAL);
    Lazy::force(&STORAGE_FAULTS_TOTAL);
    Lazy::force(&CLICK_DURATION);
}

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
