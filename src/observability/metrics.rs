//! Metrics collection and exposition.
//!
//! # Metrics
//! - `remap_placeholders_retired_total` (counter): placeholder channels removed
//! - `remap_channels_created_total` (counter): channels created on demand
//! - `remap_channels` (gauge): channels currently registered
//! - `remap_requests_total` (counter): hook remaps by outcome (ok, error)

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with an HTTP listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_placeholder_retired() {
    ::metrics::counter!("remap_placeholders_retired_total").increment(1);
}

pub fn record_channel_created() {
    ::metrics::counter!("remap_channels_created_total").increment(1);
}

pub fn record_channel_count(count: usize) {
    ::metrics::gauge!("remap_channels").set(count as f64);
}

pub fn record_remap(outcome: &'static str) {
    ::metrics::counter!("remap_requests_total", "outcome" => outcome).increment(1);
}
