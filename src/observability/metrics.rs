//! Metrics collection and exposition.
//!
//! # Metrics
//! - `kit_page_renders_total` (counter): renders by page, outcome
//! - `kit_page_render_duration_seconds` (histogram): render latency by page
//! - `kit_head_script_lookups_total` (counter): cache lookups by result
//! - `kit_collaborator_failures_total` (counter): degraded upstream calls
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Prometheus exporter is opt-in (`observability.metrics_enabled`)

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

/// Record one page render.
pub fn record_page_render(page: &'static str, ok: bool, start: Instant) {
    let outcome = if ok { "ok" } else { "error" };
    metrics::counter!("kit_page_renders_total", "page" => page, "outcome" => outcome).increment(1);
    metrics::histogram!("kit_page_render_duration_seconds", "page" => page)
        .record(start.elapsed().as_secs_f64());
}

/// Record a head-script cache lookup.
pub fn record_head_script_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    metrics::counter!("kit_head_script_lookups_total", "result" => result).increment(1);
}

/// Record a collaborator call that degraded to a fallback.
pub fn record_collaborator_failure(endpoint: &'static str) {
    metrics::counter!("kit_collaborator_failures_total", "endpoint" => endpoint).increment(1);
}
