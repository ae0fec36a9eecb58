// Telemetry module for structured logging and metrics

use anyhow::Result;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const REQUESTS_TOTAL: &str = "catalog_requests_total";
pub const REQUEST_DURATION: &str = "catalog_request_duration_seconds";
pub const AD_SLOT_REQUESTS_TOTAL: &str = "ad_slot_requests_total";

/// Initialize structured logging
///
/// `RUST_LOG` takes precedence over the configured level. JSON output carries
/// the current span (route, request id) on every line.
pub fn init_logging(log_level: &str, json: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .map_err(|e| anyhow::anyhow!("Failed to create env filter: {}", e))?;

    let layer = if json {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(env_filter)
            .boxed()
    } else {
        fmt::layer().with_target(false).with_filter(env_filter).boxed()
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {}", e))?;

    tracing::info!(log_level = log_level, json = json, "Structured logging initialized");
    Ok(())
}

/// Install the Prometheus exporter on `0.0.0.0:{metrics_port}` and register
/// metric descriptions.
pub fn init_metrics(metrics_port: u16) -> Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", metrics_port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid metrics port: {}", e))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus exporter: {}", e))?;

    describe_counter!(REQUESTS_TOTAL, "Catalog requests by route and status code");
    describe_histogram!(
        REQUEST_DURATION,
        metrics::Unit::Seconds,
        "Catalog request handling time by route"
    );
    describe_counter!(AD_SLOT_REQUESTS_TOTAL, "Ad slot lookups by status code");

    tracing::info!(port = metrics_port, "Prometheus metrics exporter initialized");
    Ok(())
}

/// Record one catalog request
pub fn record_request(route: &'static str, status: u16, elapsed: Duration) {
    counter!(REQUESTS_TOTAL, "route" => route, "status" => status.to_string()).increment(1);
    histogram!(REQUEST_DURATION, "route" => route).record(elapsed.as_secs_f64());
}

/// Record one ad slot lookup
pub fn record_ad_slot_request(status: u16) {
    counter!(AD_SLOT_REQUESTS_TOTAL, "status" => status.to_string()).increment(1);
}
