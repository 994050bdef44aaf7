//! HTTP metrics middleware and Prometheus exposition.

use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use lazy_static::lazy_static;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

lazy_static! {
    static ref PROMETHEUS_HANDLE: PrometheusHandle = PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus metrics recorder");
}

/// Forces recorder installation. Call once at startup so requests recorded
/// before the first `/metrics` scrape are not lost.
pub fn init_metrics() {
    lazy_static::initialize(&PROMETHEUS_HANDLE);
}

/// Middleware recording request counts and latency per method/path/status.
pub async fn metrics_middleware(req: Request<Body>, next: Next) -> Response {
    let method = req.method().to_string();
    // Avoid unbounded label cardinality: slugs collapse into one label.
    let path = if req.uri().path().starts_with("/api") || req.uri().path() == "/metrics" {
        req.uri().path().to_string()
    } else {
        "/{slug}".to_string()
    };

    let start = Instant::now();
    let response = next.run(req).await;
    let elapsed = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);
    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path
    )
    .record(elapsed);

    response
}

/// GET /metrics
///
/// Renders the Prometheus exposition format.
pub async fn metrics_handler() -> impl IntoResponse {
    PROMETHEUS_HANDLE.render()
}
