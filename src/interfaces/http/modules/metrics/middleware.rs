//! HTTP request metrics middleware
//!
//! Records `http_requests_total` (counter, labels `method`, `path`, `status`)
//! and `http_request_duration_seconds` (histogram, labels `method`, `path`).

use std::time::Instant;

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};

/// Label used for requests that matched no route.
///
/// Raw URIs are never used as labels so unknown paths cannot grow the
/// series count without bound.
pub const UNMATCHED_PATH: &str = "unmatched";

pub async fn http_metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_PATH.to_string());

    let start = Instant::now();
    let response = next.run(request).await;
    let elapsed = start.elapsed().as_secs_f64();

    let status = response.status().as_u16().to_string();
    metrics::counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);
    metrics::histogram!("http_request_duration_seconds", "method" => method, "path" => path)
        .record(elapsed);

    response
}
