//! HTTP middleware recording request count, duration and in-flight requests.
use super::*;
use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use prometheus::Gauge;
use std::time::Instant;

/// Paths that are not recorded
const EXCLUDED_PATHS: &[&str] = &["/metrics", "/health"];

/// Path label for requests that matched no route
const UNMATCHED_PATH: &str = "unmatched";

/// Holds one unit of an in-flight gauge until dropped
struct InFlightGuard<'a> {
    gauge: &'a Gauge,
}

impl<'a> InFlightGuard<'a> {
    fn new(gauge: &'a Gauge) -> Self {
        gauge.inc();
        Self { gauge }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.gauge.dec();
    }
}

/// Axum middleware function for metrics collection
///
/// # Example
/// ```no_run
/// use axum::{middleware, Router};
/// use catalog_search::metrics::track_metrics;
///
/// let app: Router = Router::new().layer(middleware::from_fn(track_metrics));
/// ```
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_PATH.to_string());

    if EXCLUDED_PATHS.contains(&path.as_str()) {
        return next.run(req).await;
    }

    // Released even when a timeout or disconnect drops this future
    let in_flight = InFlightGuard::new(&HTTP_CONNECTIONS_ACTIVE);

    let start = Instant::now();
    let response = next.run(req).await;

    drop(in_flight);

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    HTTP_REQUESTS_TOTAL
        .with_label_values(&[&method, &path, &status])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[&method, &path])
        .observe(duration);

    response
}
