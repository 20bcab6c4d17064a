//! Prometheus metrics for the catalog search service.
//!
//! Covers HTTP traffic and every catalog flow, including the history writes
//! those flows produce.
//!
//! # Example
//! ```no_run
//! use catalog_search::metrics::SEARCHES_TOTAL;
//!
//! SEARCHES_TOTAL.with_label_values(&["hit"]).inc();
//! ```

pub mod middleware;

pub use middleware::track_metrics;

use lazy_static::lazy_static;
use prometheus::{CounterVec, Gauge, HistogramOpts, HistogramVec, Opts, Registry};

const NAMESPACE: &str = "catalog_search";

lazy_static! {
    /// Global Prometheus registry for all metrics
    pub static ref PROMETHEUS_REGISTRY: Registry = Registry::new();

    // ============================================================================
    // HTTP Metrics
    // ============================================================================

    /// Total number of HTTP requests received
    ///
    /// Labels: method, path, status_code
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests")
            .namespace(NAMESPACE),
        &["method", "path", "status_code"]
    ).expect("Failed to create HTTP_REQUESTS_TOTAL metric");

    /// HTTP request duration in seconds
    ///
    /// Labels: method, path
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request duration in seconds"
        )
        .namespace(NAMESPACE)
        .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]),
        &["method", "path"]
    ).expect("Failed to create HTTP_REQUEST_DURATION_SECONDS metric");

    /// Number of in-flight HTTP requests
    pub static ref HTTP_CONNECTIONS_ACTIVE: Gauge = Gauge::with_opts(
        Opts::new("http_connections_active", "Number of in-flight HTTP requests")
            .namespace(NAMESPACE)
    ).expect("Failed to create HTTP_CONNECTIONS_ACTIVE metric");

    // ============================================================================
    // Catalog Metrics
    // ============================================================================

    /// Searches served
    ///
    /// Labels: outcome (hit, miss, empty)
    pub static ref SEARCHES_TOTAL: CounterVec = CounterVec::new(
        Opts::new("searches_total", "Total number of catalog searches")
            .namespace(NAMESPACE),
        &["outcome"]
    ).expect("Failed to create SEARCHES_TOTAL metric");

    /// Tag boosts attempted
    ///
    /// Labels: status (ok, not_found, failed)
    pub static ref TAG_BOOSTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("tag_boosts_total", "Total number of tag boosts")
            .namespace(NAMESPACE),
        &["status"]
    ).expect("Failed to create TAG_BOOSTS_TOTAL metric");

    /// History appends
    ///
    /// Labels: kind (search, boost), status (ok, failed)
    pub static ref HISTORY_WRITES_TOTAL: CounterVec = CounterVec::new(
        Opts::new("history_writes_total", "Total number of history appends")
            .namespace(NAMESPACE),
        &["kind", "status"]
    ).expect("Failed to create HISTORY_WRITES_TOTAL metric");

    /// Preference profile reads
    ///
    /// Labels: outcome (profile, no_history, error)
    pub static ref PREFERENCE_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("preference_requests_total", "Total number of preference reads")
            .namespace(NAMESPACE),
        &["outcome"]
    ).expect("Failed to create PREFERENCE_REQUESTS_TOTAL metric");
}

fn register<C>(collector: C) -> Result<(), prometheus::Error>
where
    C: prometheus::core::Collector + 'static,
{
    match PROMETHEUS_REGISTRY.register(Box::new(collector)) {
        Ok(()) | Err(prometheus::Error::AlreadyReg) => Ok(()),
        Err(e) => Err(e),
    }
}

/// Register every metric with the global registry.
///
/// Safe to call more than once.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    register(HTTP_REQUESTS_TOTAL.clone())?;
    register(HTTP_REQUEST_DURATION_SECONDS.clone())?;
    register(HTTP_CONNECTIONS_ACTIVE.clone())?;

    register(SEARCHES_TOTAL.clone())?;
    register(TAG_BOOSTS_TOTAL.clone())?;
    register(HISTORY_WRITES_TOTAL.clone())?;
    register(PREFERENCE_REQUESTS_TOTAL.clone())?;

    tracing::info!("Prometheus metrics initialized successfully");
    Ok(())
}

/// Generate Prometheus text format metrics
pub fn gather_metrics() -> String {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = PROMETHEUS_REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::from("# Error encoding metrics\n");
    }

    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!("Failed to convert metrics to string: {}", e);
        String::from("# Error converting metrics\n")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        assert!(init_metrics().is_ok());
        assert!(init_metrics().is_ok());
    }

    #[test]
    fn test_catalog_counters() {
        init_metrics().unwrap();
        TAG_BOOSTS_TOTAL.with_label_values(&["not_found"]).inc();

        let value = TAG_BOOSTS_TOTAL.with_label_values(&["not_found"]).get();
        assert!(value >= 1.0);
        assert!(gather_metrics().contains("catalog_search_tag_boosts_total"));
    }
}
