use crate::api::{handlers, AppState};
use crate::config::{Config, CorsConfig};
use crate::error::{AppError, Result};
use crate::metrics::track_metrics;
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

/// Build the main API router
pub fn build_router(state: AppState, config: &Config) -> Result<Router> {
    let mut router = Router::new()
        // Health endpoint
        .route("/health", get(handlers::health_check))
        // Catalog search
        .route("/api/search", get(handlers::search_items))
        .route("/api/search/increment_tag", post(handlers::increment_tag))
        .route("/api/search/preferences", get(handlers::get_preferences));

    if config.observability.prometheus_enabled {
        router = router.route("/metrics", get(handlers::metrics));
    }

    Ok(router
        // Add state
        .with_state(state)
        // Add middleware
        .layer(middleware::from_fn(track_metrics))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new())
                .on_response(DefaultOnResponse::new()),
        )
        .layer(cors_layer(&config.cors)?))
}

/// CORS policy for the configured browser origins
pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer> {
    if config.allowed_origins.iter().any(|origin| origin.trim() == "*") {
        return Err(AppError::Configuration(
            "CORS origins must be listed explicitly; '*' is not allowed".to_string(),
        ));
    }

    let origins = config
        .allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|e| {
                AppError::Configuration(format!("Invalid CORS origin '{}': {}", origin, e))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(config.allow_credentials)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}
