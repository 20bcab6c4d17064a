use catalog_search::{
    api::{auth, build_router, AppState},
    catalog::CatalogStore,
    config::Config,
    error::AppError,
    processing::CatalogProcessor,
    state::create_store,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration; a broken config must never fall back to defaults
    let config = Config::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        AppError::Configuration(e.to_string())
    })?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &config.observability.log_level;
        format!("catalog_search={level},tower_http={level}").into()
    });
    let registry = tracing_subscriber::registry().with(filter);
    if config.observability.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting catalog search v{}", env!("CARGO_PKG_VERSION"));

    // Initialize Prometheus metrics
    if config.observability.prometheus_enabled {
        if let Err(e) = catalog_search::metrics::init_metrics() {
            tracing::warn!("Failed to initialize metrics: {}", e);
            tracing::warn!("Continuing without metrics");
        } else {
            tracing::info!("Prometheus metrics initialized");
        }
    } else {
        tracing::info!("Prometheus metrics disabled in configuration");
    }

    // Initialize history backend
    tracing::info!("History backend: {:?}", config.state.backend);
    let history = create_store(&config.state)?;

    // Load catalog
    let catalog = match &config.catalog.seed_path {
        Some(path) => {
            tracing::info!(path = ?path, "Loading catalog seed file");
            CatalogStore::from_seed_file(path)?
        }
        None => CatalogStore::with_default_seed()?,
    };
    tracing::info!(items = catalog.len(), "Catalog loaded");

    let processor = Arc::new(
        CatalogProcessor::new(Arc::new(catalog), history)
            .with_write_policy(config.history.on_write_failure),
    );
    tracing::info!(
        "History write policy: {:?}",
        config.history.on_write_failure
    );

    let authenticator = auth::from_config(&config.auth)?;
    let state = AppState::new(processor, authenticator);
    let app = build_router(state, &config)?;

    // Start HTTP server
    let http_addr = format!("{}:{}", config.server.host, config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("HTTP API server listening on http://{}", http_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    axum::serve(http_listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, shutting down gracefully...");
}
