//! Store Catalog API Server
//!
//! REST facade over a store-catalog scraper bridge. Serves search, listing,
//! app detail, developer bundles and categories with hypermedia links.
//!
//! ## Configuration
//!
//! Loaded from TOML (`GPLAY_CONFIG` or the default search paths) with
//! `GPLAY_*` environment overrides. Run with `--example-config` to print a
//! starting configuration file.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use gp_api::{create_router, ApiSettings};
use gp_config::AppConfig;
use gp_provider::{HttpCatalogProvider, HttpProviderConfig};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::args().any(|arg| arg == "--example-config") {
        println!("{}", AppConfig::example_toml());
        return Ok(());
    }

    // Load .env file if present (for local development)
    let _ = dotenvy::dotenv();

    gp_common::logging::init_logging("gp-server");

    info!("Starting Store Catalog API");

    let config = AppConfig::load().context("Failed to load configuration")?;

    let provider = HttpCatalogProvider::new(HttpProviderConfig {
        base_url: config.provider.base_url.clone(),
        timeout: Duration::from_millis(config.provider.timeout_ms),
        connect_timeout: Duration::from_millis(config.provider.connect_timeout_ms),
    })
    .context("Failed to create catalog provider")?;

    let app = create_router(Arc::new(provider), ApiSettings::from_config(&config))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.http.cors_origins));

    log_startup_summary(&config);

    let addr = format!("{}:{}", config.http.host, config.http.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(addr = %addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Store Catalog API shutdown complete");
    Ok(())
}

/// "*" anywhere in the list allows any origin
fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(allowed)
}

fn log_startup_summary(config: &AppConfig) {
    info!("=== Store Catalog API Startup Summary ===");
    info!("  Mount path: {}", if config.mount_path().is_empty() { "/" } else { config.mount_path() });
    info!("  Provider: {}", config.provider.base_url);
    info!("  Provider timeout: {}ms", config.provider.timeout_ms);
    info!("  Lookup defaults: lang={} country={}", config.defaults.lang, config.defaults.country);
    info!("  CORS origins: {}", config.http.cors_origins.join(", "));
    info!("  OpenAPI: /api-doc/openapi.json (Swagger UI at /swagger-ui)");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
