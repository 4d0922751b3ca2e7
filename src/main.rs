//! News Fact-Check Service
//!
//! Accepts a piece of news text, looks up matching fact checks from the Google
//! Fact Check Tools API and enriches each result with the Open Graph image of
//! the cited review page. Without an API key it serves fixed mock data.

mod api;
mod conversion;
mod core;
mod models;

use crate::api::endpoints::{AppState, create_router};
use crate::core::config::Config;
use crate::core::logging::init_logging;
use crate::core::sources::build_source;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Check for --help flag
    if std::env::args().any(|arg| arg == "--help") {
        print_help();
        return;
    }

    dotenv::dotenv().ok();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            eprintln!("Configuration Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.log_level);

    print_startup_banner(&config);

    let source = match build_source(&config) {
        Ok(source) => source,
        Err(e) => {
            error!("Failed to initialize fact-check source: {:#}", e);
            std::process::exit(1);
        }
    };

    info!("Using fact-check source: {}", source.source_name());

    let app_state = AppState {
        config: config.clone(),
        source,
    };

    let app = create_router(app_state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("Server listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully");
        },
        () = terminate => {
            info!("Received SIGTERM, shutting down gracefully");
        },
    }
}

/// Print startup banner with configuration
fn print_startup_banner(config: &Config) {
    println!("🔎 Fact Check Service v{}", env!("CARGO_PKG_VERSION"));
    println!("✅ Configuration loaded successfully");
    println!(
        "   Mode: {}",
        if config.has_credential() {
            "live (Google Fact Check Tools)"
        } else {
            "mock (no API key)"
        }
    );
    println!("   Search URL: {}", config.search_url);
    println!("   Upstream Error Policy: {:?}", config.upstream_error_policy);
    println!(
        "   Image Enrichment: {}",
        if config.enrichment_enabled {
            "Enabled"
        } else {
            "Disabled"
        }
    );
    println!("   Enrichment Concurrency: {}", config.enrichment_concurrency);
    println!("   Search Timeout: {}s", config.search_timeout);
    println!("   Image Timeout: {}s", config.image_timeout);
    println!("   Server: {}:{}", config.host, config.port);
    println!();
}

/// Print help message
fn print_help() {
    println!("Fact Check Service v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: fact-check-service [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --help    Display this help message");
    println!();
    println!("Configuration file:");
    println!("  CONFIG_PATH - Path to TOML config (default: config.toml, optional)");
    println!();
    println!("Environment variables (override the config file, .env is loaded):");
    println!("  GOOGLE_API_KEY / FACT_CHECK_API_KEY - Fact Check Tools API key");
    println!("      (unset: /check-news returns a fixed mock record)");
    println!("  HOST - Server host (default: 0.0.0.0)");
    println!("  PORT - Server port (default: 8000)");
    println!("  LOG_LEVEL - Logging level (default: info)");
    println!();
    println!("Endpoints:");
    println!("  GET  /health      - Liveness check");
    println!("  POST /check-news  - {{\"text\": \"...\"}} -> fact checks with images");
}
