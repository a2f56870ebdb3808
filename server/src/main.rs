mod config;
mod error;
mod media_api;
mod state;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use state::MediaState;

fn app(config: &config::Config) -> Router {
    let static_dir = Path::new(&config.storage.static_dir);
    let state = Arc::new(MediaState::new(&config.storage.media_root));

    Router::new()
        .route("/health", get(health_check))
        .merge(media_api::media_routes())
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(DefaultBodyLimit::max(config.storage.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::Config::load_or_default();

    // RUST_LOG wins over the configured level when set
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.to_lowercase()));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!("Starting media server");
    tracing::info!("Configuration loaded:");
    tracing::info!("  Host: {}, port: {}", config.server.host, config.server.http_port);
    tracing::info!("  Media root: {}", config.storage.media_root);
    tracing::info!("  Static dir: {}", config.storage.static_dir);
    tracing::info!("  Max upload: {} bytes", config.storage.max_upload_bytes);
    tracing::info!("  Log level: {}", config.logging.level);

    let ip_addr = config.server.host.parse::<std::net::IpAddr>().unwrap_or_else(|e| {
        tracing::warn!("Failed to parse host '{}': {}. Using 0.0.0.0", config.server.host, e);
        [0, 0, 0, 0].into()
    });
    let addr = SocketAddr::from((ip_addr, config.server.http_port));

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .serve(app(&config).into_make_service())
        .await?;

    Ok(())
}
