mod ai;
mod assessment;
mod config;
mod content;
mod db;
mod drafts;
mod error;
mod favorites;
mod handlers;
mod routes;
mod state;
mod stories;
mod translate;
mod utils;

use anyhow::Result;
use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("bilingua_backend=debug,tower_http=debug")
        .init();

    // Load configuration - CONFIG_PATH first, then the local conf.yaml
    let config_paths: Vec<String> = vec![
        std::env::var("CONFIG_PATH").ok(),
        Some("conf.yaml".to_string()),
    ]
    .into_iter()
    .flatten()
    .collect();

    let mut config = None;
    let mut loaded_path = String::new();
    for path in &config_paths {
        match Config::load(path) {
            Ok(cfg) => {
                config = Some(cfg);
                loaded_path = path.clone();
                break;
            }
            Err(e) => {
                tracing::debug!("Failed to load config from {}: {}", path, e);
            }
        }
    }

    let config = match config {
        Some(cfg) => {
            info!("Loaded configuration from: {}", loaded_path);
            cfg
        }
        None => {
            info!("No config file found, using defaults");
            Config::default()
        }
    };

    // Ensure the data directory exists
    std::fs::create_dir_all(&config.system_config.data_dir)?;
    info!("Initialized data directory");

    // Initialize app state
    let app_state = AppState::new(config.clone())?;

    // Build application
    let app = Router::new()
        .merge(routes::create_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.system_config.port));
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
