//! Roundkeeper API server entry point.

use std::error::Error;
use std::sync::{Arc, Mutex};

use axum::Router;
use roundkeeper_api::config::ServerConfig;
use roundkeeper_api::error::AppError;
use roundkeeper_api::routes;
use roundkeeper_api::state::AppState;
use roundkeeper_core::clock::SystemClock;
use roundkeeper_core::rng::SystemRng;
use roundkeeper_event_store::memory_event_repository::InMemoryEventRepository;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Roundkeeper API server");

    let config = ServerConfig::from_env()?;

    // Tabs live for the lifetime of the process.
    let app_state = AppState::new(
        Arc::new(SystemClock),
        Arc::new(Mutex::new(SystemRng::from_os())),
        Arc::new(InMemoryEventRepository::new()),
    );

    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/tabs", routes::tabs::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(AppError::from)?;

    axum::serve(listener, app).await.map_err(AppError::from)?;

    Ok(())
}
