//! Game Gateway
//!
//! Relays three REST endpoints to a remote games API:
//! - GET  /game        -> GET  {base}/games
//! - GET  /game/{name} -> GET  {base}/game?name=...
//! - POST /game        -> POST {base}/game

pub mod config;
pub mod cors;
pub mod error;
pub mod models;
pub mod routes;
pub mod upstream;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use config::{ConfigError, GatewayConfig};
pub use error::GatewayError;
pub use upstream::UpstreamClient;

pub struct AppState {
    pub config: GatewayConfig,
    pub upstream: UpstreamClient,
}

impl AppState {
    pub fn new(config: GatewayConfig) -> anyhow::Result<Self> {
        let upstream = UpstreamClient::new(&config)?;
        Ok(Self::with_upstream(config, upstream))
    }

    pub fn with_upstream(config: GatewayConfig, upstream: UpstreamClient) -> Self {
        Self { config, upstream }
    }
}

/// Build the gateway router for the given state
pub fn router(state: Arc<AppState>) -> anyhow::Result<Router> {
    let cors = cors::cors_layer(state.config.allowed_origin.as_deref())?;

    Ok(Router::new()
        .route("/health", get(routes::health))
        .route("/game", get(routes::list_games).post(routes::add_game))
        .route("/game/{name}", get(routes::get_game))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

/// Convenience: state and router from a config
pub fn app(config: GatewayConfig) -> anyhow::Result<Router> {
    router(Arc::new(AppState::new(config)?))
}
