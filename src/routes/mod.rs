//! REST API routes

pub mod games;

pub use games::*;

/// Liveness probe; never touches the upstream
pub async fn health() -> &'static str {
    "OK"
}
