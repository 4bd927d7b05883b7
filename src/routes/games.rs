//! Game route handlers: each maps one inbound call to one upstream call

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use crate::error::{GatewayError, GAME_FETCH_FAILED, UPSTREAM_CONNECT_FAILED};
use crate::models::NewGame;
use crate::AppState;

pub const GAME_ADDED: &str = "Game successfully added to the upstream API!";

/// GET /game
pub async fn list_games(
    State(state): State<Arc<AppState>>,
) -> Result<Response, GatewayError> {
    let response = state
        .upstream
        .list_games()
        .await
        .map_err(|e| GatewayError::upstream_failure(e, "list_games", UPSTREAM_CONNECT_FAILED))?;

    if response.status != StatusCode::OK {
        return Err(GatewayError::Upstream {
            status: response.status,
            body: response.body,
        });
    }

    let games = response
        .json()
        .map_err(|e| GatewayError::malformed_upstream(e, "list_games"))?;
    Ok(Json(games).into_response())
}

/// GET /game/{name}
pub async fn get_game(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Response, GatewayError> {
    let response = state
        .upstream
        .get_game(&name)
        .await
        .map_err(|e| GatewayError::upstream_failure(e, "get_game", GAME_FETCH_FAILED))?;

    match response.status {
        StatusCode::OK => {
            let game = response
                .json()
                .map_err(|e| GatewayError::malformed_upstream(e, "get_game"))?;
            Ok(Json(game).into_response())
        }
        StatusCode::NOT_FOUND => Err(GatewayError::NotFound { name }),
        StatusCode::BAD_REQUEST => Err(GatewayError::InvalidRequest),
        status => Err(GatewayError::Upstream {
            status,
            body: response.body,
        }),
    }
}

/// POST /game
///
/// The body is read raw so that a missing content type or broken JSON
/// is answered like any other incomplete game: 400, nothing forwarded.
pub async fn add_game(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, GatewayError> {
    let game = serde_json::from_slice::<serde_json::Value>(&body)
        .ok()
        .as_ref()
        .and_then(NewGame::from_body)
        .ok_or(GatewayError::Validation)?;

    let response = state
        .upstream
        .add_game(&game)
        .await
        .map_err(|e| GatewayError::upstream_failure(e, "add_game", UPSTREAM_CONNECT_FAILED))?;

    match response.status {
        StatusCode::OK | StatusCode::CREATED => {
            tracing::info!(name = %game.name, "Game added upstream");
            Ok((StatusCode::CREATED, GAME_ADDED).into_response())
        }
        status => Err(GatewayError::Upstream {
            status,
            body: response.body,
        }),
    }
}
