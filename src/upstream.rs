//! Client for the upstream games API
//!
//! Each call collects the full response body before returning. The whole
//! exchange (connect, headers, body) is bounded by the request timeout, and
//! dropping the future on timeout cancels the outbound request.

use crate::config::GatewayConfig;
use crate::models::NewGame;
use axum::http::StatusCode;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("request to {url} timed out after {after:?}")]
    Timeout { url: String, after: Duration },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        source: reqwest::Error,
    },
}

/// Status and raw body text of an upstream response
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: String,
}

impl UpstreamResponse {
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
}

impl UpstreamClient {
    pub fn new(config: &GatewayConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            // 3xx is relayed to the caller, never followed
            .redirect(reqwest::redirect::Policy::none())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            request_timeout: config.request_timeout(),
        })
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn list_games_url(&self) -> String {
        format!("{}/games", self.base_url)
    }

    pub fn game_by_name_url(&self, name: &str) -> String {
        format!("{}/game?name={}", self.base_url, urlencoding::encode(name))
    }

    pub fn add_game_url(&self) -> String {
        format!("{}/game", self.base_url)
    }

    /// GET {base}/games
    pub async fn list_games(&self) -> Result<UpstreamResponse, UpstreamError> {
        let url = self.list_games_url();
        self.send(self.http.get(&url), url).await
    }

    /// GET {base}/game?name=<encoded name>
    pub async fn get_game(&self, name: &str) -> Result<UpstreamResponse, UpstreamError> {
        let url = self.game_by_name_url(name);
        self.send(self.http.get(&url), url).await
    }

    /// POST {base}/game with the four game fields as JSON
    pub async fn add_game(&self, game: &NewGame) -> Result<UpstreamResponse, UpstreamError> {
        let url = self.add_game_url();
        self.send(self.http.post(&url).json(game), url).await
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: String,
    ) -> Result<UpstreamResponse, UpstreamError> {
        tracing::debug!(url = %url, "Forwarding request upstream");

        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        let (status, body) = tokio::time::timeout(self.request_timeout, exchange)
            .await
            .map_err(|_| UpstreamError::Timeout {
                url: url.clone(),
                after: self.request_timeout,
            })?
            .map_err(|source| UpstreamError::Transport {
                url: url.clone(),
                source,
            })?;

        tracing::debug!(url = %url, status = %status, "Upstream responded");

        Ok(UpstreamResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> UpstreamClient {
        let config = GatewayConfig {
            base_url: base_url.to_string(),
            ..GatewayConfig::default()
        };
        UpstreamClient::new(&config).unwrap()
    }

    #[test]
    fn test_urls() {
        let client = client("https://games.example.com/");
        assert_eq!(client.base_url(), "https://games.example.com");
        assert_eq!(client.list_games_url(), "https://games.example.com/games");
        assert_eq!(client.add_game_url(), "https://games.example.com/game");
        assert_eq!(
            client.game_by_name_url("Halo"),
            "https://games.example.com/game?name=Halo"
        );
    }

    #[test]
    fn test_name_is_percent_encoded() {
        let client = client("https://games.example.com");
        assert_eq!(
            client.game_by_name_url("Mario & Luigi"),
            "https://games.example.com/game?name=Mario%20%26%20Luigi"
        );
        assert_eq!(
            client.game_by_name_url("what?=#/"),
            "https://games.example.com/game?name=what%3F%3D%23%2F"
        );
    }

    #[test]
    fn test_malformed_body_is_parse_error() {
        let response = UpstreamResponse {
            status: StatusCode::OK,
            body: "{not json".to_string(),
        };
        assert!(response.json().is_err());
    }
}
