//! Configuration management using config.toml plus environment overrides

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

const CONFIG_PATH: &str = "config.toml";
const CONFIG_PATH_ENV: &str = "GATEWAY_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Error reading {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Error parsing {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {value:?}")]
    InvalidEnv { key: &'static str, value: String },

    #[error("base_url must not be empty")]
    EmptyBaseUrl,

    #[error("request_timeout_secs must be greater than zero")]
    ZeroTimeout,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GatewayConfig {
    /// Root of the upstream games API, without trailing slash
    pub base_url: String,

    /// Local listen port
    pub port: u16,

    pub bind_host: String,

    /// CORS origin allowed to call the gateway (None = any origin)
    pub allowed_origin: Option<String>,

    /// Upper bound on a single upstream call, body included
    pub request_timeout_secs: u64,

    /// Accept self-signed upstream certificates (local development only)
    pub accept_invalid_certs: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://localhost:7258".to_string(),
            port: 3000,
            bind_host: "0.0.0.0".to_string(),
            allowed_origin: None,
            request_timeout_secs: 30,
            accept_invalid_certs: false,
        }
    }
}

impl GatewayConfig {
    /// Load config from file (if present) and apply environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| CONFIG_PATH.to_string());
        let config = Self::from_file_or_default(&path)?;
        config.with_env(|key| std::env::var(key).ok())
    }

    /// Missing file means defaults; an unreadable or malformed one is an error.
    pub fn from_file_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply overrides from a variable lookup, then normalize.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("UPSTREAM_BASE_URL") {
            self.base_url = url;
        }
        if let Some(port) = lookup("PORT") {
            self.port = parse_env("PORT", port)?;
        }
        if let Some(host) = lookup("BIND_HOST") {
            self.bind_host = host;
        }
        if let Some(origin) = lookup("ALLOWED_ORIGIN") {
            self.allowed_origin = Some(origin);
        }
        if let Some(secs) = lookup("UPSTREAM_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_env("UPSTREAM_TIMEOUT_SECS", secs)?;
        }
        if let Some(flag) = lookup("UPSTREAM_ACCEPT_INVALID_CERTS") {
            self.accept_invalid_certs = parse_env("UPSTREAM_ACCEPT_INVALID_CERTS", flag)?;
        }

        self.normalize()
    }

    fn normalize(mut self) -> Result<Self, ConfigError> {
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if self.base_url.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        self.allowed_origin = self
            .allowed_origin
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty());
        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { key, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default().with_env(env(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.base_url, "https://localhost:7258");
        assert_eq!(config.allowed_origin, None);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_toml_partial_keeps_defaults() {
        let config = GatewayConfig::from_toml(
            r#"
base_url = "https://games.example.com/api/"
allowed_origin = "http://localhost:5173"
"#,
        )
        .unwrap()
        .with_env(env(&[]))
        .unwrap();

        assert_eq!(config.base_url, "https://games.example.com/api");
        assert_eq!(config.allowed_origin.as_deref(), Some("http://localhost:5173"));
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_env_overrides_file() {
        let config = GatewayConfig::from_toml("port = 4000")
            .unwrap()
            .with_env(env(&[
                ("PORT", "8081"),
                ("UPSTREAM_BASE_URL", "http://127.0.0.1:9000"),
                ("UPSTREAM_TIMEOUT_SECS", "5"),
            ]))
            .unwrap();

        assert_eq!(config.port, 8081);
        assert_eq!(config.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn test_invalid_port_rejected() {
        let err = GatewayConfig::default()
            .with_env(env(&[("PORT", "abc")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { key: "PORT", .. }));
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let err = GatewayConfig::default()
            .with_env(env(&[("UPSTREAM_BASE_URL", "  ")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyBaseUrl));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = GatewayConfig::default()
            .with_env(env(&[("UPSTREAM_TIMEOUT_SECS", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ZeroTimeout));

        let err = GatewayConfig::from_toml("request_timeout_secs = 0")
            .unwrap()
            .with_env(env(&[]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ZeroTimeout));
    }

    #[test]
    fn test_blank_origin_means_any() {
        let config = GatewayConfig::default()
            .with_env(env(&[("ALLOWED_ORIGIN", "")]))
            .unwrap();
        assert_eq!(config.allowed_origin, None);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GatewayConfig::from_file_or_default(dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, GatewayConfig::default());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "port = \"not a number\"").unwrap();
        let err = GatewayConfig::from_file_or_default(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
