//! Server settings read from the environment.

use std::net::SocketAddr;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_API_PREFIX: &str = "/api";

/// Errors raised while reading server settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: '{value}'")]
    InvalidValue { name: &'static str, value: String },

    #[error("invalid bind address {0}")]
    InvalidAddress(String),
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Mount point of the tour routes; empty serves them at the root.
    pub api_prefix: String,
    /// Serve Swagger UI and the OpenAPI document.
    pub enable_docs: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            enable_docs: true,
        }
    }
}

impl ServerConfig {
    /// Read `HOST`, `PORT`, `API_PREFIX` and `ENABLE_DOCS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = std::env::var("HOST")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.host);

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                name: "PORT",
                value: raw.clone(),
            })?,
            Err(_) => defaults.port,
        };

        let api_prefix = match std::env::var("API_PREFIX") {
            Ok(raw) => normalize_prefix(&raw),
            Err(_) => defaults.api_prefix,
        };

        let enable_docs = match std::env::var("ENABLE_DOCS") {
            Ok(raw) => parse_bool(&raw).ok_or(ConfigError::InvalidValue {
                name: "ENABLE_DOCS",
                value: raw.clone(),
            })?,
            Err(_) => defaults.enable_docs,
        };

        Ok(Self {
            host,
            port,
            api_prefix,
            enable_docs,
        })
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.api_prefix = normalize_prefix(prefix);
        self
    }

    pub fn with_docs(mut self, enable: bool) -> Self {
        self.enable_docs = enable;
        self
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(format!("{}:{}", self.host, self.port)))
    }
}

/// `"api"`, `"/api/"` and `"/api"` all become `"/api"`; `"/"` and `""` become `""`.
pub fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
