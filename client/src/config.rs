//! Dashboard configuration: base URL and credential material.
//!
//! Loaded from an optional TOML file with environment overrides
//! (`TILLER_BASE_URL`, `TILLER_AUTHORIZATION`). A missing file is not an
//! error; an unparseable one is.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Base URL used when neither file nor environment provides one.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

const BASE_URL_VAR: &str = "TILLER_BASE_URL";
const AUTHORIZATION_VAR: &str = "TILLER_AUTHORIZATION";

/// Errors loading or applying configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the config file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file exists but is not valid TOML.
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configured base URL does not parse.
    #[error("invalid base URL `{value}`: {source}")]
    InvalidBaseUrl {
        /// The offending value.
        value: String,
        /// Parse failure detail.
        source: url::ParseError,
    },

    /// Configured authorization value cannot be used as a header.
    #[error("authorization value is not a valid header")]
    InvalidAuthorization,

    /// HTTP client construction failed.
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Raw file shape; everything optional so partial files work.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    base_url: Option<String>,
    authorization: Option<String>,
}

/// Resolved dashboard configuration.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Backend origin every manifest and call targets.
    pub base_url: Url,
    /// Optional `Authorization` header value (`Bearer ...`, `Basic ...`).
    pub authorization: Option<String>,
}

impl DashboardConfig {
    /// Loads configuration from a TOML file, then applies environment
    /// overrides. A missing file falls back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str::<ConfigFile>(&contents)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("config not found at {path:?}, using defaults");
                ConfigFile::default()
            }
            Err(err) => return Err(err.into()),
        };
        Self::resolve(file)
    }

    /// Resolves configuration from defaults and environment only.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(ConfigFile::default())
    }

    fn resolve(file: ConfigFile) -> Result<Self, ConfigError> {
        let mut base_url = file
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut authorization = file.authorization;

        if let Ok(value) = std::env::var(BASE_URL_VAR)
            && !value.trim().is_empty()
        {
            tracing::debug!("applying env override: {BASE_URL_VAR}");
            base_url = value;
        }
        if let Ok(value) = std::env::var(AUTHORIZATION_VAR)
            && !value.trim().is_empty()
        {
            tracing::debug!("applying env override: {AUTHORIZATION_VAR}");
            authorization = Some(value);
        }

        let parsed = Url::parse(&base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            value: base_url,
            source,
        })?;

        Ok(Self {
            base_url: parsed,
            authorization,
        })
    }

    /// Builds the shared HTTP client.
    ///
    /// The cookie store carries session credentials; the configured
    /// authorization value rides as a default header, marked sensitive.
    /// Secrets never appear in request URLs.
    pub fn build_http_client(&self) -> Result<reqwest::Client, ConfigError> {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(authorization) = &self.authorization {
            let mut value = reqwest::header::HeaderValue::from_str(authorization)
                .map_err(|_| ConfigError::InvalidAuthorization)?;
            value.set_sensitive(true);
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }

        Ok(reqwest::Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .build()?)
    }
}
