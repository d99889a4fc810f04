//! Manifest-driven backend client.
//!
//! The dashboard knows nothing about the backend's routes at compile time;
//! it discovers them from a declarative manifest served by the backend and
//! synthesizes a callable API surface at runtime.
//!
//! # Architecture
//!
//! - [`ManifestFetcher`]: loads the route manifest with single-flight
//!   caching and owns the synthesized client for one base URL.
//! - [`ApiClient`]: the synthesized surface, a nested
//!   `namespace → action → route` table invocable through
//!   [`ApiClient::invoke`].
//! - [`DashboardConfig`]: base URL and credential material, loaded from a
//!   TOML file with environment overrides.
//!
//! # Example
//!
//! ```rust,ignore
//! use tiller_client::{DashboardConfig, ManifestFetcher};
//!
//! let config = DashboardConfig::load(&config_path)?;
//! let fetcher = ManifestFetcher::new(config.build_http_client()?, config.base_url.clone());
//!
//! let client = fetcher.load().await?;
//! let users = client.invoke("users", "query", None).await?;
//! ```

mod config;
mod error;
mod exec;
mod fetcher;
mod manifest;
mod synth;

pub use config::{ConfigError, DEFAULT_BASE_URL, DashboardConfig};
pub use error::{ClientError, ManifestError};
pub use exec::Params;
pub use fetcher::ManifestFetcher;
pub use manifest::{RouteManifest, RouteSpec};
pub use synth::{ApiClient, Namespace, Route, RouteCall};
