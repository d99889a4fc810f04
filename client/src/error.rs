//! Error types for the manifest-driven client.

use thiserror::Error;

/// Failure loading or decoding the route manifest.
///
/// Carries owned strings rather than the underlying transport error so a
/// single failed load can be cloned out to every single-flight waiter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ManifestError {
    /// Manifest endpoint returned a non-success status.
    #[error("manifest fetch failed ({status}): {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, when one was readable.
        message: String,
    },

    /// Transport-level failure reaching the manifest endpoint.
    #[error("manifest fetch failed: {0}")]
    Transport(String),

    /// Manifest body did not decode into the expected shape.
    #[error("manifest decode failed: {0}")]
    Decode(String),
}

/// Errors from synthesized API calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The route manifest could not be loaded.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// The namespace or action is not present in the synthesized client.
    #[error("unknown route {namespace}.{action}")]
    UnknownRoute {
        /// Requested namespace.
        namespace: String,
        /// Requested action.
        action: String,
    },

    /// A `:name` placeholder in the route path had no matching parameter.
    #[error("missing path parameter `{name}` for {path}")]
    MissingPathParam {
        /// Placeholder name without the leading `:`.
        name: String,
        /// Route path template the placeholder appears in.
        path: String,
    },

    /// Network request failed.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Backend returned a non-success status.
    #[error("request failed ({status} {status_text})")]
    Request {
        /// HTTP status code.
        status: u16,
        /// Canonical reason text for the status.
        status_text: String,
        /// Message extracted from a JSON error body, when one was present.
        message: Option<String>,
    },

    /// Response body could not be decoded as JSON.
    #[error("response decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}
