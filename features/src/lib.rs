//! Capability probing for optional dashboard sections.
//!
//! The backend framework is pluggable: a deployment may or may not mount
//! user management, ban management, or entitlements. Rather than
//! configuring this out of band, the dashboard probes the capability
//! endpoints once and shows only the sections that exist.
//!
//! Probe semantics are fail-closed: "not found" means absent, any other
//! status (including server errors) means present, and a transport-level
//! failure also counts as absent.

use serde::Deserialize;
use tiller_client::ApiClient;

/// Optional capabilities the backend may expose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureFlags {
    /// User management endpoints are mounted.
    pub users: bool,
    /// Ban management endpoints are mounted.
    pub bans: bool,
    /// Entitlement endpoints are mounted.
    pub entitlements: bool,
    /// True when the entitlements UI must not offer writes.
    pub entitlements_readonly: bool,
}

/// Probe endpoints, relative to the base URL.
const USERS_PROBE: &str = "/api/users";
const BANS_PROBE: &str = "/api/bans";
const ENTITLEMENTS_PROBE: &str = "/api/entitlements";

#[derive(Debug, Deserialize)]
struct EntitlementsStatus {
    #[serde(default)]
    readonly: bool,
}

/// Probes the backend for optional capabilities.
///
/// The three existence probes run concurrently. When entitlements is
/// present, one follow-up call through the synthesized client resolves
/// read/write mode; any failure there defaults to read-only.
pub async fn detect(client: &ApiClient) -> FeatureFlags {
    let (users, bans, entitlements) = tokio::join!(
        probe(client, USERS_PROBE),
        probe(client, BANS_PROBE),
        probe(client, ENTITLEMENTS_PROBE),
    );

    let entitlements_readonly = if entitlements {
        entitlements_readonly(client).await
    } else {
        false
    };

    FeatureFlags {
        users,
        bans,
        entitlements,
        entitlements_readonly,
    }
}

/// One existence check against `{base}{path}`.
async fn probe(client: &ApiClient, probe_path: &str) -> bool {
    let url = format!(
        "{}{probe_path}",
        client.base_url().as_str().trim_end_matches('/')
    );
    match client.http().get(&url).send().await {
        Ok(response) => {
            let present = response.status() != reqwest::StatusCode::NOT_FOUND;
            tracing::debug!(path = probe_path, status = %response.status(), present, "capability probe");
            present
        }
        Err(err) => {
            tracing::debug!(path = probe_path, error = %err, "capability probe unreachable, treating as absent");
            false
        }
    }
}

/// Resolves entitlements read/write mode; defaults to read-only on any
/// failure, including an undecodable status body.
async fn entitlements_readonly(client: &ApiClient) -> bool {
    match client.invoke("entitlements", "status", None).await {
        Ok(value) => serde_json::from_value::<EntitlementsStatus>(value)
            .map(|status| status.readonly)
            .unwrap_or(true),
        Err(err) => {
            tracing::debug!(error = %err, "entitlements status unavailable, defaulting to read-only");
            true
        }
    }
}
