//! Route manifest wire types.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Declarative description of the backend's callable routes.
///
/// Served at `GET {base}/api/client-manifest`. Keys are
/// `"<resource>.<action>"`; validation of the key shape happens at
/// synthesis time, not here.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct RouteManifest {
    /// Route key → route spec.
    #[serde(default)]
    pub routes: BTreeMap<String, RouteSpec>,
}

/// One route entry as declared by the backend.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RouteSpec {
    /// HTTP method name (`GET`, `POST`, ...).
    pub method: String,
    /// Path relative to the API root; may contain `:name` placeholders.
    pub path: String,
}
