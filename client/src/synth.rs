//! Synthesis of a callable client from the route manifest.

use std::collections::BTreeMap;

use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::error::ClientError;
use crate::exec::{self, Params};
use crate::manifest::{RouteManifest, RouteSpec};

/// One synthesized route binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// HTTP method for the call.
    pub method: Method,
    /// Path relative to the API root; may contain `:name` placeholders.
    pub path: String,
}

/// Actions synthesized under one namespace.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    actions: BTreeMap<String, Route>,
}

impl Namespace {
    /// Action names in sorted order.
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    /// Looks up the route bound to an action.
    pub fn route(&self, action: &str) -> Option<&Route> {
        self.actions.get(action)
    }

    /// Number of actions in this namespace.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// True when the namespace has no actions.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Callable API surface synthesized from a route manifest.
///
/// A nested `namespace → action → route` table, each action invocable
/// through [`ApiClient::invoke`] or a bound [`RouteCall`]. Built once per
/// base URL and shared behind an `Arc`; a base-URL change discards the
/// whole client rather than mutating it.
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    namespaces: BTreeMap<String, Namespace>,
}

impl ApiClient {
    /// Builds a client from a fetched manifest.
    ///
    /// Malformed entries (empty key halves, resource segments that do not
    /// normalize to an identifier, unparseable methods) are skipped with a
    /// diagnostic; they never fail the build.
    pub fn from_manifest(http: reqwest::Client, base_url: Url, manifest: &RouteManifest) -> Self {
        Self::from_entries(
            http,
            base_url,
            manifest.routes.iter().map(|(key, spec)| (key.as_str(), spec)),
        )
    }

    /// Builds a client from route entries in iteration order.
    ///
    /// Duplicate `(namespace, action)` pairs resolve last-write-wins in
    /// the order given. [`ApiClient::from_manifest`] feeds entries in
    /// sorted key order, so synthesis output depends only on manifest
    /// content.
    pub fn from_entries<'a, I>(http: reqwest::Client, base_url: Url, entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a RouteSpec)>,
    {
        let mut namespaces: BTreeMap<String, Namespace> = BTreeMap::new();

        for (key, spec) in entries {
            let Some((resource, action)) = split_route_key(key) else {
                tracing::warn!(key, "skipping malformed route key");
                continue;
            };
            let Some(namespace) = normalize_namespace(resource) else {
                tracing::warn!(key, "skipping route: resource is not a usable identifier");
                continue;
            };
            let Ok(method) = spec.method.to_ascii_uppercase().parse::<Method>() else {
                tracing::warn!(key, method = %spec.method, "skipping route: unparseable method");
                continue;
            };

            namespaces.entry(namespace).or_default().actions.insert(
                action.to_string(),
                Route {
                    method,
                    path: spec.path.clone(),
                },
            );
        }

        Self {
            http,
            base_url,
            namespaces,
        }
    }

    /// Namespace names in sorted order.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.namespaces.keys().map(String::as_str)
    }

    /// Looks up a namespace by name.
    pub fn namespace(&self, name: &str) -> Option<&Namespace> {
        self.namespaces.get(name)
    }

    /// Looks up the route bound to `namespace.action`.
    pub fn route(&self, namespace: &str, action: &str) -> Option<&Route> {
        self.namespaces.get(namespace)?.route(action)
    }

    /// Returns a bound callable for `namespace.action`.
    pub fn call(&self, namespace: &str, action: &str) -> Result<RouteCall<'_>, ClientError> {
        let route = self
            .route(namespace, action)
            .ok_or_else(|| ClientError::UnknownRoute {
                namespace: namespace.to_string(),
                action: action.to_string(),
            })?;
        Ok(RouteCall {
            client: self,
            route,
        })
    }

    /// Invokes `namespace.action` with optional parameters.
    ///
    /// Parameters fill `:name` placeholders first; the remainder becomes
    /// the query string (`GET`) or a JSON body (anything else).
    pub async fn invoke(
        &self,
        namespace: &str,
        action: &str,
        params: Option<Params>,
    ) -> Result<Value, ClientError> {
        self.call(namespace, action)?.send(params).await
    }

    /// The shared HTTP client carrying the credential policy.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Base URL this client was synthesized for.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

/// A callable bound to one `(namespace, action)` pair.
#[derive(Debug)]
pub struct RouteCall<'a> {
    client: &'a ApiClient,
    route: &'a Route,
}

impl RouteCall<'_> {
    /// The route this call is bound to.
    pub fn route(&self) -> &Route {
        self.route
    }

    /// Executes the call with optional parameters.
    pub async fn send(&self, params: Option<Params>) -> Result<Value, ClientError> {
        exec::execute(
            self.client.http(),
            self.client.base_url(),
            self.route,
            params,
        )
        .await
    }
}

/// Splits a route key on the first `.`; both halves must be non-empty.
fn split_route_key(key: &str) -> Option<(&str, &str)> {
    let (resource, action) = key.split_once('.')?;
    if resource.is_empty() || action.is_empty() {
        return None;
    }
    Some((resource, action))
}

/// Normalizes a resource segment into a namespace identifier.
///
/// `-` becomes `_`; the result must be `[A-Za-z0-9_]+`.
fn normalize_namespace(resource: &str) -> Option<String> {
    let normalized: String = resource
        .chars()
        .map(|c| if c == '-' { '_' } else { c })
        .collect();
    normalized
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
        .then_some(normalized)
}
