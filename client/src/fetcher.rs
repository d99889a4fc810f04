//! Manifest fetching with single-flight caching.
//!
//! The fetcher owns the synthesized [`ApiClient`] for one base URL. Loads
//! go through an explicit state machine — `Idle`, `Pending`, `Ready`,
//! `Failed` — so "retry after failure" is a modeled transition rather than
//! a side effect of clearing a field.

use std::sync::{Arc, Mutex, PoisonError};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use url::Url;

use crate::error::ManifestError;
use crate::manifest::RouteManifest;
use crate::synth::ApiClient;

type LoadFuture = Shared<BoxFuture<'static, Result<Arc<ApiClient>, ManifestError>>>;

/// Loads the route manifest and caches the synthesized client.
///
/// At most one manifest request is outstanding per fetcher; concurrent
/// callers share the pending outcome. A failed load parks the fetcher in
/// `Failed` and the next [`ManifestFetcher::load`] retries. No timeout is
/// applied beyond the transport's defaults.
pub struct ManifestFetcher {
    http: reqwest::Client,
    state: Mutex<FetchState>,
}

struct FetchState {
    base_url: Url,
    /// Bumped by every base-URL change; a resolving load only commits its
    /// outcome while its epoch is still current.
    epoch: u64,
    load: LoadState,
}

enum LoadState {
    Idle,
    Pending(LoadFuture),
    Ready(Arc<ApiClient>),
    Failed(ManifestError),
}

impl ManifestFetcher {
    /// Creates a fetcher over the given HTTP client and base URL.
    ///
    /// The HTTP client carries the credential policy (cookie store,
    /// authorization header) and is shared with every client synthesized
    /// by this fetcher.
    pub fn new(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            state: Mutex::new(FetchState {
                base_url,
                epoch: 0,
                load: LoadState::Idle,
            }),
        }
    }

    /// Loads the manifest and returns the synthesized client.
    ///
    /// Concurrent callers collapse onto one outstanding fetch and share
    /// its outcome. After a failure every waiter receives the same error
    /// and the next call starts a fresh fetch.
    pub async fn load(&self) -> Result<Arc<ApiClient>, ManifestError> {
        let (future, epoch) = {
            let mut state = self.lock_state();
            match &state.load {
                LoadState::Ready(client) => return Ok(client.clone()),
                LoadState::Pending(future) => (future.clone(), state.epoch),
                LoadState::Idle | LoadState::Failed(_) => {
                    let future = fetch_and_synthesize(self.http.clone(), state.base_url.clone())
                        .boxed()
                        .shared();
                    state.load = LoadState::Pending(future.clone());
                    (future, state.epoch)
                }
            }
        };

        let outcome = future.await;

        // Commit the outcome unless the base URL changed underneath us;
        // a stale epoch means the result belongs to a discarded origin.
        let mut state = self.lock_state();
        if state.epoch == epoch && matches!(state.load, LoadState::Pending(_)) {
            state.load = match &outcome {
                Ok(client) => LoadState::Ready(client.clone()),
                Err(err) => LoadState::Failed(err.clone()),
            };
        }
        outcome
    }

    /// Replaces the base URL, discarding the cached client and any pending
    /// load. Manifests are origin-specific and never reused across
    /// origins.
    pub fn set_base_url(&self, base_url: Url) {
        let mut state = self.lock_state();
        tracing::debug!(from = %state.base_url, to = %base_url, "discarding manifest cache");
        state.base_url = base_url;
        state.epoch += 1;
        state.load = LoadState::Idle;
    }

    /// The base URL the next load will target.
    pub fn base_url(&self) -> Url {
        self.lock_state().base_url.clone()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, FetchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Fetches `{base}/api/client-manifest` and synthesizes the client.
async fn fetch_and_synthesize(
    http: reqwest::Client,
    base_url: Url,
) -> Result<Arc<ApiClient>, ManifestError> {
    let url = manifest_url(&base_url);
    tracing::debug!(%url, "loading route manifest");

    let response = http
        .get(&url)
        .send()
        .await
        .map_err(|err| ManifestError::Transport(err.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ManifestError::Status {
            status: status.as_u16(),
            message,
        });
    }

    let manifest: RouteManifest = response
        .json()
        .await
        .map_err(|err| ManifestError::Decode(err.to_string()))?;

    Ok(Arc::new(ApiClient::from_manifest(http, base_url, &manifest)))
}

fn manifest_url(base_url: &Url) -> String {
    format!("{}/api/client-manifest", base_url.as_str().trim_end_matches('/'))
}
