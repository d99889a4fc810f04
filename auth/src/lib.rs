//! Auth-configuration editing flow.
//!
//! Drives the dashboard's auth settings editor against the synthesized
//! client: view the active configuration, edit a draft, test it, save it,
//! or revert runtime configuration back to environment-derived settings.
//!
//! The editor is an explicit state machine — `Viewing`, `Editing`,
//! `Testing`, `Saving` — with every transition driven by one method.
//! `Editing` always derives its form defaults from the most recently
//! loaded status; a failed save keeps the draft and stays in `Editing`;
//! a failed revert leaves the state untouched.

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tiller_client::{ApiClient, ClientError};

const AUTH_NAMESPACE: &str = "auth";
const STATUS_ACTION: &str = "status";
const TEST_ACTION: &str = "test";
const CONFIGURE_ACTION: &str = "configure";
const RESET_ACTION: &str = "reset";

/// Errors from the auth editor flow.
#[derive(Debug, Error)]
pub enum AuthFlowError {
    /// Operation is not valid in the current editor state.
    #[error("operation not valid while {0}")]
    InvalidState(&'static str),

    /// A backend call failed.
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Where the active auth configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    /// Saved through the dashboard at runtime.
    Runtime,
    /// Derived from the backend's environment.
    Environment,
}

/// Backend-reported auth configuration status.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatus {
    /// Origin of the active configuration.
    pub source: ConfigSource,
    /// Active provider settings; the field set is backend-defined.
    #[serde(default)]
    pub settings: Map<String, Value>,
}

/// Draft auth settings being edited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthForm {
    /// Draft provider settings.
    pub settings: Map<String, Value>,
}

/// Outcome of a connectivity test run from the editor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestOutcome {
    /// Whether the draft settings authenticated successfully.
    pub ok: bool,
    /// Backend-provided detail.
    #[serde(default)]
    pub message: Option<String>,
}

/// Editor states.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorState {
    /// Showing the active configuration.
    Viewing(AuthStatus),
    /// A draft is open for editing.
    Editing(AuthForm),
    /// A connectivity test is in flight for the draft.
    Testing(AuthForm),
    /// The draft is being saved.
    Saving(AuthForm),
}

/// State machine for the auth-configuration editor.
pub struct AuthConfigEditor<'a> {
    client: &'a ApiClient,
    /// Most recently loaded status; `Editing` derives its defaults here.
    last_status: AuthStatus,
    state: EditorState,
}

impl<'a> AuthConfigEditor<'a> {
    /// Loads the current auth status and starts in `Viewing`.
    pub async fn load(client: &'a ApiClient) -> Result<Self, ClientError> {
        let status = fetch_status(client).await?;
        Ok(Self {
            client,
            last_status: status.clone(),
            state: EditorState::Viewing(status),
        })
    }

    /// Current editor state.
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Most recently loaded status, regardless of state.
    pub fn last_status(&self) -> &AuthStatus {
        &self.last_status
    }

    /// Reloads the status while `Viewing`.
    pub async fn refresh(&mut self) -> Result<(), AuthFlowError> {
        if !matches!(self.state, EditorState::Viewing(_)) {
            return Err(AuthFlowError::InvalidState(self.state_name()));
        }
        let status = fetch_status(self.client).await?;
        self.last_status = status.clone();
        self.state = EditorState::Viewing(status);
        Ok(())
    }

    /// Enters `Editing`, deriving form defaults from the most recently
    /// loaded status.
    pub fn begin_edit(&mut self) -> Result<(), AuthFlowError> {
        if !matches!(self.state, EditorState::Viewing(_)) {
            return Err(AuthFlowError::InvalidState(self.state_name()));
        }
        self.state = EditorState::Editing(AuthForm {
            settings: self.last_status.settings.clone(),
        });
        Ok(())
    }

    /// Mutable access to the open draft, if any.
    pub fn draft_mut(&mut self) -> Option<&mut AuthForm> {
        match &mut self.state {
            EditorState::Editing(form) => Some(form),
            _ => None,
        }
    }

    /// Abandons the draft and returns to viewing the last loaded status.
    pub fn cancel_edit(&mut self) -> Result<(), AuthFlowError> {
        if !matches!(self.state, EditorState::Editing(_)) {
            return Err(AuthFlowError::InvalidState(self.state_name()));
        }
        self.state = EditorState::Viewing(self.last_status.clone());
        Ok(())
    }

    /// Runs a connectivity test with the draft settings.
    ///
    /// The editor passes through `Testing` and returns to `Editing` with
    /// the same draft whether the test passes, fails, or errors.
    pub async fn test(&mut self) -> Result<TestOutcome, AuthFlowError> {
        let form = match &self.state {
            EditorState::Editing(form) => form.clone(),
            _ => return Err(AuthFlowError::InvalidState(self.state_name())),
        };

        self.state = EditorState::Testing(form.clone());
        let result = self
            .client
            .invoke(AUTH_NAMESPACE, TEST_ACTION, Some(form.settings.clone()))
            .await;
        self.state = EditorState::Editing(form);

        let value = result?;
        Ok(serde_json::from_value(value).map_err(ClientError::from)?)
    }

    /// Saves the draft settings.
    ///
    /// On success the editor reloads the status and returns to `Viewing`;
    /// on failure it stays in `Editing` with the draft intact and the
    /// error surfaced.
    pub async fn save(&mut self) -> Result<&AuthStatus, AuthFlowError> {
        let form = match &self.state {
            EditorState::Editing(form) => form.clone(),
            _ => return Err(AuthFlowError::InvalidState(self.state_name())),
        };

        self.state = EditorState::Saving(form.clone());
        match self
            .client
            .invoke(AUTH_NAMESPACE, CONFIGURE_ACTION, Some(form.settings.clone()))
            .await
        {
            Ok(_) => {
                let status = match fetch_status(self.client).await {
                    Ok(status) => status,
                    Err(err) => {
                        tracing::warn!(error = %err, "status reload after save failed, deriving from saved draft");
                        AuthStatus {
                            source: ConfigSource::Runtime,
                            settings: form.settings,
                        }
                    }
                };
                self.last_status = status.clone();
                self.state = EditorState::Viewing(status);
                Ok(&self.last_status)
            }
            Err(err) => {
                self.state = EditorState::Editing(form);
                Err(err.into())
            }
        }
    }

    /// Reverts runtime configuration to environment-derived settings.
    ///
    /// Valid only while `Viewing` a runtime-configured status. On success
    /// the editor shows the environment-derived status; on failure the
    /// state is unchanged.
    pub async fn revert_to_environment(&mut self) -> Result<&AuthStatus, AuthFlowError> {
        match &self.state {
            EditorState::Viewing(status) if status.source == ConfigSource::Runtime => {}
            EditorState::Viewing(_) => {
                return Err(AuthFlowError::InvalidState(
                    "viewing environment-derived configuration",
                ));
            }
            _ => return Err(AuthFlowError::InvalidState(self.state_name())),
        }

        self.client.invoke(AUTH_NAMESPACE, RESET_ACTION, None).await?;
        let status = fetch_status(self.client).await?;
        self.last_status = status.clone();
        self.state = EditorState::Viewing(status);
        Ok(&self.last_status)
    }

    fn state_name(&self) -> &'static str {
        match &self.state {
            EditorState::Viewing(_) => "viewing",
            EditorState::Editing(_) => "editing",
            EditorState::Testing(_) => "testing",
            EditorState::Saving(_) => "saving",
        }
    }
}

async fn fetch_status(client: &ApiClient) -> Result<AuthStatus, ClientError> {
    let value = client.invoke(AUTH_NAMESPACE, STATUS_ACTION, None).await?;
    Ok(serde_json::from_value(value)?)
}
