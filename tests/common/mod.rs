//! Common test utilities
//!
//! Provides the rustls crypto provider setup for Pact tests and an in-memory
//! Management API that records every call it receives.

#![allow(dead_code, reason = "Each test binary uses a different subset")]

use async_trait::async_trait;
use auth0_resources::management::{
    ApiResult, EventBridgeSink, EventGridSink, Hook, HookApi, HookSecrets, LogStream,
    LogStreamApi, ManagementError, SecretKeySet, Sink,
};
use std::collections::BTreeMap;
use std::sync::{Mutex, Once};

static RUSTLS_INIT: Once = Once::new();

/// Initialize rustls crypto provider for tests
///
/// Uses a `Once` to ensure it's only called once across all tests.
pub fn init_rustls() {
    RUSTLS_INIT.call_once(|| {
        rustls::crypto::ring::default_provider()
            .install_default()
            .expect("Failed to install rustls crypto provider");
    });
}

/// A call received by [`FakeManagementApi`]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateLogStream(LogStream),
    ReadLogStream(String),
    UpdateLogStream(String, LogStream),
    DeleteLogStream(String),
    CreateHook(Hook),
    ReadHook(String),
    UpdateHook(String, Hook),
    DeleteHook(String),
    HookSecrets(String),
    CreateHookSecrets(String, HookSecrets),
    UpdateHookSecrets(String, HookSecrets),
    RemoveHookSecrets(String, Vec<String>),
}

impl Call {
    /// Name of the API operation, as used by [`FakeManagementApi::fail`]
    pub fn operation(&self) -> &'static str {
        match self {
            Call::CreateLogStream(_) => "create_log_stream",
            Call::ReadLogStream(_) => "read_log_stream",
            Call::UpdateLogStream(..) => "update_log_stream",
            Call::DeleteLogStream(_) => "delete_log_stream",
            Call::CreateHook(_) => "create_hook",
            Call::ReadHook(_) => "read_hook",
            Call::UpdateHook(..) => "update_hook",
            Call::DeleteHook(_) => "delete_hook",
            Call::HookSecrets(_) => "hook_secrets",
            Call::CreateHookSecrets(..) => "create_hook_secrets",
            Call::UpdateHookSecrets(..) => "update_hook_secrets",
            Call::RemoveHookSecrets(..) => "remove_hook_secrets",
        }
    }

    /// Whether the call changes remote state
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Call::ReadLogStream(_) | Call::ReadHook(_) | Call::HookSecrets(_)
        )
    }
}

#[derive(Default)]
struct FakeState {
    log_streams: BTreeMap<String, LogStream>,
    hooks: BTreeMap<String, Hook>,
    hook_secrets: BTreeMap<String, HookSecrets>,
    calls: Vec<Call>,
    failures: BTreeMap<&'static str, u16>,
    next_id: u32,
}

impl FakeState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{:016}", self.next_id)
    }
}

/// In-memory Management API
///
/// Behaves like Auth0 where the controllers depend on it: IDs are assigned on
/// creation, missing resources are 404, immutable attributes are rejected on
/// update, and secret values are never returned.
#[derive(Default)]
pub struct FakeManagementApi {
    inner: Mutex<FakeState>,
}

impl std::fmt::Debug for FakeManagementApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeManagementApi").finish_non_exhaustive()
    }
}

fn api_error(status: u16, message: &str) -> ManagementError {
    ManagementError::Api {
        status,
        error: match status {
            400 => "Bad Request",
            404 => "Not Found",
            409 => "Conflict",
            429 => "Too Many Requests",
            _ => "Internal Server Error",
        }
        .to_string(),
        message: message.to_string(),
        error_code: None,
    }
}

impl FakeManagementApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call of `operation` fail with `status`
    pub fn fail(&self, operation: &'static str, status: u16) {
        self.inner.lock().unwrap().failures.insert(operation, status);
    }

    pub fn clear_failures(&self) {
        self.inner.lock().unwrap().failures.clear();
    }

    /// Calls received so far
    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Calls received so far that change remote state
    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    pub fn log_stream(&self, id: &str) -> Option<LogStream> {
        self.inner.lock().unwrap().log_streams.get(id).cloned()
    }

    pub fn hook(&self, id: &str) -> Option<Hook> {
        self.inner.lock().unwrap().hooks.get(id).cloned()
    }

    /// Secret values stored on a hook, which the API itself never reveals
    pub fn secret_values(&self, hook_id: &str) -> HookSecrets {
        self.inner
            .lock()
            .unwrap()
            .hook_secrets
            .get(hook_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Store secrets directly, as if another client had set them
    pub fn seed_secrets(&self, hook_id: &str, secrets: &[(&str, &str)]) {
        let mut state = self.inner.lock().unwrap();
        let stored = state.hook_secrets.entry(hook_id.to_string()).or_default();
        for (key, value) in secrets {
            stored.insert((*key).to_string(), (*value).to_string());
        }
    }

    /// Delete a log stream behind the controller's back
    pub fn remove_log_stream_out_of_band(&self, id: &str) {
        self.inner.lock().unwrap().log_streams.remove(id);
    }

    /// Delete a hook behind the controller's back
    pub fn remove_hook_out_of_band(&self, id: &str) {
        let mut state = self.inner.lock().unwrap();
        state.hooks.remove(id);
        state.hook_secrets.remove(id);
    }

    /// Record a call and return the injected failure for it, if any
    fn record(&self, call: Call) -> ApiResult<()> {
        let mut state = self.inner.lock().unwrap();
        let operation = call.operation();
        state.calls.push(call);
        match state.failures.get(operation) {
            Some(status) => Err(api_error(*status, "injected failure")),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl LogStreamApi for FakeManagementApi {
    async fn create_log_stream(&self, log_stream: &LogStream) -> ApiResult<LogStream> {
        self.record(Call::CreateLogStream(log_stream.clone()))?;
        if log_stream.kind.is_none() {
            return Err(api_error(
                400,
                "Payload validation error: 'Missing required property: type'",
            ));
        }

        let mut state = self.inner.lock().unwrap();
        let id = state.next_id("lst_");
        let mut stored = log_stream.clone();
        stored.id = Some(id.clone());
        stored.status.get_or_insert_with(|| "active".to_string());
        stored.sink = match stored.sink {
            Some(Sink::EventBridge(sink)) => Some(Sink::EventBridge(EventBridgeSink {
                partner_event_source: Some(format!(
                    "aws.partner/auth0.com/tenant-{id}/auth0.logs"
                )),
                ..sink
            })),
            Some(Sink::EventGrid(sink)) => Some(Sink::EventGrid(EventGridSink {
                partner_topic: Some(format!("auth0-logs-{id}")),
                ..sink
            })),
            other => other,
        };
        state.log_streams.insert(id, stored.clone());
        Ok(stored)
    }

    async fn read_log_stream(&self, id: &str) -> ApiResult<LogStream> {
        self.record(Call::ReadLogStream(id.to_string()))?;
        self.inner
            .lock()
            .unwrap()
            .log_streams
            .get(id)
            .cloned()
            .ok_or_else(|| ManagementError::not_found("The log stream does not exist."))
    }

    async fn update_log_stream(&self, id: &str, log_stream: &LogStream) -> ApiResult<LogStream> {
        self.record(Call::UpdateLogStream(id.to_string(), log_stream.clone()))?;
        if log_stream.kind.is_some() {
            return Err(api_error(
                400,
                "Payload validation error: 'Additional properties not allowed: type'",
            ));
        }

        let mut state = self.inner.lock().unwrap();
        let stored = state
            .log_streams
            .get_mut(id)
            .ok_or_else(|| ManagementError::not_found("The log stream does not exist."))?;
        if let Some(name) = &log_stream.name {
            stored.name = Some(name.clone());
        }
        if let Some(status) = &log_stream.status {
            stored.status = Some(status.clone());
        }
        match (&mut stored.sink, &log_stream.sink) {
            (Some(Sink::EventBridge(current)), Some(Sink::EventBridge(update))) => {
                current.account_id = update.account_id.clone();
                current.region = update.region.clone();
            }
            (Some(Sink::EventGrid(current)), Some(Sink::EventGrid(update))) => {
                current.subscription_id = update.subscription_id.clone();
                current.resource_group = update.resource_group.clone();
                current.region = update.region.clone();
            }
            (current, Some(update)) => *current = Some(update.clone()),
            (_, None) => {}
        }
        Ok(stored.clone())
    }

    async fn delete_log_stream(&self, id: &str) -> ApiResult<()> {
        self.record(Call::DeleteLogStream(id.to_string()))?;
        self.inner
            .lock()
            .unwrap()
            .log_streams
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ManagementError::not_found("The log stream does not exist."))
    }
}

#[async_trait]
impl HookApi for FakeManagementApi {
    async fn create_hook(&self, hook: &Hook) -> ApiResult<Hook> {
        self.record(Call::CreateHook(hook.clone()))?;
        if hook.trigger_id.is_none() {
            return Err(api_error(
                400,
                "Payload validation error: 'Missing required property: triggerId'",
            ));
        }

        let mut state = self.inner.lock().unwrap();
        let id = state.next_id("01");
        let mut stored = hook.clone();
        stored.id = Some(id.clone());
        stored.enabled.get_or_insert(true);
        state.hooks.insert(id.clone(), stored.clone());
        state.hook_secrets.insert(id, HookSecrets::new());
        Ok(stored)
    }

    async fn read_hook(&self, id: &str) -> ApiResult<Hook> {
        self.record(Call::ReadHook(id.to_string()))?;
        self.inner
            .lock()
            .unwrap()
            .hooks
            .get(id)
            .cloned()
            .ok_or_else(|| ManagementError::not_found("The hook does not exist."))
    }

    async fn update_hook(&self, id: &str, hook: &Hook) -> ApiResult<Hook> {
        self.record(Call::UpdateHook(id.to_string(), hook.clone()))?;
        if hook.trigger_id.is_some() {
            return Err(api_error(
                400,
                "Payload validation error: 'Additional properties not allowed: triggerId'",
            ));
        }

        let mut state = self.inner.lock().unwrap();
        let stored = state
            .hooks
            .get_mut(id)
            .ok_or_else(|| ManagementError::not_found("The hook does not exist."))?;
        if let Some(name) = &hook.name {
            stored.name = Some(name.clone());
        }
        if let Some(script) = &hook.script {
            stored.script = Some(script.clone());
        }
        if let Some(enabled) = hook.enabled {
            stored.enabled = Some(enabled);
        }
        Ok(stored.clone())
    }

    async fn delete_hook(&self, id: &str) -> ApiResult<()> {
        self.record(Call::DeleteHook(id.to_string()))?;
        let mut state = self.inner.lock().unwrap();
        state.hook_secrets.remove(id);
        state
            .hooks
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ManagementError::not_found("The hook does not exist."))
    }

    async fn hook_secrets(&self, id: &str) -> ApiResult<SecretKeySet> {
        self.record(Call::HookSecrets(id.to_string()))?;
        self.inner
            .lock()
            .unwrap()
            .hook_secrets
            .get(id)
            .map(|secrets| secrets.keys().cloned().collect())
            .ok_or_else(|| ManagementError::not_found("The hook does not exist."))
    }

    async fn create_hook_secrets(&self, id: &str, secrets: &HookSecrets) -> ApiResult<()> {
        self.record(Call::CreateHookSecrets(id.to_string(), secrets.clone()))?;
        let mut state = self.inner.lock().unwrap();
        let stored = state
            .hook_secrets
            .get_mut(id)
            .ok_or_else(|| ManagementError::not_found("The hook does not exist."))?;
        if let Some(existing) = secrets.keys().find(|key| stored.contains_key(*key)) {
            return Err(api_error(409, &format!("Secret '{existing}' already exists")));
        }
        stored.extend(secrets.clone());
        Ok(())
    }

    async fn update_hook_secrets(&self, id: &str, secrets: &HookSecrets) -> ApiResult<()> {
        self.record(Call::UpdateHookSecrets(id.to_string(), secrets.clone()))?;
        let mut state = self.inner.lock().unwrap();
        let stored = state
            .hook_secrets
            .get_mut(id)
            .ok_or_else(|| ManagementError::not_found("The hook does not exist."))?;
        if let Some(missing) = secrets.keys().find(|key| !stored.contains_key(*key)) {
            return Err(api_error(404, &format!("Secret '{missing}' does not exist")));
        }
        stored.extend(secrets.clone());
        Ok(())
    }

    async fn remove_hook_secrets(&self, id: &str, names: &[String]) -> ApiResult<()> {
        self.record(Call::RemoveHookSecrets(id.to_string(), names.to_vec()))?;
        let mut state = self.inner.lock().unwrap();
        let stored = state
            .hook_secrets
            .get_mut(id)
            .ok_or_else(|| ManagementError::not_found("The hook does not exist."))?;
        for name in names {
            stored.remove(name);
        }
        Ok(())
    }
}
