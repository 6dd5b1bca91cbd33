//! # Log Stream Controller
//!
//! Maps a declared [`LogStreamSpec`] onto `/api/v2/log-streams`.

use super::{sink, ResourceController, ResourceData};
use crate::management::{LogStream, LogStreamApi};
use crate::schema::LogStreamSpec;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct LogStreamController;

impl LogStreamController {
    /// Build the request body from the declared configuration
    ///
    /// The stream type is only accepted on creation.
    #[must_use]
    pub fn expand(config: &LogStreamSpec, creating: bool) -> LogStream {
        LogStream {
            id: None,
            name: Some(config.name.clone()),
            kind: creating.then(|| config.kind.clone()),
            status: config.status.clone(),
            sink: sink::to_remote(&config.kind, &config.sink),
        }
    }

    /// Fold a remote log stream into the known state
    fn flatten(remote: LogStream, mut state: LogStreamSpec) -> LogStreamSpec {
        if let Some(name) = remote.name {
            state.name = name;
        }
        if let Some(kind) = remote.kind {
            state.kind = kind;
        }
        if remote.status.is_some() {
            state.status = remote.status;
        }
        if let Some(remote_sink) = &remote.sink {
            let (_, block) = sink::from_remote(remote_sink);
            state.sink.overlay(block);
        }
        state
    }
}

#[async_trait]
impl ResourceController for LogStreamController {
    type Spec = LogStreamSpec;
    type Api = dyn LogStreamApi;

    async fn create(&self, api: &Self::Api, d: &mut ResourceData<LogStreamSpec>) -> Result<()> {
        let name = d.config().name.clone();
        let request = Self::expand(d.config(), true);

        let created = api
            .create_log_stream(&request)
            .await
            .with_context(|| format!("Failed to create log stream '{name}'"))?;
        let id = created
            .id
            .with_context(|| format!("Auth0 returned no id for log stream '{name}'"))?;

        info!("Created log stream '{}' ({})", name, id);
        d.set_id(id);
        d.mark_new_resource();
        d.commit_config();

        self.read(api, d).await
    }

    async fn read(&self, api: &Self::Api, d: &mut ResourceData<LogStreamSpec>) -> Result<()> {
        let Some(id) = d.id().map(str::to_string) else {
            return Ok(());
        };

        let remote = match api.read_log_stream(&id).await {
            Ok(remote) => remote,
            Err(e) if e.is_not_found() => {
                warn!("Log stream {} no longer exists, marking it absent", id);
                d.clear_id();
                return Ok(());
            }
            Err(e) => return Err(e).with_context(|| format!("Failed to read log stream {id}")),
        };

        debug!(
            "Read log stream {} (type {:?}, status {:?})",
            id, remote.kind, remote.status
        );
        if let Some(remote_id) = remote.id.clone() {
            d.set_id(remote_id);
        }
        let state = Self::flatten(remote, d.state().cloned().unwrap_or_default());
        d.set_state(state);
        Ok(())
    }

    async fn update(&self, api: &Self::Api, d: &mut ResourceData<LogStreamSpec>) -> Result<()> {
        let id = d
            .id()
            .context("Cannot update a log stream that has no id")?
            .to_string();
        let request = Self::expand(d.config(), false);

        api.update_log_stream(&id, &request)
            .await
            .with_context(|| format!("Failed to update log stream {id}"))?;

        info!("Updated log stream '{}' ({})", d.config().name, id);
        d.commit_config();

        self.read(api, d).await
    }

    async fn delete(&self, api: &Self::Api, d: &mut ResourceData<LogStreamSpec>) -> Result<()> {
        let Some(id) = d.id().map(str::to_string) else {
            return Ok(());
        };

        match api.delete_log_stream(&id).await {
            Ok(()) => info!("Deleted log stream {}", id),
            Err(e) if e.is_not_found() => {
                warn!("Log stream {} was already deleted", id);
            }
            Err(e) => return Err(e).with_context(|| format!("Failed to delete log stream {id}")),
        }

        d.clear_id();
        Ok(())
    }
}
