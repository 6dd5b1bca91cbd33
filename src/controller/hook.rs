//! # Hook Controller
//!
//! Maps a declared [`HookSpec`] onto `/api/v2/hooks` and keeps the hook's
//! secrets in line with the declared map.

use super::secrets::{apply_plan, reconcile};
use super::{ResourceController, ResourceData};
use crate::management::{Hook, HookApi};
use crate::schema::HookSpec;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct HookController;

impl HookController {
    /// Build the request body from the declared configuration
    ///
    /// The trigger is only accepted on creation.
    #[must_use]
    pub fn expand(config: &HookSpec, creating: bool) -> Hook {
        Hook {
            id: None,
            name: Some(config.name.clone()),
            script: Some(config.script.clone()),
            trigger_id: creating.then(|| config.trigger_id.clone()),
            enabled: config.enabled,
        }
    }

    /// Fold a remote hook into the known state; secrets are never returned and stay as known
    fn flatten(remote: Hook, mut state: HookSpec) -> HookSpec {
        if let Some(name) = remote.name {
            state.name = name;
        }
        if let Some(script) = remote.script {
            state.script = script;
        }
        if let Some(trigger_id) = remote.trigger_id {
            state.trigger_id = trigger_id;
        }
        if remote.enabled.is_some() {
            state.enabled = remote.enabled;
        }
        state
    }

    /// Converge the hook's secrets when they are new or changed since the last apply
    async fn upsert_secrets(api: &dyn HookApi, d: &ResourceData<HookSpec>) -> Result<()> {
        if !(d.is_new_resource() || d.has_change(|s| &s.secrets)) {
            debug!("Hook secrets unchanged, skipping reconciliation");
            return Ok(());
        }
        let id = d.id().context("Cannot manage secrets of a hook that has no id")?;

        // A freshly created hook has no secrets to compare against
        let remote = if d.is_new_resource() {
            None
        } else {
            match api.hook_secrets(id).await {
                Ok(keys) => Some(keys),
                Err(e) if e.is_not_found() => {
                    warn!(
                        "Secret names of hook {} are not available, adding all declared secrets",
                        id
                    );
                    None
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("Failed to list secrets of hook {id}"))
                }
            }
        };

        let plan = reconcile(remote.as_ref(), &d.config().secrets);
        apply_plan(api, id, &plan).await
    }
}

#[async_trait]
impl ResourceController for HookController {
    type Spec = HookSpec;
    type Api = dyn HookApi;

    async fn create(&self, api: &Self::Api, d: &mut ResourceData<HookSpec>) -> Result<()> {
        let name = d.config().name.clone();
        let request = Self::expand(d.config(), true);

        let created = api
            .create_hook(&request)
            .await
            .with_context(|| format!("Failed to create hook '{name}'"))?;
        let id = created
            .id
            .with_context(|| format!("Auth0 returned no id for hook '{name}'"))?;

        info!("Created hook '{}' ({})", name, id);
        d.set_id(id);
        d.mark_new_resource();

        Self::upsert_secrets(api, d).await?;
        d.commit_config();

        self.read(api, d).await
    }

    async fn read(&self, api: &Self::Api, d: &mut ResourceData<HookSpec>) -> Result<()> {
        let Some(id) = d.id().map(str::to_string) else {
            return Ok(());
        };

        let remote = match api.read_hook(&id).await {
            Ok(remote) => remote,
            Err(e) if e.is_not_found() => {
                warn!("Hook {} no longer exists, marking it absent", id);
                d.clear_id();
                return Ok(());
            }
            Err(e) => return Err(e).with_context(|| format!("Failed to read hook {id}")),
        };

        debug!(
            "Read hook {} (trigger {:?}, enabled {:?})",
            id, remote.trigger_id, remote.enabled
        );
        if let Some(remote_id) = remote.id.clone() {
            d.set_id(remote_id);
        }
        let state = Self::flatten(remote, d.state().cloned().unwrap_or_default());
        d.set_state(state);
        Ok(())
    }

    async fn update(&self, api: &Self::Api, d: &mut ResourceData<HookSpec>) -> Result<()> {
        let id = d
            .id()
            .context("Cannot update a hook that has no id")?
            .to_string();
        let request = Self::expand(d.config(), false);

        api.update_hook(&id, &request)
            .await
            .with_context(|| format!("Failed to update hook {id}"))?;
        info!("Updated hook '{}' ({})", d.config().name, id);

        Self::upsert_secrets(api, d).await?;
        d.commit_config();

        self.read(api, d).await
    }

    async fn delete(&self, api: &Self::Api, d: &mut ResourceData<HookSpec>) -> Result<()> {
        let Some(id) = d.id().map(str::to_string) else {
            return Ok(());
        };

        match api.delete_hook(&id).await {
            Ok(()) => info!("Deleted hook {}", id),
            Err(e) if e.is_not_found() => {
                warn!("Hook {} was already deleted", id);
            }
            Err(e) => return Err(e).with_context(|| format!("Failed to delete hook {id}")),
        }

        d.clear_id();
        Ok(())
    }
}
