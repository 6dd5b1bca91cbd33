//! # Lifecycle
//!
//! Decides which controller operations an apply needs and runs them:
//!
//! 1. Validate the declared configuration
//! 2. Refresh the known state when the resource has an ID
//! 3. Create when absent, replace when an immutable attribute changed,
//!    update when anything else changed, otherwise leave it alone

use super::{observe, ResourceController, ResourceData};
use crate::schema::ResourceSpec;
use anyhow::{bail, Context, Result};
use tracing::info;

/// What an apply did to the resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Created,
    /// Deleted and created again because an immutable attribute changed
    Replaced,
    Updated,
    Unchanged,
}

impl ApplyOutcome {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplyOutcome::Created => "created",
            ApplyOutcome::Replaced => "replaced",
            ApplyOutcome::Updated => "updated",
            ApplyOutcome::Unchanged => "unchanged",
        }
    }
}

impl std::fmt::Display for ApplyOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Converge one resource to its declared configuration
///
/// # Errors
/// Returns an error if the configuration is invalid or a remote call fails
pub async fn apply<C>(
    controller: &C,
    api: &C::Api,
    d: &mut ResourceData<C::Spec>,
) -> Result<ApplyOutcome>
where
    C: ResourceController,
{
    let kind = C::Spec::KIND;
    d.config()
        .validate()
        .with_context(|| format!("Invalid {kind} configuration"))?;

    if d.is_present() {
        observe(kind, "read", controller.read(api, d)).await?;
    }

    let known = if d.is_present() {
        d.state().cloned()
    } else {
        None
    };
    let Some(state) = known else {
        observe(kind, "create", controller.create(api, d)).await?;
        return Ok(ApplyOutcome::Created);
    };

    if d.config().forces_replacement(&state) {
        info!(
            "{} {} has an attribute that cannot change in place, replacing it",
            kind,
            d.id().unwrap_or_default()
        );
        observe(kind, "delete", controller.delete(api, d)).await?;
        observe(kind, "create", controller.create(api, d)).await?;
        return Ok(ApplyOutcome::Replaced);
    }

    if d.config().needs_update(&state) {
        observe(kind, "update", controller.update(api, d)).await?;
        return Ok(ApplyOutcome::Updated);
    }

    info!("{} {} is up to date", kind, d.id().unwrap_or_default());
    Ok(ApplyOutcome::Unchanged)
}

/// Delete one resource; succeeds when it is already gone
///
/// # Errors
/// Returns an error if the delete call fails for any reason other than not-found
pub async fn destroy<C>(controller: &C, api: &C::Api, d: &mut ResourceData<C::Spec>) -> Result<()>
where
    C: ResourceController,
{
    observe(C::Spec::KIND, "delete", controller.delete(api, d)).await
}

/// Adopt an existing remote resource by ID
///
/// The state read from Auth0 becomes the declared configuration.
///
/// # Errors
/// Returns an error if the read fails or the resource does not exist
pub async fn import<C>(controller: &C, api: &C::Api, id: &str) -> Result<ResourceData<C::Spec>>
where
    C: ResourceController,
{
    let kind = C::Spec::KIND;
    let mut d = ResourceData::import(id);
    observe(kind, "read", controller.read(api, &mut d)).await?;

    let Some(state) = d.state().cloned() else {
        bail!("Cannot import {kind} {id}: it does not exist");
    };
    d.set_config(state);
    Ok(d)
}
