//! # Hook Secret Reconciliation
//!
//! Converges the secrets stored on a hook to the declared map. Auth0 only
//! ever returns secret names, so the plan is computed from names alone:
//!
//! - a declared secret whose name exists remotely is updated
//! - a declared secret whose name does not exist remotely is added
//! - a remote name that is no longer declared is removed
//!
//! Values are never compared. When the remote names are unknown every
//! declared secret is added.

use crate::management::{HookApi, HookSecrets, SecretKeySet};
use crate::observability::metrics;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Calls needed to converge a hook's secrets
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ReconciliationPlan {
    /// Names to remove
    pub remove: Vec<String>,
    /// Existing secrets to overwrite
    pub update: HookSecrets,
    /// Secrets to create
    pub add: HookSecrets,
}

impl ReconciliationPlan {
    /// Whether applying the plan issues no calls
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remove.is_empty() && self.update.is_empty() && self.add.is_empty()
    }
}

impl std::fmt::Debug for ReconciliationPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReconciliationPlan")
            .field("remove", &self.remove)
            .field("update", &self.update.keys().collect::<Vec<_>>())
            .field("add", &self.add.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Compute the plan that turns `remote` into `desired`
///
/// `remote` is `None` when the current names are unknown, e.g. right after the
/// hook was created.
#[must_use]
pub fn reconcile(
    remote: Option<&SecretKeySet>,
    desired: &BTreeMap<String, String>,
) -> ReconciliationPlan {
    let Some(remote) = remote.filter(|keys| !keys.is_empty()) else {
        return ReconciliationPlan {
            add: desired.clone(),
            ..ReconciliationPlan::default()
        };
    };

    let mut plan = ReconciliationPlan::default();
    for (key, value) in desired {
        if remote.contains(key) {
            plan.update.insert(key.clone(), value.clone());
        } else {
            plan.add.insert(key.clone(), value.clone());
        }
    }
    plan.remove = remote
        .iter()
        .filter(|key| !desired.contains_key(*key))
        .map(str::to_string)
        .collect();
    plan
}

/// Issue the plan's calls: removals, then updates, then additions
///
/// Each group is a single call and empty groups are skipped. The first
/// failure stops the remaining calls.
///
/// # Errors
/// Returns the error of the first failing call
pub async fn apply_plan<A>(api: &A, hook_id: &str, plan: &ReconciliationPlan) -> Result<()>
where
    A: HookApi + ?Sized,
{
    debug!("Applying secret plan to hook {}: {:?}", hook_id, plan);

    if !plan.remove.is_empty() {
        api.remove_hook_secrets(hook_id, &plan.remove)
            .await
            .with_context(|| format!("Failed to remove secrets from hook {hook_id}"))?;
        info!(
            "Removed {} secret(s) from hook {}: {:?}",
            plan.remove.len(),
            hook_id,
            plan.remove
        );
        metrics::record_hook_secret_changes("remove", plan.remove.len());
    }

    if !plan.update.is_empty() {
        api.update_hook_secrets(hook_id, &plan.update)
            .await
            .with_context(|| format!("Failed to update secrets of hook {hook_id}"))?;
        info!(
            "Updated {} secret(s) of hook {}: {:?}",
            plan.update.len(),
            hook_id,
            plan.update.keys().collect::<Vec<_>>()
        );
        metrics::record_hook_secret_changes("update", plan.update.len());
    }

    if !plan.add.is_empty() {
        api.create_hook_secrets(hook_id, &plan.add)
            .await
            .with_context(|| format!("Failed to add secrets to hook {hook_id}"))?;
        info!(
            "Added {} secret(s) to hook {}: {:?}",
            plan.add.len(),
            hook_id,
            plan.add.keys().collect::<Vec<_>>()
        );
        metrics::record_hook_secret_changes("add", plan.add.len());
    }

    Ok(())
}
