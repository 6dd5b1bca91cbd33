//! # Manifests and State Files
//!
//! A manifest declares one resource:
//!
//! ```yaml
//! kind: Hook
//! spec:
//!   name: my-hook
//!   script: "function (user, context, callback) { callback(null, { user }); }"
//!   trigger_id: pre-user-registration
//!   secrets:
//!     api_key: s3cr3t
//! ```
//!
//! A state file records the remote ID and the last known state of an applied
//! resource, so the next apply can tell what changed. It is also written when
//! an apply fails after the resource was created, so the next apply picks up
//! the same resource instead of creating another one. Hook secret values are
//! stored in plain text; keep state files private.

use crate::controller::ResourceData;
use crate::schema::{HookSpec, LogStreamSpec, ResourceSpec};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One declared resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "spec")]
pub enum Manifest {
    LogStream(LogStreamSpec),
    Hook(HookSpec),
}

impl Manifest {
    /// Parse a manifest from YAML (or JSON)
    ///
    /// # Errors
    /// Returns an error if the document is not a valid manifest
    pub fn from_yaml(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents).context("Failed to parse manifest")
    }

    /// Read and parse a manifest file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        Self::from_yaml(&contents).with_context(|| format!("Invalid manifest {}", path.display()))
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Manifest::LogStream(_) => "LogStream",
            Manifest::Hook(_) => "Hook",
        }
    }
}

/// Persisted result of an apply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "S: Deserialize<'de>"))]
pub struct StateFile<S> {
    /// Manifest kind the state belongs to
    pub kind: String,
    /// Remote ID
    pub id: String,
    /// Last known state; absent when the apply stopped before it was known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<S>,
}

impl<S: ResourceSpec> StateFile<S> {
    /// Snapshot what is known about a resource, if it has a remote ID
    #[must_use]
    pub fn capture(kind: &str, d: &ResourceData<S>) -> Option<Self> {
        let id = d.id()?;
        Some(Self {
            kind: kind.to_string(),
            id: id.to_string(),
            state: d.state().cloned(),
        })
    }

    /// Resume a resource from this state file with a newly declared configuration
    #[must_use]
    pub fn resume(self, config: S) -> ResourceData<S> {
        ResourceData::resume(config, self.id, self.state)
    }
}

impl<S: Serialize + DeserializeOwned> StateFile<S> {
    /// Load a state file; a missing file means nothing was applied yet
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// belongs to another kind of resource
    pub fn load(path: &Path, kind: &str) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read state file {}", path.display()))?;
        let state: Self = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse state file {}", path.display()))?;
        if state.kind != kind {
            anyhow::bail!(
                "State file {} holds a {}, not a {}",
                path.display(),
                state.kind,
                kind
            );
        }
        Ok(Some(state))
    }

    /// Write the state file
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = serde_yaml::to_string(self).context("Failed to serialize state")?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write state file {}", path.display()))
    }
}

/// Remove a state file after the resource is gone
///
/// # Errors
/// Returns an error if the file exists and cannot be removed
pub fn remove_state(path: &Path) -> Result<()> {
    if path.exists() {
        std::fs::remove_file(path)
            .with_context(|| format!("Failed to remove state file {}", path.display()))?;
    }
    Ok(())
}
