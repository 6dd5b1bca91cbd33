//! # Hook Configuration

use super::{declared_differs, require_non_empty, ResourceSpec, ValidationError};
use crate::constants::REDACTED_VALUE;
use crate::management::TriggerId;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// ASCII alphanumerics, '_', spaces and '-', neither leading nor trailing '-' or whitespace
const HOOK_NAME_PATTERN: &str = r"^[^\s-][A-Za-z0-9_ -]+[^\s-]$";

/// Declared hook
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct HookSpec {
    /// Name of this hook
    pub name: String,

    /// Code to be executed when this hook runs
    pub script: String,

    /// Execution stage of this hook: credentials-exchange, pre-user-registration,
    /// post-user-registration or post-change-password.
    /// Changing it replaces the hook.
    pub trigger_id: String,

    /// Secrets available to the script. Values are write-only.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub secrets: BTreeMap<String, String>,

    /// Whether the hook is enabled; assigned by Auth0 when not declared
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// Validate a hook name
///
/// # Errors
/// Returns an error if the name does not match the allowed pattern
pub fn validate_hook_name(name: &str) -> Result<(), ValidationError> {
    require_non_empty(name, "name")?;

    let pattern = Regex::new(HOOK_NAME_PATTERN).map_err(|e| ValidationError::Pattern {
        field: "name",
        value: name.to_string(),
        reason: format!("failed to compile name pattern: {e}"),
    })?;

    if !pattern.is_match(name) {
        return Err(ValidationError::Pattern {
            field: "name",
            value: name.to_string(),
            reason: "can only contain alphanumeric characters, spaces and '-', \
                     and can neither start nor end with '-' or spaces"
                .to_string(),
        });
    }

    Ok(())
}

impl ResourceSpec for HookSpec {
    const KIND: &'static str = "hook";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_hook_name(&self.name)?;
        require_non_empty(&self.script, "script")?;
        require_non_empty(&self.trigger_id, "trigger_id")?;
        self.trigger_id
            .parse::<TriggerId>()
            .map_err(|source| ValidationError::Vocabulary {
                field: "trigger_id",
                source,
            })?;
        Ok(())
    }

    fn forces_replacement(&self, state: &Self) -> bool {
        self.trigger_id != state.trigger_id
    }

    fn needs_update(&self, state: &Self) -> bool {
        self.name != state.name
            || self.script != state.script
            || declared_differs(&self.enabled, &state.enabled)
            || self.secrets != state.secrets
    }

    fn redacted(&self) -> Self {
        HookSpec {
            secrets: self
                .secrets
                .keys()
                .map(|key| (key.clone(), REDACTED_VALUE.to_string()))
                .collect(),
            ..self.clone()
        }
    }
}
