//! # Declared Configuration
//!
//! User-facing configuration of the managed resources, as written in
//! manifests and persisted in state files.
//!
//! Enumerated attributes are kept as plain strings and checked by
//! [`ResourceSpec::validate`], so a remote value outside the known vocabulary
//! can still be read back into state.

use crate::management::UnknownVariant;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub mod hook;
pub mod log_stream;

pub use hook::HookSpec;
pub use log_stream::{LogStreamSpec, SinkBlock};

/// Declared configuration rejected before any remote call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field}: {source}")]
    Vocabulary {
        field: &'static str,
        source: UnknownVariant,
    },

    #[error("{field} '{value}' is invalid: {reason}")]
    Pattern {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{field} is assigned by Auth0 and cannot be declared")]
    Computed { field: &'static str },

    #[error("{field} does not apply to log stream type '{kind}'")]
    WrongVariant { field: &'static str, kind: String },
}

/// Behaviour shared by every declared resource configuration
pub trait ResourceSpec:
    Clone + Default + PartialEq + Serialize + DeserializeOwned + JsonSchema + Send + Sync + 'static
{
    /// Resource name used in logs, metric labels and manifests
    const KIND: &'static str;

    /// Check the declared values
    ///
    /// # Errors
    /// Returns the first invalid attribute
    fn validate(&self) -> Result<(), ValidationError>;

    /// Whether moving from `state` to `self` changes an attribute Auth0 cannot update in place
    fn forces_replacement(&self, state: &Self) -> bool;

    /// Whether `self` declares anything that differs from `state`
    ///
    /// Attributes left unset are not compared, and neither are attributes Auth0 assigns.
    fn needs_update(&self, state: &Self) -> bool;

    /// Copy suitable for printing, with sensitive values masked
    #[must_use]
    fn redacted(&self) -> Self {
        self.clone()
    }
}

/// Declared optional value that is set and differs from the current one
pub(crate) fn declared_differs<T: PartialEq>(declared: &Option<T>, current: &Option<T>) -> bool {
    declared.is_some() && declared != current
}

pub(crate) fn require_non_empty(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Missing { field });
    }
    Ok(())
}
