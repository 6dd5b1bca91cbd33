//! # Prelude
//!
//! Re-exports commonly used types and traits for convenience.
//!
//! ## Usage
//!
//! ```rust
//! use auth0_resources::prelude::*;
//! ```
//!
//! This brings into scope:
//! - Declared configuration types (`LogStreamSpec`, `HookSpec`, ...)
//! - Management API traits and the REST client
//! - Controllers and the lifecycle driver
//! - Provider configuration

// Declared configuration
pub use crate::schema::{HookSpec, LogStreamSpec, ResourceSpec, SinkBlock, ValidationError};

// Management API
pub use crate::management::{
    HookApi, LogStreamApi, ManagementClient, ManagementError, SecretKeySet, Sink,
};

// Controllers
pub use crate::controller::{
    apply, destroy, import, ApplyOutcome, HookController, LogStreamController,
    ResourceController, ResourceData,
};

// Config types
pub use crate::config::ProviderConfig;

pub use crate::manifest::{Manifest, StateFile};
