//! # Configuration
//!
//! Provider-level settings loaded from environment variables.

mod provider;

pub use provider::ProviderConfig;
