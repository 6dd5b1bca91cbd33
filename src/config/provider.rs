//! # Provider Configuration
//!
//! Management API connection settings and logging/metrics switches.

use crate::constants::{
    DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_LOG_FORMAT, DEFAULT_LOG_LEVEL, MANAGEMENT_API_PATH,
};
use anyhow::{bail, Result};
use std::time::Duration;

/// Provider-level configuration
///
/// All settings have sensible defaults and can be overridden via environment variables.
#[derive(Clone)]
pub struct ProviderConfig {
    /// Tenant domain, e.g. `my-tenant.eu.auth0.com`
    pub domain: String,
    /// Machine-to-machine application client ID
    pub client_id: Option<String>,
    /// Machine-to-machine application client secret
    pub client_secret: Option<String>,
    /// Static Management API token; takes precedence over client credentials
    pub api_token: Option<String>,
    /// Token audience, defaults to the tenant's Management API identifier
    pub audience: Option<String>,
    /// Overrides `https://{domain}` as the Management API origin (mock servers)
    pub management_endpoint: Option<String>,
    /// HTTP request timeout (seconds)
    pub http_timeout_secs: u64,
    /// Global log level (ERROR, WARN, INFO, DEBUG, TRACE)
    pub log_level: String,
    /// Log format (json, text)
    pub log_format: String,
    /// Enable metrics collection
    pub enable_metrics: bool,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("domain", &self.domain)
            .field("client_id", &self.client_id)
            .field("management_endpoint", &self.management_endpoint)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .finish_non_exhaustive()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            client_id: None,
            client_secret: None,
            api_token: None,
            audience: None,
            management_endpoint: None,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: DEFAULT_LOG_FORMAT.to_string(),
            enable_metrics: true,
        }
    }
}

impl ProviderConfig {
    /// Load configuration from environment variables with defaults
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            domain: var_or_default_str(&lookup, "AUTH0_DOMAIN", ""),
            client_id: non_empty(&lookup, "AUTH0_CLIENT_ID"),
            client_secret: non_empty(&lookup, "AUTH0_CLIENT_SECRET"),
            api_token: non_empty(&lookup, "AUTH0_API_TOKEN"),
            audience: non_empty(&lookup, "AUTH0_AUDIENCE"),
            management_endpoint: non_empty(&lookup, "AUTH0_MANAGEMENT_ENDPOINT"),
            http_timeout_secs: var_or_default(
                &lookup,
                "HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            ),
            log_level: var_or_default_str(&lookup, "LOG_LEVEL", DEFAULT_LOG_LEVEL),
            log_format: var_or_default_str(&lookup, "LOG_FORMAT", DEFAULT_LOG_FORMAT),
            enable_metrics: var_or_default_bool(&lookup, "ENABLE_METRICS", true),
        }
    }

    /// Check that enough is configured to talk to the Management API
    ///
    /// # Errors
    /// Returns an error if the domain is missing, or if neither a static token nor a
    /// complete client ID/secret pair is configured
    pub fn validate(&self) -> Result<()> {
        if self.domain.trim().is_empty() && self.management_endpoint.is_none() {
            bail!("AUTH0_DOMAIN must be set");
        }
        if self.api_token.is_none() && (self.client_id.is_none() || self.client_secret.is_none())
        {
            bail!(
                "Either AUTH0_API_TOKEN or both AUTH0_CLIENT_ID and AUTH0_CLIENT_SECRET must be set"
            );
        }
        Ok(())
    }

    /// Origin of the tenant, without a trailing slash
    #[must_use]
    pub fn origin(&self) -> String {
        match &self.management_endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{}", self.domain.trim_end_matches('/')),
        }
    }

    /// Base URL of the Management API, e.g. `https://tenant.auth0.com/api/v2`
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("{}{MANAGEMENT_API_PATH}", self.origin())
    }

    /// Token endpoint used for the client credentials exchange
    #[must_use]
    pub fn token_url(&self) -> String {
        format!("{}/oauth/token", self.origin())
    }

    /// Audience requested for Management API tokens
    ///
    /// Defaults to the tenant's Management API identifier, or to the endpoint
    /// override when no domain is configured.
    #[must_use]
    pub fn audience(&self) -> String {
        self.audience.clone().unwrap_or_else(|| {
            let domain = self.domain.trim().trim_end_matches('/');
            if domain.is_empty() {
                format!("{}{MANAGEMENT_API_PATH}/", self.origin())
            } else {
                format!("https://{domain}{MANAGEMENT_API_PATH}/")
            }
        })
    }

    /// Get HTTP timeout duration
    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// Read variable or return default value
fn var_or_default<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Read variable as boolean or return default
fn var_or_default_bool<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| {
            let v_lower = v.to_lowercase();
            v_lower == "true" || v_lower == "1" || v_lower == "yes" || v_lower == "on"
        })
        .unwrap_or(default)
}

/// Read variable as string or return default
fn var_or_default_str<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}
