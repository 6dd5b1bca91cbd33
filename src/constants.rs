//! # Constants
//!
//! Shared constants used throughout the controller.
//!
//! These values represent reasonable defaults and can be overridden via
//! environment variables where applicable.

/// Path prefix of the Auth0 Management API v2
pub const MANAGEMENT_API_PATH: &str = "/api/v2";

/// Default HTTP request timeout for Management API calls (seconds)
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Default global log level
pub const DEFAULT_LOG_LEVEL: &str = "INFO";

/// Default log format (text, json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// OAuth2 grant used to exchange client credentials for a Management API token
pub const CLIENT_CREDENTIALS_GRANT: &str = "client_credentials";

/// User agent sent with every Management API request
pub const USER_AGENT: &str = concat!("auth0ctl/", env!("CARGO_PKG_VERSION"));

/// Where unsupported log stream sink types should be reported
pub const UNSUPPORTED_SINK_ISSUE_URL: &str =
    "https://github.com/alexkappa/terraform-provider-auth0/issues/new";

/// Placeholder used when printing sensitive values
pub const REDACTED_VALUE: &str = "(sensitive)";
