//! Auth0 Management API REST Client
//!
//! Native REST implementation of the log stream and hook endpoints of the
//! Management API v2. Uses reqwest for HTTP requests and either a static API
//! token or the OAuth2 client credentials grant for authentication.
//!
//! The same client works against a Pact mock server when
//! `AUTH0_MANAGEMENT_ENDPOINT` points at it.
//!
//! References:
//! - [Management API v2](https://auth0.com/docs/api/management/v2)
//! - [Client credentials flow](https://auth0.com/docs/get-started/authentication-and-authorization-flow/client-credentials-flow)

use crate::config::ProviderConfig;
use crate::constants::{CLIENT_CREDENTIALS_GRANT, USER_AGENT};
use crate::observability::metrics;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, Instrument};

use super::models::{Hook, HookSecrets, LogStream, SecretKeySet};
use super::{ApiResult, HookApi, LogStreamApi, ManagementError};

/// Management API REST client
pub struct ManagementClient {
    http_client: Client,
    base_url: String,
    access_token: String,
}

// ============================================================================
// Authentication
// ============================================================================

/// Request body of the client credentials exchange
#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    grant_type: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    audience: &'a str,
}

/// OAuth2 token response from `/oauth/token`
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

// ============================================================================
// Error Response Structures
// ============================================================================

/// Error body returned by the Management API
///
/// ```json
/// {"statusCode": 404, "error": "Not Found", "message": "The hook does not exist.", "errorCode": "inexistent_hook"}
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    #[serde(default)]
    status_code: Option<u16>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
}

impl std::fmt::Debug for ManagementClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagementClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ManagementClient {
    /// Create a client from provider configuration
    ///
    /// Uses `AUTH0_API_TOKEN` when set, otherwise exchanges the client credentials
    /// for a Management API token.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built or the token exchange fails
    pub async fn new(config: &ProviderConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.http_timeout())
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = config.base_url();
        info!("Initializing Management API client for {}", base_url);

        let access_token = if let Some(token) = &config.api_token {
            info!("Using static Management API token");
            token.clone()
        } else {
            Self::fetch_access_token(&http_client, config).await?
        };

        Ok(Self {
            http_client,
            base_url,
            access_token,
        })
    }

    /// Create a client for a known base URL and token
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built
    pub fn with_token(base_url: impl Into<String>, access_token: impl Into<String>) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        })
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exchange client credentials for a Management API access token
    async fn fetch_access_token(http_client: &Client, config: &ProviderConfig) -> Result<String> {
        let (Some(client_id), Some(client_secret)) = (&config.client_id, &config.client_secret)
        else {
            anyhow::bail!("Client credentials are not configured");
        };

        let audience = config.audience();
        info!(
            "Requesting Management API token for client {} (audience {})",
            client_id, audience
        );

        let response = http_client
            .post(config.token_url())
            .json(&TokenRequest {
                grant_type: CLIENT_CREDENTIALS_GRANT,
                client_id,
                client_secret,
                audience: &audience,
            })
            .send()
            .await
            .context("Failed to request Management API token")?;

        if !response.status().is_success() {
            let err = Self::handle_error_response(response).await;
            return Err(err).context("Client credentials exchange was rejected");
        }

        let token: TokenResponse = response
            .json()
            .await
            .context("Failed to parse token response")?;
        debug!(
            "Retrieved {} token valid for {:?} seconds",
            token.token_type.as_deref().unwrap_or("Bearer"),
            token.expires_in
        );
        Ok(token.access_token)
    }

    /// Build HTTP request with authentication headers
    fn make_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));

        // Format authorization header: add "Bearer " prefix if not already present
        let auth_header = if self.access_token.starts_with("Bearer ") {
            self.access_token.clone()
        } else {
            format!("Bearer {}", self.access_token)
        };

        self.http_client
            .request(method, url)
            .header("Authorization", auth_header)
    }

    /// Turn a non-success response into a [`ManagementError`]
    async fn handle_error_response(response: Response) -> ManagementError {
        let status = response.status();
        let error_text = match response.text().await {
            Ok(text) => text,
            Err(e) => return ManagementError::Transport(e),
        };

        match serde_json::from_str::<ErrorResponse>(&error_text) {
            Ok(body) => ManagementError::Api {
                status: body.status_code.unwrap_or(status.as_u16()),
                error: body
                    .error
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string()),
                message: body.message.unwrap_or_default(),
                error_code: body.error_code,
            },
            Err(_) => ManagementError::Api {
                status: status.as_u16(),
                error: status.canonical_reason().unwrap_or("").to_string(),
                message: error_text,
                error_code: None,
            },
        }
    }

    /// Send a request and return the raw successful response
    async fn execute(&self, method: Method, request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        metrics::record_management_request(method.as_str(), status.as_u16());

        if status.is_success() {
            Ok(response)
        } else {
            let err = Self::handle_error_response(response).await;
            debug!("Management API returned {}: {}", status, err);
            Err(err)
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, method: Method, path: &str) -> ApiResult<T> {
        self.send_json_body::<T, ()>(method, path, None).await
    }

    async fn send_json_body<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let span = info_span!(
            "auth0.management.request",
            http.method = %method,
            http.path = path
        );
        async move {
            let mut request = self.make_request(method.clone(), path);
            if let Some(body) = body {
                request = request.json(body);
            }
            let response = self.execute(method, request).await?;
            let bytes = response.bytes().await?;
            Ok(serde_json::from_slice(&bytes)?)
        }
        .instrument(span)
        .await
    }

    async fn send_empty<B>(&self, method: Method, path: &str, body: Option<&B>) -> ApiResult<()>
    where
        B: Serialize + ?Sized + Sync,
    {
        let span = info_span!(
            "auth0.management.request",
            http.method = %method,
            http.path = path
        );
        async move {
            let mut request = self.make_request(method.clone(), path);
            if let Some(body) = body {
                request = request.json(body);
            }
            self.execute(method, request).await?;
            Ok(())
        }
        .instrument(span)
        .await
    }
}

#[async_trait]
impl LogStreamApi for ManagementClient {
    async fn create_log_stream(&self, log_stream: &LogStream) -> ApiResult<LogStream> {
        self.send_json_body(Method::POST, "log-streams", Some(log_stream))
            .await
    }

    async fn read_log_stream(&self, id: &str) -> ApiResult<LogStream> {
        self.send_json(Method::GET, &format!("log-streams/{id}")).await
    }

    async fn update_log_stream(&self, id: &str, log_stream: &LogStream) -> ApiResult<LogStream> {
        self.send_json_body(Method::PATCH, &format!("log-streams/{id}"), Some(log_stream))
            .await
    }

    async fn delete_log_stream(&self, id: &str) -> ApiResult<()> {
        self.send_empty::<()>(Method::DELETE, &format!("log-streams/{id}"), None)
            .await
    }
}

#[async_trait]
impl HookApi for ManagementClient {
    async fn create_hook(&self, hook: &Hook) -> ApiResult<Hook> {
        self.send_json_body(Method::POST, "hooks", Some(hook)).await
    }

    async fn read_hook(&self, id: &str) -> ApiResult<Hook> {
        self.send_json(Method::GET, &format!("hooks/{id}")).await
    }

    async fn update_hook(&self, id: &str, hook: &Hook) -> ApiResult<Hook> {
        self.send_json_body(Method::PATCH, &format!("hooks/{id}"), Some(hook))
            .await
    }

    async fn delete_hook(&self, id: &str) -> ApiResult<()> {
        self.send_empty::<()>(Method::DELETE, &format!("hooks/{id}"), None)
            .await
    }

    async fn hook_secrets(&self, id: &str) -> ApiResult<SecretKeySet> {
        self.send_json(Method::GET, &format!("hooks/{id}/secrets"))
            .await
    }

    async fn create_hook_secrets(&self, id: &str, secrets: &HookSecrets) -> ApiResult<()> {
        self.send_empty(Method::POST, &format!("hooks/{id}/secrets"), Some(secrets))
            .await
    }

    async fn update_hook_secrets(&self, id: &str, secrets: &HookSecrets) -> ApiResult<()> {
        self.send_empty(Method::PATCH, &format!("hooks/{id}/secrets"), Some(secrets))
            .await
    }

    async fn remove_hook_secrets(&self, id: &str, names: &[String]) -> ApiResult<()> {
        self.send_empty(Method::DELETE, &format!("hooks/{id}/secrets"), Some(names))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_token_trims_trailing_slash() {
        let client = ManagementClient::with_token("http://127.0.0.1:8080/api/v2/", "token").unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8080/api/v2");
    }

    #[test]
    fn test_debug_hides_token() {
        let client = ManagementClient::with_token("http://localhost/api/v2", "s3cr3t").unwrap();
        assert!(!format!("{client:?}").contains("s3cr3t"));
    }

    #[test]
    fn test_error_response_parsing() {
        let body: ErrorResponse = serde_json::from_str(
            r#"{"statusCode":404,"error":"Not Found","message":"The hook does not exist.","errorCode":"inexistent_hook"}"#,
        )
        .unwrap();
        assert_eq!(body.status_code, Some(404));
        assert_eq!(body.error_code.as_deref(), Some("inexistent_hook"));
    }
}
