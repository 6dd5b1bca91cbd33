//! Pact contract tests for the Auth0 Management API
//!
//! These tests define the contract between auth0ctl and the Management API
//! endpoints it uses. The real `ManagementClient` talks to a Pact mock server,
//! so request paths, bodies and headers are checked as sent.

mod common;

use auth0_resources::management::{
    HookApi, HookSecrets, HttpSink, LogStream, LogStreamApi, ManagementClient, Sink,
};
use common::init_rustls;
use pact_consumer::prelude::*;
use serde_json::json;

const CONSUMER: &str = "auth0ctl";
const PROVIDER: &str = "Auth0-Management-API";

/// Client pointed at the mock server's `/api/v2`
fn client_for(mock_url: &str) -> ManagementClient {
    // mock_server.url() ends with a slash
    let base_url = mock_url.trim_end_matches('/');
    ManagementClient::with_token(format!("{base_url}/api/v2"), "test-token")
        .expect("Failed to create Management API client")
}

#[tokio::test]
async fn test_create_log_stream_contract() {
    init_rustls();
    let mut pact_builder = PactBuilder::new(CONSUMER, PROVIDER);

    pact_builder.interaction("create an http log stream", "", |mut i| {
        i.request
            .method("POST")
            .path("/api/v2/log-streams".to_string())
            .header("authorization", "Bearer test-token")
            .json_body(json!({
                "name": "http-stream",
                "type": "http",
                "sink": {
                    "httpEndpoint": "https://example.com/logs",
                    "httpContentType": "application/json",
                    "httpContentFormat": "JSONLINES"
                }
            }));
        i.response
            .status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "id": "lst_0000000000000001",
                "name": "http-stream",
                "type": "http",
                "status": "active",
                "sink": {
                    "httpEndpoint": "https://example.com/logs",
                    "httpContentType": "application/json",
                    "httpContentFormat": "JSONLINES"
                }
            }));
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let client = client_for(mock_server.url().as_str());

    let request = LogStream {
        id: None,
        name: Some("http-stream".to_string()),
        kind: Some("http".to_string()),
        status: None,
        sink: Some(Sink::Http(HttpSink {
            endpoint: Some("https://example.com/logs".to_string()),
            content_type: Some("application/json".to_string()),
            content_format: Some("JSONLINES".to_string()),
            ..HttpSink::default()
        })),
    };
    let created = client
        .create_log_stream(&request)
        .await
        .expect("create_log_stream failed");

    assert_eq!(created.id.as_deref(), Some("lst_0000000000000001"));
    assert_eq!(created.status.as_deref(), Some("active"));
    assert!(matches!(created.sink, Some(Sink::Http(_))));
}

#[tokio::test]
async fn test_read_missing_log_stream_contract() {
    init_rustls();
    let mut pact_builder = PactBuilder::new(CONSUMER, PROVIDER);

    pact_builder.interaction("read a log stream that does not exist", "", |mut i| {
        i.given("log stream lst_missing does not exist");
        i.request
            .method("GET")
            .path("/api/v2/log-streams/lst_missing".to_string())
            .header("authorization", "Bearer test-token");
        i.response
            .status(404)
            .header("content-type", "application/json")
            .json_body(json!({
                "statusCode": 404,
                "error": "Not Found",
                "message": "The log stream does not exist.",
                "errorCode": "inexistent_log_stream"
            }));
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let client = client_for(mock_server.url().as_str());

    let err = client
        .read_log_stream("lst_missing")
        .await
        .expect_err("expected a 404");
    assert!(err.is_not_found());
    assert!(err.to_string().contains("The log stream does not exist."));
}

#[tokio::test]
async fn test_create_hook_contract() {
    init_rustls();
    let mut pact_builder = PactBuilder::new(CONSUMER, PROVIDER);

    pact_builder.interaction("create a hook", "", |mut i| {
        i.request
            .method("POST")
            .path("/api/v2/hooks".to_string())
            .header("authorization", "Bearer test-token")
            .json_body(json!({
                "name": "my-hook",
                "script": "function (user, context, callback) { callback(null, { user }); }",
                "triggerId": "pre-user-registration"
            }));
        i.response
            .status(201)
            .header("content-type", "application/json")
            .json_body(json!({
                "id": "01GZ8V3Q0X0000000000000000",
                "name": "my-hook",
                "script": "function (user, context, callback) { callback(null, { user }); }",
                "triggerId": "pre-user-registration",
                "enabled": true,
                "dependencies": {}
            }));
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let client = client_for(mock_server.url().as_str());

    let request = auth0_resources::management::Hook {
        id: None,
        name: Some("my-hook".to_string()),
        script: Some(
            "function (user, context, callback) { callback(null, { user }); }".to_string(),
        ),
        trigger_id: Some("pre-user-registration".to_string()),
        enabled: None,
    };
    let created = client.create_hook(&request).await.expect("create_hook failed");

    assert_eq!(created.id.as_deref(), Some("01GZ8V3Q0X0000000000000000"));
    assert_eq!(created.enabled, Some(true));
}

#[tokio::test]
async fn test_list_hook_secrets_contract() {
    init_rustls();
    let mut pact_builder = PactBuilder::new(CONSUMER, PROVIDER);

    pact_builder.interaction("list the secrets of a hook", "", |mut i| {
        i.given("hook 01GZ has secrets api_key and db_password");
        i.request
            .method("GET")
            .path("/api/v2/hooks/01GZ/secrets".to_string())
            .header("authorization", "Bearer test-token");
        i.response
            .status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "api_key": "_VALUE_NOT_SHOWN_",
                "db_password": "_VALUE_NOT_SHOWN_"
            }));
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let client = client_for(mock_server.url().as_str());

    let keys = client.hook_secrets("01GZ").await.expect("hook_secrets failed");
    assert_eq!(keys.len(), 2);
    assert!(keys.contains("api_key"));
    assert!(keys.contains("db_password"));
}

#[tokio::test]
async fn test_update_hook_secrets_contract() {
    init_rustls();
    let mut pact_builder = PactBuilder::new(CONSUMER, PROVIDER);

    pact_builder.interaction("update an existing hook secret", "", |mut i| {
        i.given("hook 01GZ has secret api_key");
        i.request
            .method("PATCH")
            .path("/api/v2/hooks/01GZ/secrets".to_string())
            .header("authorization", "Bearer test-token")
            .json_body(json!({ "api_key": "r0tated" }));
        i.response.status(204);
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let client = client_for(mock_server.url().as_str());

    let secrets = HookSecrets::from([("api_key".to_string(), "r0tated".to_string())]);
    client
        .update_hook_secrets("01GZ", &secrets)
        .await
        .expect("update_hook_secrets failed");
}

#[tokio::test]
async fn test_remove_hook_secrets_contract() {
    init_rustls();
    let mut pact_builder = PactBuilder::new(CONSUMER, PROVIDER);

    pact_builder.interaction("remove secrets from a hook", "", |mut i| {
        i.given("hook 01GZ has secrets api_key and db_password");
        i.request
            .method("DELETE")
            .path("/api/v2/hooks/01GZ/secrets".to_string())
            .header("authorization", "Bearer test-token")
            .json_body(json!(["api_key", "db_password"]));
        i.response.status(204);
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let client = client_for(mock_server.url().as_str());

    client
        .remove_hook_secrets("01GZ", &["api_key".to_string(), "db_password".to_string()])
        .await
        .expect("remove_hook_secrets failed");
}

#[tokio::test]
async fn test_delete_hook_contract() {
    init_rustls();
    let mut pact_builder = PactBuilder::new(CONSUMER, PROVIDER);

    pact_builder.interaction("delete a hook", "", |mut i| {
        i.given("hook 01GZ exists");
        i.request
            .method("DELETE")
            .path("/api/v2/hooks/01GZ".to_string())
            .header("authorization", "Bearer test-token");
        i.response.status(204);
        i
    });

    let mock_server = pact_builder.start_mock_server(None, None);
    let client = client_for(mock_server.url().as_str());

    client.delete_hook("01GZ").await.expect("delete_hook failed");
}
