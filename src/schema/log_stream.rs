//! # Log Stream Configuration

use super::{declared_differs, require_non_empty, ResourceSpec, ValidationError};
use crate::constants::REDACTED_VALUE;
use crate::management::{HttpContentFormat, LogStreamStatus, LogStreamType};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Declared log stream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LogStreamSpec {
    /// Name of the log stream
    pub name: String,

    /// Type of the log stream, which selects the sink provider:
    /// eventbridge, eventgrid, http, datadog or splunk.
    /// Changing it replaces the stream.
    #[serde(rename = "type")]
    pub kind: String,

    /// Delivery status: active, paused or suspended.
    /// Assigned by Auth0 when not declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Sink settings; only the attributes of the selected type may be set
    pub sink: SinkBlock,
}

/// Flat sink attribute bag
///
/// Holds the attributes of every sink type side by side. The stream type
/// decides which group is meaningful.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SinkBlock {
    /// AWS account ID (eventbridge). Changing it replaces the stream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_account_id: Option<String>,
    /// AWS region (eventbridge). Changing it replaces the stream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_region: Option<String>,
    /// Name of the partner event source to use with AWS (eventbridge, assigned by Auth0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_partner_event_source: Option<String>,

    /// Azure subscription ID (eventgrid). Changing it replaces the stream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure_subscription_id: Option<String>,
    /// Azure resource group (eventgrid). Changing it replaces the stream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure_resource_group: Option<String>,
    /// Azure region (eventgrid). Changing it replaces the stream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure_region: Option<String>,
    /// Name of the partner topic to use with Azure (eventgrid, assigned by Auth0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure_partner_topic: Option<String>,

    /// HTTP endpoint (http)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_endpoint: Option<String>,
    /// HTTP content type (http)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_content_type: Option<String>,
    /// Batch format, JSONLINES or JSONARRAY (http)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_content_format: Option<String>,
    /// Value of the Authorization header (http)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_authorization: Option<String>,
    /// Custom HTTP headers (http)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_custom_headers: Option<BTreeSet<String>>,

    /// Datadog region (datadog)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datadog_region: Option<String>,
    /// Datadog API key (datadog). Changing it replaces the stream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datadog_api_key: Option<String>,

    /// Splunk domain (splunk)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splunk_domain: Option<String>,
    /// Splunk HEC token (splunk)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splunk_token: Option<String>,
    /// Splunk HEC port (splunk)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splunk_port: Option<String>,
    /// Verify the Splunk TLS certificate (splunk)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splunk_secure: Option<bool>,
}

impl SinkBlock {
    /// Names of the populated attributes, with the stream type each belongs to
    fn populated(&self) -> Vec<(&'static str, LogStreamType)> {
        use LogStreamType::{Datadog, EventBridge, EventGrid, Http, Splunk};

        [
            ("aws_account_id", EventBridge, self.aws_account_id.is_some()),
            ("aws_region", EventBridge, self.aws_region.is_some()),
            (
                "aws_partner_event_source",
                EventBridge,
                self.aws_partner_event_source.is_some(),
            ),
            (
                "azure_subscription_id",
                EventGrid,
                self.azure_subscription_id.is_some(),
            ),
            (
                "azure_resource_group",
                EventGrid,
                self.azure_resource_group.is_some(),
            ),
            ("azure_region", EventGrid, self.azure_region.is_some()),
            (
                "azure_partner_topic",
                EventGrid,
                self.azure_partner_topic.is_some(),
            ),
            ("http_endpoint", Http, self.http_endpoint.is_some()),
            ("http_content_type", Http, self.http_content_type.is_some()),
            ("http_content_format", Http, self.http_content_format.is_some()),
            ("http_authorization", Http, self.http_authorization.is_some()),
            ("http_custom_headers", Http, self.http_custom_headers.is_some()),
            ("datadog_region", Datadog, self.datadog_region.is_some()),
            ("datadog_api_key", Datadog, self.datadog_api_key.is_some()),
            ("splunk_domain", Splunk, self.splunk_domain.is_some()),
            ("splunk_token", Splunk, self.splunk_token.is_some()),
            ("splunk_port", Splunk, self.splunk_port.is_some()),
            ("splunk_secure", Splunk, self.splunk_secure.is_some()),
        ]
        .into_iter()
        .filter(|(_, _, set)| *set)
        .map(|(field, kind, _)| (field, kind))
        .collect()
    }

    /// Whether any attribute that can only be set on creation differs from `state`
    #[must_use]
    pub fn forces_replacement(&self, state: &SinkBlock) -> bool {
        declared_differs(&self.aws_account_id, &state.aws_account_id)
            || declared_differs(&self.aws_region, &state.aws_region)
            || declared_differs(&self.azure_subscription_id, &state.azure_subscription_id)
            || declared_differs(&self.azure_resource_group, &state.azure_resource_group)
            || declared_differs(&self.azure_region, &state.azure_region)
            || declared_differs(&self.datadog_api_key, &state.datadog_api_key)
    }

    /// Whether any declared, updatable attribute differs from `state`
    #[must_use]
    pub fn needs_update(&self, state: &SinkBlock) -> bool {
        declared_differs(&self.http_endpoint, &state.http_endpoint)
            || declared_differs(&self.http_content_type, &state.http_content_type)
            || declared_differs(&self.http_content_format, &state.http_content_format)
            || declared_differs(&self.http_authorization, &state.http_authorization)
            || declared_differs(&self.http_custom_headers, &state.http_custom_headers)
            || declared_differs(&self.datadog_region, &state.datadog_region)
            || declared_differs(&self.splunk_domain, &state.splunk_domain)
            || declared_differs(&self.splunk_token, &state.splunk_token)
            || declared_differs(&self.splunk_port, &state.splunk_port)
            || declared_differs(&self.splunk_secure, &state.splunk_secure)
    }

    /// Overlay every attribute `remote` carries onto `self`
    ///
    /// Attributes `remote` leaves unset keep their current value.
    pub fn overlay(&mut self, remote: SinkBlock) {
        take(&mut self.aws_account_id, remote.aws_account_id);
        take(&mut self.aws_region, remote.aws_region);
        take(&mut self.aws_partner_event_source, remote.aws_partner_event_source);
        take(&mut self.azure_subscription_id, remote.azure_subscription_id);
        take(&mut self.azure_resource_group, remote.azure_resource_group);
        take(&mut self.azure_region, remote.azure_region);
        take(&mut self.azure_partner_topic, remote.azure_partner_topic);
        take(&mut self.http_endpoint, remote.http_endpoint);
        take(&mut self.http_content_type, remote.http_content_type);
        take(&mut self.http_content_format, remote.http_content_format);
        take(&mut self.http_authorization, remote.http_authorization);
        take(&mut self.http_custom_headers, remote.http_custom_headers);
        take(&mut self.datadog_region, remote.datadog_region);
        take(&mut self.datadog_api_key, remote.datadog_api_key);
        take(&mut self.splunk_domain, remote.splunk_domain);
        take(&mut self.splunk_token, remote.splunk_token);
        take(&mut self.splunk_port, remote.splunk_port);
        take(&mut self.splunk_secure, remote.splunk_secure);
    }

    #[must_use]
    pub fn redacted(&self) -> SinkBlock {
        let mask = |value: &Option<String>| value.as_ref().map(|_| REDACTED_VALUE.to_string());
        SinkBlock {
            aws_account_id: mask(&self.aws_account_id),
            aws_region: mask(&self.aws_region),
            azure_subscription_id: mask(&self.azure_subscription_id),
            azure_resource_group: mask(&self.azure_resource_group),
            azure_region: mask(&self.azure_region),
            http_authorization: mask(&self.http_authorization),
            datadog_api_key: mask(&self.datadog_api_key),
            splunk_token: mask(&self.splunk_token),
            ..self.clone()
        }
    }
}

fn take<T>(current: &mut Option<T>, remote: Option<T>) {
    if remote.is_some() {
        *current = remote;
    }
}

impl ResourceSpec for LogStreamSpec {
    const KIND: &'static str = "log_stream";

    fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty(&self.name, "name")?;
        require_non_empty(&self.kind, "type")?;

        let kind = self
            .kind
            .parse::<LogStreamType>()
            .map_err(|source| ValidationError::Vocabulary {
                field: "type",
                source,
            })?;

        if let Some(status) = &self.status {
            status
                .parse::<LogStreamStatus>()
                .map_err(|source| ValidationError::Vocabulary {
                    field: "status",
                    source,
                })?;
        }

        if let Some(format) = &self.sink.http_content_format {
            format
                .parse::<HttpContentFormat>()
                .map_err(|source| ValidationError::Vocabulary {
                    field: "sink.http_content_format",
                    source,
                })?;
        }

        for (field, owner) in self.sink.populated() {
            if matches!(field, "aws_partner_event_source" | "azure_partner_topic") {
                return Err(ValidationError::Computed { field });
            }
            if owner != kind {
                return Err(ValidationError::WrongVariant {
                    field,
                    kind: kind.to_string(),
                });
            }
        }

        Ok(())
    }

    fn forces_replacement(&self, state: &Self) -> bool {
        !self.kind.eq_ignore_ascii_case(&state.kind) || self.sink.forces_replacement(&state.sink)
    }

    fn needs_update(&self, state: &Self) -> bool {
        self.name != state.name
            || declared_differs(&self.status, &state.status)
            || self.sink.needs_update(&state.sink)
    }

    fn redacted(&self) -> Self {
        LogStreamSpec {
            sink: self.sink.redacted(),
            ..self.clone()
        }
    }
}
