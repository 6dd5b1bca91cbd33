//! # Management API Models
//!
//! Request/response payloads of the Auth0 Management API v2 for log streams
//! and hooks.
//!
//! Log stream sinks have a different shape per stream type. The API carries
//! the type next to the sink (`{"type": "http", "sink": {...}}`), so a
//! [`LogStream`] is decoded by reading `type` first and then decoding `sink`
//! into the matching [`Sink`] variant.
//!
//! References:
//! - [Log streams](https://auth0.com/docs/api/management/v2/log-streams)
//! - [Hooks](https://auth0.com/docs/api/management/v2/hooks)

use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Vocabularies
// ============================================================================

/// Error returned when a string is not part of a fixed vocabulary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}', expected one of: {expected}")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
    expected: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str, expected: &[&str]) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected: expected.join(", "),
        }
    }
}

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal, ignore_case = $ignore_case:literal {
            $($variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every value, in declaration order
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire representation
            #[must_use]
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $value),+
                }
            }

            /// Wire representations of every value
            #[must_use]
            pub fn names() -> Vec<&'static str> {
                Self::ALL.iter().map(Self::as_str).collect()
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| {
                        if $ignore_case {
                            v.as_str().eq_ignore_ascii_case(s)
                        } else {
                            v.as_str() == s
                        }
                    })
                    .ok_or_else(|| UnknownVariant::new($kind, s, &Self::names()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

vocabulary! {
    /// Log stream type, which selects the sink provider
    LogStreamType, "log stream type", ignore_case = true {
        EventBridge => "eventbridge",
        EventGrid => "eventgrid",
        Http => "http",
        Datadog => "datadog",
        Splunk => "splunk",
    }
}

vocabulary! {
    /// Delivery status of a log stream
    LogStreamStatus, "log stream status", ignore_case = false {
        Active => "active",
        Paused => "paused",
        Suspended => "suspended",
    }
}

vocabulary! {
    /// Batch format used by HTTP sinks
    HttpContentFormat, "HTTP content format", ignore_case = false {
        JsonLines => "JSONLINES",
        JsonArray => "JSONARRAY",
    }
}

vocabulary! {
    /// Extensibility point a hook runs at
    TriggerId, "trigger id", ignore_case = false {
        CredentialsExchange => "credentials-exchange",
        PreUserRegistration => "pre-user-registration",
        PostUserRegistration => "post-user-registration",
        PostChangePassword => "post-change-password",
    }
}

// ============================================================================
// Log Stream Sinks
// ============================================================================

/// Amazon EventBridge sink
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventBridgeSink {
    #[serde(rename = "awsAccountId", default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(rename = "awsRegion", default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Assigned by Auth0 once the stream exists
    #[serde(
        rename = "awsPartnerEventSource",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub partner_event_source: Option<String>,
}

/// Azure Event Grid sink
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventGridSink {
    #[serde(
        rename = "azureSubscriptionId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub subscription_id: Option<String>,
    #[serde(
        rename = "azureResourceGroup",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub resource_group: Option<String>,
    #[serde(rename = "azureRegion", default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Assigned by Auth0 once the stream exists
    #[serde(
        rename = "azurePartnerTopic",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub partner_topic: Option<String>,
}

/// Generic HTTP webhook sink
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSink {
    #[serde(rename = "httpEndpoint", default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(
        rename = "httpContentType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub content_type: Option<String>,
    #[serde(
        rename = "httpContentFormat",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub content_format: Option<String>,
    #[serde(
        rename = "httpAuthorization",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub authorization: Option<String>,
    #[serde(
        rename = "httpCustomHeaders",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_headers: Option<Vec<String>>,
}

/// Datadog sink
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatadogSink {
    #[serde(rename = "datadogRegion", default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(rename = "datadogApiKey", default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Splunk HTTP Event Collector sink
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplunkSink {
    #[serde(rename = "splunkDomain", default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(rename = "splunkToken", default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(rename = "splunkPort", default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(rename = "splunkSecure", default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
}

/// Sink of a log stream, one variant per stream type
#[derive(Debug, Clone, PartialEq)]
pub enum Sink {
    EventBridge(EventBridgeSink),
    EventGrid(EventGridSink),
    Http(HttpSink),
    Datadog(DatadogSink),
    Splunk(SplunkSink),
    /// A stream type this client does not know; the payload is kept as returned
    Unsupported {
        kind: String,
        raw: serde_json::Value,
    },
}

impl Sink {
    /// Stream type this sink belongs to
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Sink::EventBridge(_) => LogStreamType::EventBridge.as_str(),
            Sink::EventGrid(_) => LogStreamType::EventGrid.as_str(),
            Sink::Http(_) => LogStreamType::Http.as_str(),
            Sink::Datadog(_) => LogStreamType::Datadog.as_str(),
            Sink::Splunk(_) => LogStreamType::Splunk.as_str(),
            Sink::Unsupported { kind, .. } => kind,
        }
    }

    /// Decode a raw `sink` object for the given stream type
    ///
    /// # Errors
    /// Returns an error if the payload does not match the shape of a known type
    pub fn decode(kind: &str, raw: serde_json::Value) -> Result<Self, serde_json::Error> {
        let Ok(stream_type) = kind.parse::<LogStreamType>() else {
            return Ok(Sink::Unsupported {
                kind: kind.to_string(),
                raw,
            });
        };
        match stream_type {
            LogStreamType::EventBridge => serde_json::from_value(raw).map(Sink::EventBridge),
            LogStreamType::EventGrid => serde_json::from_value(raw).map(Sink::EventGrid),
            LogStreamType::Http => serde_json::from_value(raw).map(Sink::Http),
            LogStreamType::Datadog => serde_json::from_value(raw).map(Sink::Datadog),
            LogStreamType::Splunk => serde_json::from_value(raw).map(Sink::Splunk),
        }
    }

    /// Encode the sink as the raw `sink` object
    ///
    /// # Errors
    /// Returns an error if serialization fails
    pub fn encode(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            Sink::EventBridge(o) => serde_json::to_value(o),
            Sink::EventGrid(o) => serde_json::to_value(o),
            Sink::Http(o) => serde_json::to_value(o),
            Sink::Datadog(o) => serde_json::to_value(o),
            Sink::Splunk(o) => serde_json::to_value(o),
            Sink::Unsupported { raw, .. } => Ok(raw.clone()),
        }
    }
}

// ============================================================================
// Log Streams
// ============================================================================

/// Log stream resource
///
/// Used for both requests and responses. Absent fields are omitted from
/// request bodies, so an update only carries what it sets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogStream {
    pub id: Option<String>,
    pub name: Option<String>,
    /// Stream type; only accepted by the API on creation
    pub kind: Option<String>,
    pub status: Option<String>,
    pub sink: Option<Sink>,
}

/// Wire shape of [`LogStream`], with the sink left undecoded
#[derive(Debug, Serialize, Deserialize)]
struct LogStreamWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sink: Option<serde_json::Value>,
}

impl Serialize for LogStream {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let sink = self
            .sink
            .as_ref()
            .map(Sink::encode)
            .transpose()
            .map_err(S::Error::custom)?;
        LogStreamWire {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: self.kind.clone(),
            status: self.status.clone(),
            sink,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LogStream {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = LogStreamWire::deserialize(deserializer)?;
        let sink = match wire.sink {
            Some(raw) => Some(
                Sink::decode(wire.kind.as_deref().unwrap_or_default(), raw)
                    .map_err(D::Error::custom)?,
            ),
            None => None,
        };
        Ok(Self {
            id: wire.id,
            name: wire.name,
            kind: wire.kind,
            status: wire.status,
            sink,
        })
    }
}

// ============================================================================
// Hooks
// ============================================================================

/// Hook resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hook {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    /// Only accepted by the API on creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// Hook secrets as sent to the API: secret name to value
pub type HookSecrets = BTreeMap<String, String>;

/// Secret names currently stored on a hook
///
/// The API never returns secret values, only their names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretKeySet(BTreeSet<String>);

impl SecretKeySet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>) -> bool {
        self.0.insert(key.into())
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.0.remove(key)
    }
}

impl<S: Into<String>> FromIterator<S> for SecretKeySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'de> Deserialize<'de> for SecretKeySet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Values come back masked; only the keys are meaningful
        let masked = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(masked.into_keys().collect())
    }
}
