//! Incoming request envelope types.
//!
//! The host platform posts one JSON envelope per event. Only the fields the
//! skill reads are modelled; every other key lands in the struct's `extra`
//! map, so re-serializing an envelope reproduces the full payload.
//! All context metadata is optional so sparse envelopes still parse.

use crate::error::SkillError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Raw type string of a launch request.
pub const LAUNCH_REQUEST: &str = "LaunchRequest";

/// Raw type string of an intent request.
pub const INTENT_REQUEST: &str = "IntentRequest";

/// Raw type string of a session-ended notification.
pub const SESSION_ENDED_REQUEST: &str = "SessionEndedRequest";

/// One incoming platform event.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RequestEnvelope {
    /// Envelope schema version
    #[serde(default)]
    pub version: String,
    /// Session the request belongs to (absent for out-of-session events)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,
    /// Device and application context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,
    /// The request itself
    pub request: Request,
    /// Keys not modelled above, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Session metadata.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<Application>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(default)]
    pub application_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub user_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Invocation context.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Context {
    #[serde(rename = "System", default, skip_serializing_if = "Option::is_none")]
    pub system: Option<SystemState>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// System block of the context.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<Application>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<Device>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_endpoint: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Invoking device.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    /// Interface name to interface descriptor, e.g. `"Alexa.Presentation.APL"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_interfaces: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The request carried by an envelope.
///
/// The type is kept as the raw platform string; use [`Request::kind`] for
/// matching.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(rename = "type")]
    pub request_type: String,
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// Present on intent requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    /// Present on session-ended requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Present on session-ended requests caused by an error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<SessionEndedError>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Intent resolved by the platform.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slots: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Error details attached to a session-ended request.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SessionEndedError {
    #[serde(rename = "type", default)]
    pub error_type: String,
    #[serde(default)]
    pub message: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Request type as seen by handler predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestType {
    Launch,
    Intent,
    SessionEnded,
    /// Any request type the skill has no dedicated variant for
    Other(String),
}

impl From<&str> for RequestType {
    fn from(raw: &str) -> Self {
        match raw {
            LAUNCH_REQUEST => RequestType::Launch,
            INTENT_REQUEST => RequestType::Intent,
            SESSION_ENDED_REQUEST => RequestType::SessionEnded,
            other => RequestType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestType::Launch => write!(f, "{}", LAUNCH_REQUEST),
            RequestType::Intent => write!(f, "{}", INTENT_REQUEST),
            RequestType::SessionEnded => write!(f, "{}", SESSION_ENDED_REQUEST),
            RequestType::Other(raw) => write!(f, "{}", raw),
        }
    }
}

impl Request {
    /// Typed view of the raw request type.
    pub fn kind(&self) -> RequestType {
        RequestType::from(self.request_type.as_str())
    }
}

impl RequestEnvelope {
    /// Parse an envelope from JSON text.
    pub fn from_json(json: &str) -> Result<Self, SkillError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Supported interfaces declared by the invoking device, if any.
    pub fn supported_interfaces(&self) -> Option<&Map<String, Value>> {
        self.context
            .as_ref()
            .and_then(|c| c.system.as_ref())
            .and_then(|s| s.device.as_ref())
            .and_then(|d| d.supported_interfaces.as_ref())
    }
}

/// Raw request type of an envelope.
pub fn request_type(envelope: &RequestEnvelope) -> &str {
    &envelope.request.request_type
}

/// Intent name of an intent request.
///
/// # Errors
/// Returns `SkillError::NotAnIntentRequest` when the envelope is not an
/// intent request or carries no intent.
pub fn intent_name(envelope: &RequestEnvelope) -> Result<&str, SkillError> {
    match (envelope.request.kind(), envelope.request.intent.as_ref()) {
        (RequestType::Intent, Some(intent)) => Ok(intent.name.as_str()),
        _ => Err(SkillError::not_an_intent_request(&envelope.request.request_type)),
    }
}
