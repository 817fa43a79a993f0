//! Outgoing response types and the per-invocation response builder.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response envelope schema version.
pub const RESPONSE_VERSION: &str = "1.0";

/// Envelope returned to the platform for one invocation.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_attributes: Option<Map<String, Value>>,
    pub response: Response,
}

impl ResponseEnvelope {
    /// Wrap a finalized response.
    pub fn new(response: Response, user_agent: Option<String>) -> Self {
        Self {
            version: RESPONSE_VERSION.to_string(),
            user_agent,
            session_attributes: None,
            response,
        }
    }
}

/// Finalized response for one invocation. An empty response serializes to `{}`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub should_end_session: Option<bool>,
}

impl Response {
    /// True when the response carries no speech, reprompt, directive or session flag.
    pub fn is_empty(&self) -> bool {
        *self == Response::default()
    }

    /// SSML of the output speech, if any.
    pub fn ssml(&self) -> Option<&str> {
        self.output_speech.as_ref().map(|s| s.ssml.as_str())
    }

    /// SSML of the reprompt speech, if any.
    pub fn reprompt_ssml(&self) -> Option<&str> {
        self.reprompt.as_ref().map(|r| r.output_speech.ssml.as_str())
    }
}

/// Speech markup output.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OutputSpeech {
    /// Always `"SSML"`
    #[serde(rename = "type")]
    pub speech_type: String,
    pub ssml: String,
}

impl OutputSpeech {
    fn ssml(markup: String) -> Self {
        Self {
            speech_type: "SSML".to_string(),
            ssml: markup,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

/// Accumulates speech, directives and the session flag for one invocation.
#[derive(Debug, Default)]
pub struct ResponseBuilder {
    response: Response,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output speech. The text is wrapped in `<speak>` tags.
    pub fn speak(mut self, text: &str) -> Self {
        self.response.output_speech = Some(OutputSpeech::ssml(wrap_speak(text)));
        self
    }

    /// Set the reprompt speech. A reprompt keeps the session open.
    pub fn reprompt(mut self, text: &str) -> Self {
        self.response.reprompt = Some(Reprompt {
            output_speech: OutputSpeech::ssml(wrap_speak(text)),
        });
        self.response.should_end_session = Some(false);
        self
    }

    /// Append a directive.
    pub fn add_directive(mut self, directive: impl Serialize) -> Result<Self, serde_json::Error> {
        self.response.directives.push(serde_json::to_value(directive)?);
        Ok(self)
    }

    pub fn with_should_end_session(mut self, end: bool) -> Self {
        self.response.should_end_session = Some(end);
        self
    }

    /// Finalize the response.
    pub fn get_response(self) -> Response {
        self.response
    }
}

/// Wrap text in a single `<speak>` element, replacing any wrapper already present.
pub fn wrap_speak(text: &str) -> String {
    format!("<speak>{}</speak>", trim_speak_tags(text))
}

/// Escape text for use inside SSML content or a quoted attribute value.
pub fn escape_ssml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn trim_speak_tags(text: &str) -> &str {
    let trimmed = text.trim();
    let inner = trimmed.strip_prefix("<speak>").unwrap_or(trimmed);
    inner.strip_suffix("</speak>").unwrap_or(inner).trim()
}
