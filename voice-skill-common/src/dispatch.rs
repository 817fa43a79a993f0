//! Ordered first-match request dispatch.
//!
//! A [`Skill`] owns an immutable, ordered list of request handlers, a
//! mandatory unhandled-request handler, and one or more error handlers.
//! Every invocation is computed from scratch; nothing is shared between
//! invocations except the read-only handler list.
//!
//! # Example
//!
//! ```
//! use voice_skill_common::dispatch::{ErrorHandler, HandlerInput, RequestHandler, Skill};
//! use voice_skill_common::envelope::RequestEnvelope;
//! use voice_skill_common::error::SkillError;
//! use voice_skill_common::response::Response;
//!
//! struct Launch;
//!
//! impl RequestHandler for Launch {
//!     fn name(&self) -> &'static str { "Launch" }
//!     fn can_handle(&self, input: &HandlerInput<'_>) -> Result<bool, SkillError> {
//!         Ok(input.request_type() == "LaunchRequest")
//!     }
//!     fn handle(&self, input: &HandlerInput<'_>) -> Result<Response, SkillError> {
//!         Ok(input.response_builder().speak("Hi").get_response())
//!     }
//! }
//!
//! struct Apology;
//!
//! impl ErrorHandler for Apology {
//!     fn can_handle(&self, _: &HandlerInput<'_>, _: &SkillError) -> bool { true }
//!     fn handle(&self, input: &HandlerInput<'_>, _: &SkillError) -> Response {
//!         input.response_builder().speak("Sorry").get_response()
//!     }
//! }
//!
//! struct Silent;
//!
//! impl RequestHandler for Silent {
//!     fn name(&self) -> &'static str { "Silent" }
//!     fn can_handle(&self, _: &HandlerInput<'_>) -> Result<bool, SkillError> { Ok(true) }
//!     fn handle(&self, input: &HandlerInput<'_>) -> Result<Response, SkillError> {
//!         Ok(input.response_builder().get_response())
//!     }
//! }
//!
//! let skill = Skill::builder()
//!     .add_request_handler(Launch)
//!     .with_unhandled_handler(Silent)
//!     .add_error_handler(Apology)
//!     .build()
//!     .unwrap();
//!
//! let envelope = RequestEnvelope::from_json(r#"{"request": {"type": "LaunchRequest"}}"#).unwrap();
//! let out = skill.invoke(&envelope);
//! assert_eq!(out.response.ssml(), Some("<speak>Hi</speak>"));
//! ```

use crate::envelope::{self, RequestEnvelope, RequestType};
use crate::error::{ConfigError, SkillError};
use crate::response::{Response, ResponseBuilder, ResponseEnvelope};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, instrument, warn};

/// Read-only view of one invocation handed to every handler.
#[derive(Debug, Clone, Copy)]
pub struct HandlerInput<'a> {
    envelope: &'a RequestEnvelope,
}

impl<'a> HandlerInput<'a> {
    pub fn new(envelope: &'a RequestEnvelope) -> Self {
        Self { envelope }
    }

    pub fn envelope(&self) -> &'a RequestEnvelope {
        self.envelope
    }

    /// Raw platform request type.
    pub fn request_type(&self) -> &'a str {
        envelope::request_type(self.envelope)
    }

    pub fn request_kind(&self) -> RequestType {
        self.envelope.request.kind()
    }

    /// Intent name; fails on non-intent requests.
    pub fn intent_name(&self) -> Result<&'a str, SkillError> {
        envelope::intent_name(self.envelope)
    }

    /// True for an intent request whose intent is `name`.
    pub fn is_intent(&self, name: &str) -> bool {
        matches!(self.intent_name(), Ok(n) if n == name)
    }

    /// Fresh builder for this invocation's response.
    pub fn response_builder(&self) -> ResponseBuilder {
        ResponseBuilder::new()
    }
}

/// A (predicate, action) pair over a request envelope.
pub trait RequestHandler: Send + Sync {
    /// Name used in logs and error reports.
    fn name(&self) -> &'static str;

    fn can_handle(&self, input: &HandlerInput<'_>) -> Result<bool, SkillError>;

    fn handle(&self, input: &HandlerInput<'_>) -> Result<Response, SkillError>;
}

/// Converts a dispatch failure into a user-presentable response.
pub trait ErrorHandler: Send + Sync {
    fn can_handle(&self, input: &HandlerInput<'_>, error: &SkillError) -> bool;

    fn handle(&self, input: &HandlerInput<'_>, error: &SkillError) -> Response;
}

/// Immutable skill definition: ordered handlers plus fallbacks.
pub struct Skill {
    request_handlers: Vec<Box<dyn RequestHandler>>,
    unhandled_handler: Box<dyn RequestHandler>,
    error_handlers: Vec<Box<dyn ErrorHandler>>,
    user_agent: Option<String>,
}

impl std::fmt::Debug for Skill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Skill")
            .field("request_handlers", &self.handler_names())
            .field("unhandled_handler", &self.unhandled_handler.name())
            .field("error_handlers", &self.error_handlers.len())
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Skill {
    pub fn builder() -> SkillBuilder {
        SkillBuilder::default()
    }

    /// Names of the request handlers in dispatch order.
    pub fn handler_names(&self) -> Vec<&'static str> {
        self.request_handlers.iter().map(|h| h.name()).collect()
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// Dispatch one envelope and wrap the result for the platform.
    ///
    /// Never fails: handler errors and panics are routed to the error handlers.
    #[instrument(level = "debug", name = "skill_invoke", skip_all, fields(request_type = %envelope.request.request_type))]
    pub fn invoke(&self, envelope: &RequestEnvelope) -> ResponseEnvelope {
        let input = HandlerInput::new(envelope);
        let response = match self.dispatch(&input) {
            Ok(response) => response,
            Err(err) => self.handle_error(&input, &err),
        };
        ResponseEnvelope::new(response, self.user_agent.clone())
    }

    /// Parse, dispatch and serialize one JSON envelope.
    pub fn invoke_json(&self, json: &str) -> Result<String, SkillError> {
        let envelope = RequestEnvelope::from_json(json)?;
        Ok(serde_json::to_string(&self.invoke(&envelope))?)
    }

    fn dispatch(&self, input: &HandlerInput<'_>) -> Result<Response, SkillError> {
        for handler in &self.request_handlers {
            let matched = guarded(handler.name(), || handler.can_handle(input))?;
            if matched {
                debug!(handler = handler.name(), "Request handler selected");
                return guarded(handler.name(), || handler.handle(input));
            }
        }

        warn!(
            request_type = input.request_type(),
            handler = self.unhandled_handler.name(),
            "No request handler matched"
        );
        let handler = &self.unhandled_handler;
        guarded(handler.name(), || handler.handle(input))
    }

    fn handle_error(&self, input: &HandlerInput<'_>, err: &SkillError) -> Response {
        for handler in &self.error_handlers {
            let accepted = panic::catch_unwind(AssertUnwindSafe(|| handler.can_handle(input, err)));
            if !matches!(accepted, Ok(true)) {
                continue;
            }
            match panic::catch_unwind(AssertUnwindSafe(|| handler.handle(input, err))) {
                Ok(response) => return response,
                Err(payload) => {
                    error!(error = %err, panic = %panic_message(payload.as_ref()), "Error handler panicked");
                }
            }
        }

        error!(error = %err, "No error handler produced a response");
        Response::default()
    }
}

/// Run a handler step, converting a panic into `SkillError::Panicked`.
fn guarded<T>(
    handler: &str,
    step: impl FnOnce() -> Result<T, SkillError>,
) -> Result<T, SkillError> {
    panic::catch_unwind(AssertUnwindSafe(step))
        .unwrap_or_else(|payload| Err(SkillError::panicked(handler, panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Fluent builder for a [`Skill`].
#[derive(Default)]
pub struct SkillBuilder {
    request_handlers: Vec<Box<dyn RequestHandler>>,
    unhandled_handler: Option<Box<dyn RequestHandler>>,
    error_handlers: Vec<Box<dyn ErrorHandler>>,
    user_agent: Option<String>,
}

impl SkillBuilder {
    /// Append a request handler. Handlers are tried in insertion order.
    pub fn add_request_handler(mut self, handler: impl RequestHandler + 'static) -> Self {
        self.request_handlers.push(Box::new(handler));
        self
    }

    pub fn add_request_handlers(
        mut self,
        handlers: impl IntoIterator<Item = Box<dyn RequestHandler>>,
    ) -> Self {
        self.request_handlers.extend(handlers);
        self
    }

    /// Handler for requests no other predicate claims. Required.
    pub fn with_unhandled_handler(mut self, handler: impl RequestHandler + 'static) -> Self {
        self.unhandled_handler = Some(Box::new(handler));
        self
    }

    pub fn add_error_handler(mut self, handler: impl ErrorHandler + 'static) -> Self {
        self.error_handlers.push(Box::new(handler));
        self
    }

    pub fn add_error_handlers(
        mut self,
        handlers: impl IntoIterator<Item = Box<dyn ErrorHandler>>,
    ) -> Self {
        self.error_handlers.extend(handlers);
        self
    }

    /// Tag reported as `userAgent` on every response.
    pub fn with_custom_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// # Errors
    /// `ConfigError::MissingUnhandledHandler` without an unhandled handler,
    /// `ConfigError::NoErrorHandler` without an error handler.
    pub fn build(self) -> Result<Skill, SkillError> {
        let unhandled_handler = self
            .unhandled_handler
            .ok_or(ConfigError::MissingUnhandledHandler)?;
        if self.error_handlers.is_empty() {
            return Err(ConfigError::NoErrorHandler.into());
        }

        Ok(Skill {
            request_handlers: self.request_handlers,
            unhandled_handler,
            error_handlers: self.error_handlers,
            user_agent: self.user_agent,
        })
    }
}
