//! Error types for the skill runtime.
//!
//! # Error Categories
//!
//! - `ConfigError`: Invalid environment values or an incomplete skill definition
//! - `SkillError::NotAnIntentRequest`: Intent name read from a non-intent request
//! - `SkillError::NoMatchingHandler`: No request handler claimed the request
//! - `SkillError::Handler`: A request handler reported a failure
//! - `SkillError::Panicked`: A request handler panicked during dispatch
//! - `SkillError::Serialization`: JSON encoding or decoding of an envelope

use thiserror::Error;

/// Unified error type for request dispatch.
///
/// Every variant except `Config` is recoverable: the dispatcher hands it to
/// the configured error handlers, which turn it into a spoken response.
#[derive(Debug, Error)]
pub enum SkillError {
    /// Configuration errors (invalid env values, incomplete skill definition)
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The intent name was requested from a request that carries no intent
    #[error("Request of type {request_type} has no intent")]
    NotAnIntentRequest {
        /// Raw platform request type
        request_type: String,
    },

    /// No request handler claimed the request
    #[error("Unable to find a suitable request handler for {request_type}")]
    NoMatchingHandler {
        /// Raw platform request type
        request_type: String,
    },

    /// A request handler returned a failure
    #[error("Handler {handler} failed: {message}")]
    Handler {
        /// Name of the failing handler
        handler: String,
        /// Description of the failure
        message: String,
    },

    /// A request handler panicked while evaluating a request
    #[error("Handler {handler} panicked: {message}")]
    Panicked {
        /// Name of the handler that panicked
        handler: String,
        /// Panic payload, when it was a string
        message: String,
    },

    /// JSON encoding or decoding failure
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl SkillError {
    /// Create a new handler failure.
    ///
    /// # Example
    ///
    /// ```
    /// use voice_skill_common::error::SkillError;
    ///
    /// let err = SkillError::handler("HelpIntentHandler", "speech text missing");
    /// assert!(err.to_string().contains("HelpIntentHandler"));
    /// assert!(err.to_string().contains("speech text missing"));
    /// ```
    pub fn handler(handler: impl Into<String>, message: impl Into<String>) -> Self {
        SkillError::Handler {
            handler: handler.into(),
            message: message.into(),
        }
    }

    /// Create a new panic failure.
    pub fn panicked(handler: impl Into<String>, message: impl Into<String>) -> Self {
        SkillError::Panicked {
            handler: handler.into(),
            message: message.into(),
        }
    }

    /// Create a not-an-intent error for the given request type.
    pub fn not_an_intent_request(request_type: impl Into<String>) -> Self {
        SkillError::NotAnIntentRequest {
            request_type: request_type.into(),
        }
    }

    /// Create a no-matching-handler error for the given request type.
    pub fn no_matching_handler(request_type: impl Into<String>) -> Self {
        SkillError::NoMatchingHandler {
            request_type: request_type.into(),
        }
    }
}

/// Configuration errors.
///
/// These errors occur when loading configuration from environment variables
/// or when a skill definition is incomplete at build time.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable has an invalid value
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    /// The skill was built without a handler for requests no predicate claims
    #[error("Skill has no unhandled-request handler; configure one with with_unhandled_handler")]
    MissingUnhandledHandler,

    /// The skill was built without any error handler
    #[error("Skill has no error handler; configure at least one with add_error_handler")]
    NoErrorHandler,
}

impl ConfigError {
    /// Create a new invalid value error.
    pub fn invalid_value(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue(name.into(), reason.into())
    }
}

/// Result type alias using the unified error type.
pub type Result<T> = std::result::Result<T, SkillError>;
