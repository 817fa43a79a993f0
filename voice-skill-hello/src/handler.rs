//! Request and error handlers for the hello skill.
//!
//! Each handler pairs a predicate over the incoming envelope with a fixed
//! response. Ordering matters: [`IntentReflectorHandler`] accepts every
//! intent request and must come after the named-intent handlers.

use crate::capability::supports_display;
use crate::presentation::RenderDocumentDirective;
use tracing::{error, info, warn};
use voice_skill_common::dispatch::{ErrorHandler, HandlerInput, RequestHandler};
use voice_skill_common::envelope::RequestType;
use voice_skill_common::error::SkillError;
use voice_skill_common::response::{Response, escape_ssml};

/// Greeting spoken alongside the video presentation.
pub const PRESENTATION_GREETING: &str = "Olá, seja bem vindo!";

pub const HELLO_WORLD_INTENT: &str = "HelloWorldIntent";
pub const HELP_INTENT: &str = "AMAZON.HelpIntent";
pub const CANCEL_INTENT: &str = "AMAZON.CancelIntent";
pub const STOP_INTENT: &str = "AMAZON.StopIntent";
pub const FALLBACK_INTENT: &str = "AMAZON.FallbackIntent";

pub const HELLO_WORLD_SPEECH: &str = "Hello World!";
pub const HELP_SPEECH: &str = "You can say hello to me! How can I help?";
pub const GOODBYE_SPEECH: &str = "Goodbye!";
pub const FALLBACK_SPEECH: &str = "Sorry, I don't know about that. Please try again.";
pub const APOLOGY_SPEECH: &str = "Sorry, I had trouble doing what you asked. Please try again.";

/// Audio-only launch speech: greeting, pause, embedded clip, pause, farewell.
pub fn audio_greeting(audio_url: &str) -> String {
    format!(
        r#"Olá, seja bem-vindo! <break time="1s"/> <audio src="{}" /> <break time="1s"/> Até mais!"#,
        escape_ssml(audio_url)
    )
}

/// Answers a launch with the video presentation or its audio equivalent.
#[derive(Debug, Clone)]
pub struct LaunchRequestHandler {
    video_url: String,
    audio_url: String,
}

impl LaunchRequestHandler {
    pub fn new(video_url: impl Into<String>, audio_url: impl Into<String>) -> Self {
        Self {
            video_url: video_url.into(),
            audio_url: audio_url.into(),
        }
    }
}

impl RequestHandler for LaunchRequestHandler {
    fn name(&self) -> &'static str {
        "LaunchRequestHandler"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> Result<bool, SkillError> {
        Ok(input.request_kind() == RequestType::Launch)
    }

    fn handle(&self, input: &HandlerInput<'_>) -> Result<Response, SkillError> {
        if supports_display(input.envelope()) {
            info!("Device supports presentation documents");

            Ok(input
                .response_builder()
                .add_directive(RenderDocumentDirective::video_playback(&self.video_url))?
                .speak(PRESENTATION_GREETING)
                .with_should_end_session(true)
                .get_response())
        } else {
            info!("Device supports audio only");

            Ok(input
                .response_builder()
                .speak(&audio_greeting(&self.audio_url))
                .with_should_end_session(true)
                .get_response())
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HelloWorldIntentHandler;

impl RequestHandler for HelloWorldIntentHandler {
    fn name(&self) -> &'static str {
        "HelloWorldIntentHandler"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> Result<bool, SkillError> {
        Ok(input.is_intent(HELLO_WORLD_INTENT))
    }

    fn handle(&self, input: &HandlerInput<'_>) -> Result<Response, SkillError> {
        Ok(input.response_builder().speak(HELLO_WORLD_SPEECH).get_response())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HelpIntentHandler;

impl RequestHandler for HelpIntentHandler {
    fn name(&self) -> &'static str {
        "HelpIntentHandler"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> Result<bool, SkillError> {
        Ok(input.is_intent(HELP_INTENT))
    }

    fn handle(&self, input: &HandlerInput<'_>) -> Result<Response, SkillError> {
        Ok(input
            .response_builder()
            .speak(HELP_SPEECH)
            .reprompt(HELP_SPEECH)
            .get_response())
    }
}

/// Cancel and Stop are equivalent here.
#[derive(Debug, Clone, Copy, Default)]
pub struct CancelAndStopIntentHandler;

impl RequestHandler for CancelAndStopIntentHandler {
    fn name(&self) -> &'static str {
        "CancelAndStopIntentHandler"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> Result<bool, SkillError> {
        Ok(input.is_intent(CANCEL_INTENT) || input.is_intent(STOP_INTENT))
    }

    fn handle(&self, input: &HandlerInput<'_>) -> Result<Response, SkillError> {
        Ok(input.response_builder().speak(GOODBYE_SPEECH).get_response())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackIntentHandler;

impl RequestHandler for FallbackIntentHandler {
    fn name(&self) -> &'static str {
        "FallbackIntentHandler"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> Result<bool, SkillError> {
        Ok(input.is_intent(FALLBACK_INTENT))
    }

    fn handle(&self, input: &HandlerInput<'_>) -> Result<Response, SkillError> {
        Ok(input
            .response_builder()
            .speak(FALLBACK_SPEECH)
            .reprompt(FALLBACK_SPEECH)
            .get_response())
    }
}

/// Session-ended notifications accept no speech; the envelope is logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionEndedRequestHandler;

impl RequestHandler for SessionEndedRequestHandler {
    fn name(&self) -> &'static str {
        "SessionEndedRequestHandler"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> Result<bool, SkillError> {
        Ok(input.request_kind() == RequestType::SessionEnded)
    }

    fn handle(&self, input: &HandlerInput<'_>) -> Result<Response, SkillError> {
        let envelope = input.envelope();
        let raw = serde_json::to_string(envelope)
            .unwrap_or_else(|e| format!("<unserializable envelope: {}>", e));
        info!(
            reason = envelope.request.reason.as_deref().unwrap_or("UNKNOWN"),
            envelope = %raw,
            "Session ended"
        );

        Ok(input.response_builder().get_response())
    }
}

/// Echoes any intent no earlier handler claimed, to expose routing gaps.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentReflectorHandler;

impl RequestHandler for IntentReflectorHandler {
    fn name(&self) -> &'static str {
        "IntentReflectorHandler"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> Result<bool, SkillError> {
        Ok(input.request_kind() == RequestType::Intent)
    }

    fn handle(&self, input: &HandlerInput<'_>) -> Result<Response, SkillError> {
        let intent_name = input.intent_name()?;
        let speech = format!("You just triggered {}", intent_name);

        Ok(input.response_builder().speak(&speech).get_response())
    }
}

/// Claims requests no request handler matched and reports them as a
/// dispatch failure, so the error handlers answer them like any other error.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnhandledRequestHandler;

impl RequestHandler for UnhandledRequestHandler {
    fn name(&self) -> &'static str {
        "UnhandledRequestHandler"
    }

    fn can_handle(&self, _input: &HandlerInput<'_>) -> Result<bool, SkillError> {
        Ok(true)
    }

    fn handle(&self, input: &HandlerInput<'_>) -> Result<Response, SkillError> {
        warn!(request_type = input.request_type(), "Unhandled request");

        Err(SkillError::no_matching_handler(input.request_type()))
    }
}

/// Catch-all: turns any dispatch failure into a spoken apology.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatchAllErrorHandler;

impl ErrorHandler for CatchAllErrorHandler {
    fn can_handle(&self, _input: &HandlerInput<'_>, _error: &SkillError) -> bool {
        true
    }

    fn handle(&self, input: &HandlerInput<'_>, error: &SkillError) -> Response {
        error!(error = %error, request_type = input.request_type(), "Error handled");

        input
            .response_builder()
            .speak(APOLOGY_SPEECH)
            .reprompt(APOLOGY_SPEECH)
            .get_response()
    }
}
