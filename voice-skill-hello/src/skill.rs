//! Hello skill definition: the ordered handler list and its fallbacks.

use crate::handler::{
    CancelAndStopIntentHandler, CatchAllErrorHandler, FallbackIntentHandler, HelloWorldIntentHandler,
    HelpIntentHandler, IntentReflectorHandler, LaunchRequestHandler, SessionEndedRequestHandler,
    UnhandledRequestHandler,
};
use tracing::info;
use voice_skill_common::config::SkillConfig;
use voice_skill_common::dispatch::{RequestHandler, Skill};
use voice_skill_common::error::SkillError;

/// Request handlers in dispatch order. First match wins, so the reflector
/// stays last among the intent handlers.
pub fn request_handlers(config: &SkillConfig) -> Vec<Box<dyn RequestHandler>> {
    vec![
        Box::new(LaunchRequestHandler::new(&config.video_url, &config.audio_url)),
        Box::new(HelloWorldIntentHandler),
        Box::new(HelpIntentHandler),
        Box::new(CancelAndStopIntentHandler),
        Box::new(FallbackIntentHandler),
        Box::new(SessionEndedRequestHandler),
        Box::new(IntentReflectorHandler),
    ]
}

/// Build the hello skill from configuration.
pub fn hello_skill(config: &SkillConfig) -> Result<Skill, SkillError> {
    let skill = Skill::builder()
        .add_request_handlers(request_handlers(config))
        .with_unhandled_handler(UnhandledRequestHandler)
        .add_error_handler(CatchAllErrorHandler)
        .with_custom_user_agent(config.user_agent.as_str())
        .build()?;

    info!(handlers = ?skill.handler_names(), user_agent = %config.user_agent, "Hello skill built");
    Ok(skill)
}
