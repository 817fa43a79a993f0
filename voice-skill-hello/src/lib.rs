//! Hello Voice Skill Library
//!
//! Intent handlers for a greeting skill that plays a short video on devices
//! with a screen and an equivalent audio clip everywhere else.

pub mod capability;
pub mod handler;
pub mod presentation;
pub mod skill;

pub use capability::supports_display;
pub use handler::{
    CancelAndStopIntentHandler, CatchAllErrorHandler, FallbackIntentHandler, HelloWorldIntentHandler,
    HelpIntentHandler, IntentReflectorHandler, LaunchRequestHandler, SessionEndedRequestHandler,
    UnhandledRequestHandler,
};
pub use presentation::RenderDocumentDirective;
pub use skill::{hello_skill, request_handlers};
