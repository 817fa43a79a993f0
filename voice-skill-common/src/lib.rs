//! Voice Skill Common Library
//!
//! Runtime pieces shared by voice skills: request/response envelope types,
//! the response builder, ordered first-match dispatch, configuration, error
//! handling, tracing, transport selection and the server builder.

pub mod config;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod response;
pub mod server;
pub mod tracing;
pub mod transport;


pub use config::SkillConfig;
pub use dispatch::{ErrorHandler, HandlerInput, RequestHandler, Skill, SkillBuilder};
pub use envelope::{RequestEnvelope, RequestType};
pub use error::{ConfigError, Result, SkillError};
pub use response::{Response, ResponseBuilder, ResponseEnvelope};
pub use server::{ServerError, SkillServerBuilder, shutdown_channel};
pub use transport::{Transport, TransportArgs, TransportMode};
