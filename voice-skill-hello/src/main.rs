//! Hello Voice Skill Server
//!
//! Serves the hello skill over line-delimited JSON on stdio or over HTTP.
//!
//! # Usage
//!
//! ```bash
//! # Run with stdio transport (default)
//! voice-skill-hello
//!
//! # Run with HTTP transport
//! voice-skill-hello --transport http --port 8080
//! ```

use anyhow::Result;
use clap::Parser;
use voice_skill_common::tracing::init_tracing;
use voice_skill_common::{SkillConfig, SkillServerBuilder, TransportArgs};
use voice_skill_hello::hello_skill;

#[derive(Parser, Debug)]
#[command(name = "voice-skill-hello")]
#[command(about = "Voice skill that greets with a video or an audio clip")]
#[command(version)]
struct Args {
    #[command(flatten)]
    transport: TransportArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let config = SkillConfig::from_env()?;

    tracing::info!(
        user_agent = %config.user_agent,
        video_url = %config.video_url,
        audio_url = %config.audio_url,
        "Starting voice-skill-hello"
    );

    let skill = hello_skill(&config)?;
    let transport = args.transport.into_transport();

    SkillServerBuilder::new(skill)
        .with_transport(transport)
        .run()
        .await?;

    Ok(())
}
