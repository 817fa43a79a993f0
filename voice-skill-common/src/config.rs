//! Configuration module for loading environment variables and settings.

use crate::error::ConfigError;

/// User-agent tag attached to every outgoing response envelope.
pub const DEFAULT_USER_AGENT: &str = "sample/hello-world/v1.2";

/// Video played on devices that can render a presentation document.
pub const DEFAULT_VIDEO_URL: &str = "https://bmw-ix3.s3.amazonaws.com/videos/audio1.mp4";

/// Audio clip embedded in the speech markup for audio-only devices.
pub const DEFAULT_AUDIO_URL: &str = "https://bmw-ix3.s3.amazonaws.com/audios/audio1.mp3";

/// Default HTTP port, used by `TransportArgs` when neither `--port` nor
/// `PORT` is given.
pub const DEFAULT_PORT: u16 = 8080;

/// Skill configuration loaded from environment variables.
///
/// Holds what the handlers need. The listening port belongs to the
/// transport and is read by `TransportArgs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillConfig {
    /// Free-text tag reported as `userAgent` on every response
    pub user_agent: String,
    /// Public HTTPS location of the launch video
    pub video_url: String,
    /// Public HTTPS location of the launch audio clip
    pub audio_url: String,
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            video_url: DEFAULT_VIDEO_URL.to_string(),
            audio_url: DEFAULT_AUDIO_URL.to_string(),
        }
    }
}

impl SkillConfig {
    /// Load configuration from environment variables and .env file.
    ///
    /// Every variable is optional:
    /// - `SKILL_USER_AGENT` (default `sample/hello-world/v1.2`)
    /// - `SKILL_VIDEO_URL`, `SKILL_AUDIO_URL` (must be `https://` URLs)
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` if an asset URL is not HTTPS.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// `from_env` delegates here; tests pass a map-backed closure instead of
    /// mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let user_agent = lookup("SKILL_USER_AGENT")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let video_url = asset_url(&lookup, "SKILL_VIDEO_URL", DEFAULT_VIDEO_URL)?;
        let audio_url = asset_url(&lookup, "SKILL_AUDIO_URL", DEFAULT_AUDIO_URL)?;

        Ok(Self {
            user_agent,
            video_url,
            audio_url,
        })
    }
}

fn asset_url<F>(lookup: &F, name: &str, default: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(url) if url.starts_with("https://") => Ok(url),
        Some(url) => Err(ConfigError::invalid_value(
            name,
            format!("'{}' must be a public https:// URL", url),
        )),
        None => Ok(default.to_string()),
    }
}
