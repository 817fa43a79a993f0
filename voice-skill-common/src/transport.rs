//! Transport configuration for the skill server.
//!
//! Two transport modes are supported:
//!
//! - **Stdio**: one request envelope JSON per input line, one response
//!   envelope JSON per output line. Suited to a process-per-invocation host.
//! - **HTTP**: `POST /` with a request envelope body, answered with the
//!   response envelope.
//!
//! # Example
//!
//! ```ignore
//! use voice_skill_common::transport::TransportArgs;
//! use clap::Parser;
//!
//! #[derive(Parser)]
//! struct Args {
//!     #[command(flatten)]
//!     transport: TransportArgs,
//! }
//!
//! let args = Args::parse();
//! let transport = args.transport.into_transport();
//! ```

use clap::Args;
use std::fmt;

/// Transport mode for receiving request envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    /// Line-delimited JSON over stdin/stdout (default).
    #[default]
    Stdio,
    /// HTTP endpoint accepting envelopes on `POST /`.
    Http {
        /// Port to listen on
        port: u16,
    },
}

impl Transport {
    /// Envelopes framed one per line on stdin, responses one per line on
    /// stdout. Logs must stay on stderr.
    pub fn stdio() -> Self {
        Transport::Stdio
    }

    /// Envelopes posted to `POST /` on `port`; `GET /health` for probes.
    pub fn http(port: u16) -> Self {
        Transport::Http { port }
    }

    pub fn is_stdio(&self) -> bool {
        matches!(self, Transport::Stdio)
    }

    pub fn is_http(&self) -> bool {
        matches!(self, Transport::Http { .. })
    }

    /// Get the port if this is a network transport.
    pub fn port(&self) -> Option<u16> {
        match self {
            Transport::Stdio => None,
            Transport::Http { port } => Some(*port),
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Stdio => write!(f, "stdio"),
            Transport::Http { port } => write!(f, "http (port {})", port),
        }
    }
}

/// Command-line arguments for transport configuration.
#[derive(Args, Debug, Clone)]
pub struct TransportArgs {
    /// Transport mode: stdio or http
    #[arg(long, default_value = "stdio", value_parser = parse_transport_mode)]
    pub transport: TransportMode,

    /// Port for HTTP transport (default: 8080, or from PORT env var)
    #[arg(long, env = "PORT", default_value = "8080")]
    pub port: u16,
}

/// `--transport` value. Selects how request envelopes reach the skill;
/// the dispatch path behind both modes is the same `Skill::invoke`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportMode {
    /// Line-delimited envelope JSON on stdio
    #[default]
    Stdio,
    /// Envelope JSON over HTTP
    Http,
}

fn parse_transport_mode(s: &str) -> Result<TransportMode, String> {
    match s.to_lowercase().as_str() {
        "stdio" => Ok(TransportMode::Stdio),
        "http" => Ok(TransportMode::Http),
        _ => Err(format!(
            "Invalid transport mode '{}'. Valid options: stdio, http",
            s
        )),
    }
}

impl TransportArgs {
    /// Resolve the CLI selection. The port only matters for HTTP.
    pub fn into_transport(self) -> Transport {
        match self.transport {
            TransportMode::Stdio => Transport::Stdio,
            TransportMode::Http => Transport::Http { port: self.port },
        }
    }
}

impl Default for TransportArgs {
    fn default() -> Self {
        Self {
            transport: TransportMode::Stdio,
            port: crate::config::DEFAULT_PORT,
        }
    }
}

#[cfg(test)]
pub(crate) fn parse_mode_for_test(s: &str) -> Result<TransportMode, String> {
    parse_transport_mode(s)
}
