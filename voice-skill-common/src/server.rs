//! Skill server builder utilities.
//!
//! Runs a [`Skill`] behind the configured transport with graceful shutdown.
//!
//! # Example
//!
//! ```ignore
//! use voice_skill_common::server::SkillServerBuilder;
//! use voice_skill_common::transport::Transport;
//!
//! SkillServerBuilder::new(skill)
//!     .with_transport(Transport::http(8080))
//!     .run()
//!     .await?;
//! ```

use crate::dispatch::Skill;
use crate::envelope::RequestEnvelope;
use crate::response::ResponseEnvelope;
use crate::transport::Transport;
use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// Errors that can occur when running a skill server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to the specified port
    #[error("Failed to bind to port {port}: {message}")]
    BindFailed { port: u16, message: String },

    /// Transport error during communication
    #[error("Transport error: {0}")]
    Transport(String),

    /// Server was shut down
    #[error("Server shutdown")]
    Shutdown,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Builder for configuring and running a skill server.
pub struct SkillServerBuilder {
    skill: Arc<Skill>,
    transport: Transport,
    shutdown_rx: Option<oneshot::Receiver<()>>,
}

impl SkillServerBuilder {
    pub fn new(skill: impl Into<Arc<Skill>>) -> Self {
        Self {
            skill: skill.into(),
            transport: Transport::default(),
            shutdown_rx: None,
        }
    }

    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    /// Set a shutdown signal receiver for graceful shutdown.
    ///
    /// When the sender is dropped or a message is sent, the server
    /// will initiate graceful shutdown.
    pub fn with_shutdown(mut self, shutdown_rx: oneshot::Receiver<()>) -> Self {
        self.shutdown_rx = Some(shutdown_rx);
        self
    }

    /// Run until shut down by signal, shutdown channel, or end of stdin.
    pub async fn run(self) -> Result<(), ServerError> {
        info!(transport = %self.transport, "Starting skill server");

        match self.transport {
            Transport::Stdio => self.run_stdio().await,
            Transport::Http { port } => self.run_http(port).await,
        }
    }

    async fn run_stdio(self) -> Result<(), ServerError> {
        let shutdown = shutdown_future(self.shutdown_rx);
        let reader = BufReader::new(tokio::io::stdin());
        let writer = tokio::io::stdout();

        tokio::select! {
            result = serve_lines(&self.skill, reader, writer) => {
                let count = result?;
                info!(count, "Input closed, stopping server");
                Ok(())
            }
            _ = shutdown => {
                info!("Received shutdown signal, stopping server");
                Ok(())
            }
        }
    }

    async fn run_http(self, port: u16) -> Result<(), ServerError> {
        let app = router(self.skill.clone());

        let bind_addr = format!("0.0.0.0:{}", port);
        let tcp_listener = tokio::net::TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| ServerError::BindFailed {
                port,
                message: e.to_string(),
            })?;

        info!(port, "HTTP server listening");

        axum::serve(tcp_listener, app)
            .with_graceful_shutdown(shutdown_future(self.shutdown_rx))
            .await
            .map_err(|e| ServerError::Transport(e.to_string()))?;

        info!("HTTP server stopped");
        Ok(())
    }
}

/// HTTP routes: `POST /` dispatches an envelope, `GET /health` reports liveness.
pub fn router(skill: Arc<Skill>) -> Router {
    Router::new()
        .route("/", post(invoke))
        .route("/health", get(health))
        .with_state(skill)
}

async fn invoke(
    State(skill): State<Arc<Skill>>,
    Json(envelope): Json<RequestEnvelope>,
) -> Json<ResponseEnvelope> {
    Json(skill.invoke(&envelope))
}

async fn health() -> &'static str {
    "ok"
}

/// Answer each JSON line from `reader` with one JSON line on `writer`.
///
/// Blank lines are ignored; lines that are not a valid envelope are logged
/// and skipped. Returns the number of envelopes answered once input ends.
pub async fn serve_lines<R, W>(skill: &Skill, reader: R, mut writer: W) -> Result<usize, ServerError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut answered = 0;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match skill.invoke_json(&line) {
            Ok(out) => {
                writer.write_all(out.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
                answered += 1;
                debug!(answered, "Envelope answered");
            }
            Err(e) => warn!(error = %e, "Skipping malformed envelope"),
        }
    }

    Ok(answered)
}

fn shutdown_future(shutdown_rx: Option<oneshot::Receiver<()>>) -> impl Future<Output = ()> {
    async move {
        match shutdown_rx {
            Some(rx) => {
                let _ = rx.await;
            }
            None => wait_for_shutdown_signal().await,
        }
    }
}

/// Wait for a shutdown signal (SIGTERM or SIGINT).
async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                    _ = sigint.recv() => info!("Received SIGINT"),
                }
            }
            _ => {
                warn!("Failed to register signal handlers, falling back to Ctrl+C");
                match tokio::signal::ctrl_c().await {
                    Ok(()) => info!("Received Ctrl+C"),
                    Err(e) => {
                        warn!(error = %e, "Failed to listen for Ctrl+C");
                        std::future::pending::<()>().await
                    }
                }
            }
        }
    }

    #[cfg(not(unix))]
    {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C"),
            Err(e) => {
                warn!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await
            }
        }
    }
}

/// Convenience function to set up graceful shutdown handling.
///
/// Returns a sender that can be used to trigger shutdown programmatically,
/// and a receiver to pass to the server builder.
pub fn shutdown_channel() -> (oneshot::Sender<()>, oneshot::Receiver<()>) {
    oneshot::channel()
}
