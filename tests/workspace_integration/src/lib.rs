//! Workspace-level integration tests for the voice skill crates.
//!
//! These tests verify:
//! - The hello skill assembles from configuration and serves stdio lines
//! - Every response leaves the skill in the platform's wire format
//! - Property-based tests for response shape across arbitrary requests

pub mod output_format;
pub mod server_startup;
