//! Bonds Engine Library
//!
//! Core of the Bonds interview engine: live interview sessions and the
//! pipeline that turns stored assessment reports into structured scores.
//! It is used by both the `bonds` binary and integration tests.

/// Configuration management module
pub mod config;

/// Secret management module
pub mod secrets;

/// LLM provider abstraction layer
pub mod llm;

/// Interview sessions and their registry
pub mod session;

/// Report writing, parsing and listing
pub mod assessment;

/// CLI interface module
pub mod cli;

/// Command handlers module
pub mod handlers;

/// Telemetry and observability
pub mod telemetry;
