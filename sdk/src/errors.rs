//! Error types and handling
//!
//! This module provides the error types used throughout the Bonds engine.
//! All errors implement the `BondsErrorExt` trait which provides user-friendly
//! hints and indicates whether errors are recoverable.
//!
//! # Security
//!
//! Error messages never carry API keys. Provider failures are scrubbed
//! before they are embedded in a transcript or shown to a candidate.

use thiserror::Error;

/// Trait for Bonds error extensions
///
/// This trait provides additional context for errors, including user-friendly
/// hints and recoverability information. All engine errors implement this trait.
pub trait BondsErrorExt {
    /// Returns a user-friendly hint for the error
    ///
    /// The hint is safe to display to candidates and does not contain
    /// secrets or internal implementation details.
    fn user_hint(&self) -> &str;

    /// Returns whether the error is recoverable
    ///
    /// Recoverable errors can be retried or worked around by the caller.
    /// Non-recoverable errors require fixing configuration or the environment.
    fn is_recoverable(&self) -> bool;
}

/// Main engine error type
///
/// # Error Categories
///
/// - **Usage**: empty input, duplicate start, operating on an inactive session
/// - **Configuration**: invalid or missing configuration
/// - **Persistence**: report document read/write failures
/// - **Keyring**: secure storage access
///
/// Generation provider failures never reach this type; a session turns them
/// into a visible transcript message instead.
///
/// # Examples
///
/// ```
/// use sdk::errors::{BondsErrorExt, EngineError};
///
/// let error = EngineError::AlreadyActive("10.0.0.7".to_string());
/// println!("Hint: {}", error.user_hint());
/// assert!(error.is_recoverable());
///
/// let fatal_error = EngineError::Config("bad log level".to_string());
/// assert!(!fatal_error.is_recoverable());
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    // Usage errors
    #[error("Message cannot be empty")]
    EmptyInput,

    #[error("Session already active or completed for {0}")]
    AlreadyActive(String),

    #[error("No active session for {0}")]
    NotActive(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Persistence errors
    #[error("Report error: {0}")]
    Report(String),

    // Keyring errors
    #[error("Keyring error: {0}")]
    KeyringError(String),

    // Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BondsErrorExt for EngineError {
    fn user_hint(&self) -> &str {
        match self {
            Self::EmptyInput => "Type a message before sending",
            Self::AlreadyActive(_) => "Finish or end the current interview first",
            Self::NotActive(_) => "Start an interview before sending messages",

            Self::Config(_) => "Check your config.toml file for errors",

            Self::Report(_) => "Could not store the assessment report. Check the assessments directory",

            Self::KeyringError(_) => "Failed to access secure storage. Check system keychain",

            Self::Io(_) => "File system operation failed",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            // Non-recoverable errors
            Self::Config(_) | Self::KeyringError(_) => false,

            // All other errors are potentially recoverable
            _ => true,
        }
    }
}
