pub mod string;

pub use string::SecretString;

use keyring::Entry;
use regex::Regex;
use sdk::errors::EngineError;
use std::sync::OnceLock;

/// SecretManager resolves API keys for the generation provider.
///
/// Lookup order for a key such as `openai_api_key`:
/// 1. Environment variable with the upper-cased name (`OPENAI_API_KEY`)
/// 2. OS keychain entry under the manager's service name
///
/// The manager never prompts. A missing key is reported to the caller, which
/// decides whether that is fatal (interviews) or merely worth a warning
/// (`bonds doctor`).
pub struct SecretManager {
    service_name: String,
}

/// Regex patterns for detecting common secret formats.
static SECRET_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

/// Initializes and returns the secret detection patterns.
///
/// Patterns match:
/// - OpenAI API keys: sk-[a-zA-Z0-9]{20,}
/// - Bearer tokens: Bearer\s+[^\s]{20,}
fn get_secret_patterns() -> &'static Vec<Regex> {
    SECRET_PATTERNS.get_or_init(|| {
        vec![
            // Covers sk-proj-, sk-test- and plain sk- keys
            Regex::new(r"sk-[a-zA-Z0-9\-_]{20,}").expect("Invalid OpenAI pattern"),
            Regex::new(r"Bearer\s+[^\s]{20,}").expect("Invalid Bearer pattern"),
        ]
    })
}

/// Replace every detected secret in `text` with `[REDACTED]`.
///
/// Provider error bodies can echo request headers back, so anything that
/// ends up in a transcript or log line goes through here first.
///
/// # Examples
/// ```
/// use bonds_engine::secrets::scrub_secrets;
///
/// let scrubbed = scrub_secrets("Incorrect API key provided: sk-1234567890abcdefghij");
/// assert_eq!(scrubbed, "Incorrect API key provided: [REDACTED]");
/// ```
pub fn scrub_secrets(text: &str) -> String {
    let mut result = text.to_string();

    for pattern in get_secret_patterns() {
        result = pattern.replace_all(&result, "[REDACTED]").to_string();
    }

    result
}

/// Name of the environment variable consulted for `key`
pub fn env_var_for(key: &str) -> String {
    key.to_ascii_uppercase()
}

impl SecretManager {
    /// Creates a new SecretManager with the given keychain service name.
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    /// Retrieves a secret from the environment or the OS keychain.
    ///
    /// # Errors
    /// Returns `EngineError::KeyringError` if the secret is in neither place
    /// or the keychain cannot be read.
    pub fn get_secret(&self, key: &str) -> Result<SecretString, EngineError> {
        if let Ok(value) = std::env::var(env_var_for(key)) {
            if !value.trim().is_empty() {
                tracing::debug!("Using secret '{}' from environment", key);
                return Ok(SecretString::new(value.trim()));
            }
        }

        let entry = Entry::new(&self.service_name, key).map_err(|e| {
            EngineError::KeyringError(format!("Failed to create keyring entry: {}", e))
        })?;

        match entry.get_password() {
            Ok(secret) => {
                tracing::debug!("Retrieved secret '{}' from keychain", key);
                Ok(SecretString::new(secret))
            }
            Err(keyring::Error::NoEntry) => Err(EngineError::KeyringError(format!(
                "Secret '{}' not found. Set {} or store it with the system keychain",
                key,
                env_var_for(key)
            ))),
            Err(e) => Err(EngineError::KeyringError(format!(
                "Failed to retrieve secret '{}': {}",
                key, e
            ))),
        }
    }

    /// Stores a secret in the OS keychain.
    ///
    /// # Errors
    /// Returns `EngineError::KeyringError` if keychain access fails
    pub fn set_secret(&self, key: &str, value: &str) -> Result<(), EngineError> {
        if value.trim().is_empty() {
            return Err(EngineError::KeyringError(
                "Secret cannot be empty".to_string(),
            ));
        }

        let entry = Entry::new(&self.service_name, key).map_err(|e| {
            EngineError::KeyringError(format!("Failed to create keyring entry: {}", e))
        })?;

        entry.set_password(value).map_err(|e| {
            EngineError::KeyringError(format!("Failed to store secret '{}': {}", key, e))
        })?;

        tracing::info!("Stored secret '{}' in keychain", key);
        Ok(())
    }
}
