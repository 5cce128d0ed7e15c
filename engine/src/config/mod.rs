//! Configuration management
//!
//! This module handles loading, validation, and management of the Bonds configuration.
//! Configuration is stored in TOML format at ~/.bonds/config.toml.
//!
//! # Configuration Sections
//!
//! - **core**: log level, data directory, assessments directory
//! - **llm**: generation provider settings
//! - **interview**: exchange thresholds, repeat policy, prompt texts
//! - **listing**: defaults for report listing
//!
//! # Environment Overrides
//!
//! After the file is loaded, `OPENAI_MODEL`, `OPENAI_TEMPERATURE` and
//! `OPENAI_MAX_TOKENS` replace the matching `[llm.openai]` values. The API
//! key itself never lives in the config file; see [`crate::secrets`].
//!
//! # Examples
//!
//! ```no_run
//! use bonds_engine::config::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load_or_create()?;
//! println!("Reports: {:?}", config.core.assessments_dir);
//! println!("Model: {}", config.llm.openai.model);
//! # Ok(())
//! # }
//! ```

use sdk::errors::EngineError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::session::prompts::{DEFAULT_GREETING, DEFAULT_JOB_DESCRIPTION, DEFAULT_REPORT_TITLE};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Core settings
    #[serde(default)]
    pub core: CoreConfig,

    /// LLM provider configuration
    #[serde(default)]
    pub llm: LLMConfig,

    /// Interview behavior
    #[serde(default)]
    pub interview: InterviewConfig,

    /// Report listing defaults
    #[serde(default)]
    pub listing: ListingConfig,
}

/// Core configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Data directory path (supports ~ expansion)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory holding report documents (supports ~ expansion)
    #[serde(default = "default_assessments_dir")]
    pub assessments_dir: PathBuf,
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    /// Generation provider (openai)
    #[serde(default = "default_provider")]
    pub provider: String,

    /// OpenAI provider settings
    #[serde(default)]
    pub openai: OpenAIConfig,
}

/// OpenAI provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    /// Base URL for OpenAI API
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_openai_model")]
    pub model: String,

    /// Sampling temperature for interview turns
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Token cap for interview turns
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    // Note: API key comes from OPENAI_API_KEY or the OS keychain, not config
}

/// Interview behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewConfig {
    /// Exchange count at which the interview wraps up
    #[serde(default = "default_soft_exchange_limit")]
    pub soft_exchange_limit: usize,

    /// Exchange count at which the interview is always cut off
    #[serde(default = "default_hard_exchange_limit")]
    pub hard_exchange_limit: usize,

    /// Allow a client to start a new interview after completing one
    #[serde(default = "default_true")]
    pub allow_repeat_sessions: bool,

    /// First line of every report document
    #[serde(default = "default_report_title")]
    pub report_title: String,

    /// Opening line shown when an interview starts
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Role description folded into the interviewer system prompt
    #[serde(default = "default_job_description")]
    pub job_description: String,
}

/// Report listing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Number of most recent reports shown by default
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("~/.bonds")
}

fn default_assessments_dir() -> PathBuf {
    PathBuf::from("~/.bonds/assessments")
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_soft_exchange_limit() -> usize {
    10
}

fn default_hard_exchange_limit() -> usize {
    15
}

fn default_report_title() -> String {
    DEFAULT_REPORT_TITLE.to_string()
}

fn default_greeting() -> String {
    DEFAULT_GREETING.to_string()
}

fn default_job_description() -> String {
    DEFAULT_JOB_DESCRIPTION.to_string()
}

fn default_recent_limit() -> usize {
    5
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            data_dir: default_data_dir(),
            assessments_dir: default_assessments_dir(),
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            openai: OpenAIConfig::default(),
        }
    }
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            base_url: default_openai_base_url(),
            model: default_openai_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            soft_exchange_limit: default_soft_exchange_limit(),
            hard_exchange_limit: default_hard_exchange_limit(),
            allow_repeat_sessions: true,
            report_title: default_report_title(),
            greeting: default_greeting(),
            job_description: default_job_description(),
        }
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    /// Load configuration from the default location (~/.bonds/config.toml)
    ///
    /// If the configuration file doesn't exist, creates a default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load_or_create() -> Result<Self, EngineError> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Self::create_default(&config_path)
        }
    }

    /// Load configuration from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load_from_path(path: &Path) -> Result<Self, EngineError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("Failed to read config file: {}", e)))?;

        let mut config = Self::from_toml_str(&contents)?;
        config.apply_env_overrides()?;
        config.validate_and_process()?;

        Ok(config)
    }

    /// Parse configuration from TOML text without touching the file system
    pub fn from_toml_str(contents: &str) -> Result<Self, EngineError> {
        toml::from_str(contents)
            .map_err(|e| EngineError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Create default configuration and save to path
    fn create_default(path: &Path) -> Result<Self, EngineError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                EngineError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let config = Self::default_config();

        // Serialize before processing so that `~` paths stay portable on disk
        let toml_string = toml::to_string_pretty(&config)
            .map_err(|e| EngineError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| EngineError::Config(format!("Failed to write config file: {}", e)))?;

        let mut config = config;
        config.apply_env_overrides()?;
        config.validate_and_process()?;

        Ok(config)
    }

    /// Get the default configuration file path (~/.bonds/config.toml)
    fn default_config_path() -> Result<PathBuf, EngineError> {
        let home = dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(".bonds").join("config.toml"))
    }

    /// Create a default configuration
    pub fn default_config() -> Self {
        Self {
            core: CoreConfig::default(),
            llm: LLMConfig::default(),
            interview: InterviewConfig::default(),
            listing: ListingConfig::default(),
        }
    }

    /// Apply `OPENAI_*` environment overrides
    pub fn apply_env_overrides(&mut self) -> Result<(), EngineError> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), EngineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model) = lookup("OPENAI_MODEL").filter(|v| !v.trim().is_empty()) {
            self.llm.openai.model = model.trim().to_string();
        }

        if let Some(raw) = lookup("OPENAI_TEMPERATURE") {
            self.llm.openai.temperature = raw.trim().parse().map_err(|_| {
                EngineError::Config(format!("OPENAI_TEMPERATURE is not a number: '{}'", raw))
            })?;
        }

        if let Some(raw) = lookup("OPENAI_MAX_TOKENS") {
            self.llm.openai.max_tokens = raw.trim().parse().map_err(|_| {
                EngineError::Config(format!("OPENAI_MAX_TOKENS is not an integer: '{}'", raw))
            })?;
        }

        Ok(())
    }

    /// Validate configuration values without touching the file system
    pub fn validate(&self) -> Result<(), EngineError> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.core.log_level.as_str()) {
            return Err(EngineError::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.core.log_level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_providers = ["openai"];
        if !valid_providers.contains(&self.llm.provider.as_str()) {
            return Err(EngineError::Config(format!(
                "Invalid provider '{}'. Must be one of: {}",
                self.llm.provider,
                valid_providers.join(", ")
            )));
        }

        if !(0.0..=2.0).contains(&self.llm.openai.temperature) {
            return Err(EngineError::Config(
                "temperature must be between 0.0 and 2.0".to_string(),
            ));
        }

        if self.llm.openai.max_tokens == 0 {
            return Err(EngineError::Config(
                "max_tokens must be greater than 0".to_string(),
            ));
        }

        let interview = &self.interview;
        if interview.soft_exchange_limit == 0 {
            return Err(EngineError::Config(
                "soft_exchange_limit must be at least 1".to_string(),
            ));
        }
        if interview.soft_exchange_limit > interview.hard_exchange_limit {
            return Err(EngineError::Config(format!(
                "soft_exchange_limit ({}) must not exceed hard_exchange_limit ({})",
                interview.soft_exchange_limit, interview.hard_exchange_limit
            )));
        }

        Ok(())
    }

    /// Validate and process configuration
    ///
    /// Validates values, expands `~` in paths and creates the data and
    /// assessments directories when missing.
    fn validate_and_process(&mut self) -> Result<(), EngineError> {
        self.validate()?;

        self.core.data_dir = expand_path(&self.core.data_dir)?;
        self.core.assessments_dir = expand_path(&self.core.assessments_dir)?;

        for dir in [&self.core.data_dir, &self.core.assessments_dir] {
            if !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| {
                    EngineError::Config(format!("Failed to create directory {:?}: {}", dir, e))
                })?;
            }
        }

        Ok(())
    }
}

/// Expand ~ in path to user's home directory
///
/// # Examples
///
/// ```ignore
/// let path = PathBuf::from("~/.bonds");
/// let expanded = expand_path(&path)?;
/// // expanded is now /home/user/.bonds (on Unix)
/// ```
pub(crate) fn expand_path(path: &Path) -> Result<PathBuf, EngineError> {
    let path_str = path
        .to_str()
        .ok_or_else(|| EngineError::Config("Invalid UTF-8 in path".to_string()))?;

    if let Some(rest) = path_str.strip_prefix("~/") {
        let home = dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(rest))
    } else if path_str == "~" {
        dirs::home_dir()
            .ok_or_else(|| EngineError::Config("Could not determine home directory".to_string()))
    } else {
        Ok(path.to_path_buf())
    }
}
