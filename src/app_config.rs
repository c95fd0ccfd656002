use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::subtitle_processor::DEFAULT_MAX_CHUNK_CHARS;

/// Application configuration module
/// This module handles loading and validating configuration settings.
/// Every field has a default so a partial (or missing) config file works.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Completion service settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Subtitle chunking settings
    #[serde(default)]
    pub subtitle: SubtitleConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// How the chunk text is turned into a prompt
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PromptStyle {
    // @style: Prefix the chunk with a translate instruction naming the target language
    #[default]
    Instruct,
    // @style: Send the chunk unchanged
    Raw,
}

impl std::fmt::Display for PromptStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Instruct => write!(f, "instruct"),
            Self::Raw => write!(f, "raw"),
        }
    }
}

/// Completion service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    // @field: Model name
    #[serde(default = "default_model")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    // @field: Max tokens per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Temperature parameter for text generation (0.0 to 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    // @field: Number of completion candidates requested
    #[serde(default = "default_candidates")]
    pub candidates: u32,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Prompt construction
    #[serde(default)]
    pub prompt_style: PromptStyle,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: String::new(),
            endpoint: default_endpoint(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            candidates: default_candidates(),
            timeout_secs: default_timeout_secs(),
            prompt_style: PromptStyle::default(),
        }
    }
}

/// Configuration for subtitle chunking
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SubtitleConfig {
    /// Soft limit on characters sent per request
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            max_chunk_chars: default_max_chunk_chars(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching filter for the log facade
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_model() -> String {
    "gpt-3.5-turbo-instruct".to_string()
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_max_tokens() -> u32 {
    100
}

fn default_temperature() -> f32 {
    0.7
}

fn default_candidates() -> u32 {
    1
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_chunk_chars() -> usize {
    DEFAULT_MAX_CHUNK_CHARS
}

impl Config {
    /// Load a configuration file, falling back to defaults when it doesn't exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        if !FileManager::file_exists(path) {
            log::debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = FileManager::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config file {:?}: {}", path, e)))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), AppError> {
        self.translation.validate()?;

        if self.subtitle.max_chunk_chars == 0 {
            return Err(AppError::Config("max_chunk_chars must be greater than zero".to_string()));
        }

        Ok(())
    }
}

impl TranslationConfig {
    /// Validate the completion service settings
    pub fn validate(&self) -> Result<(), AppError> {
        if self.api_key.trim().is_empty() {
            return Err(AppError::Config(
                "API key is required (set OPENAI_API_KEY, --api-key or translation.api_key)".to_string(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(AppError::Config("Model name cannot be empty".to_string()));
        }

        Url::parse(&self.endpoint)
            .map_err(|e| AppError::Config(format!("Invalid endpoint '{}': {}", self.endpoint, e)))?;

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(AppError::Config(format!(
                "Temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }

        if self.max_tokens == 0 {
            return Err(AppError::Config("max_tokens must be greater than zero".to_string()));
        }

        if self.candidates == 0 {
            return Err(AppError::Config("candidates must be greater than zero".to_string()));
        }

        Ok(())
    }
}
