/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use srtwai::app_config::{Config, LogLevel, PromptStyle};
use srtwai::errors::AppError;
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.translation.model, "gpt-3.5-turbo-instruct");
    assert_eq!(config.translation.endpoint, "https://api.openai.com/v1");
    assert_eq!(config.translation.max_tokens, 100);
    assert!((config.translation.temperature - 0.7).abs() < f32::EPSILON);
    assert_eq!(config.translation.candidates, 1);
    assert_eq!(config.translation.timeout_secs, 120);
    assert_eq!(config.translation.prompt_style, PromptStyle::Instruct);
    assert!(config.translation.api_key.is_empty());
    assert_eq!(config.subtitle.max_chunk_chars, 4096);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Default config lacks an API key and must not validate
#[test]
fn test_config_validation_withoutApiKey_shouldFail() {
    let config = Config::default();
    let err = config.validate().unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
    assert!(err.to_string().contains("API key"));
}

#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = common::raw_test_config(4096);
    assert!(config.validate().is_ok());

    config.translation.model = "  ".to_string();
    assert!(config.validate().is_err());
    config.translation.model = "gpt-3.5-turbo-instruct".to_string();

    config.translation.endpoint = "not a url".to_string();
    assert!(config.validate().is_err());
    config.translation.endpoint = "http://localhost:8080/v1".to_string();
    assert!(config.validate().is_ok());

    config.translation.temperature = 2.5;
    assert!(config.validate().is_err());
    config.translation.temperature = 0.0;
    assert!(config.validate().is_ok());

    config.translation.max_tokens = 0;
    assert!(config.validate().is_err());
    config.translation.max_tokens = 100;

    config.translation.candidates = 0;
    assert!(config.validate().is_err());
    config.translation.candidates = 1;

    config.subtitle.max_chunk_chars = 0;
    assert!(config.validate().is_err());
    config.subtitle.max_chunk_chars = 1;
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_deserialize_withPartialJson_shouldFillDefaults() -> Result<()> {
    let json = r#"{
        "translation": { "api_key": "sk-test", "prompt_style": "raw" },
        "log_level": "debug"
    }"#;

    let config: Config = serde_json::from_str(json)?;

    assert_eq!(config.translation.api_key, "sk-test");
    assert_eq!(config.translation.prompt_style, PromptStyle::Raw);
    assert_eq!(config.translation.max_tokens, 100);
    assert_eq!(config.subtitle.max_chunk_chars, 4096);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert!(config.validate().is_ok());

    Ok(())
}

#[test]
fn test_config_serialize_withDefaults_shouldRoundTripFields() -> Result<()> {
    let json = serde_json::to_string_pretty(&Config::default())?;
    assert!(json.contains("\"prompt_style\": \"instruct\""));
    assert!(json.contains("\"max_chunk_chars\": 4096"));
    assert!(json.contains("\"log_level\": \"info\""));
    Ok(())
}

#[test]
fn test_load_or_default_withMissingFile_shouldReturnDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_default(&path)?;

    assert_eq!(config.subtitle.max_chunk_chars, 4096);
    assert!(!path.exists(), "loading defaults must not create a file");
    Ok(())
}

#[test]
fn test_load_or_default_withExistingFile_shouldParseIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{ "subtitle": { "max_chunk_chars": 512 }, "translation": { "model": "my-model" } }"#,
    )?;

    let config = Config::load_or_default(&path)?;

    assert_eq!(config.subtitle.max_chunk_chars, 512);
    assert_eq!(config.translation.model, "my-model");
    Ok(())
}

#[test]
fn test_load_or_default_withInvalidJson_shouldReturnConfigError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    let result = Config::load_or_default(&path);
    assert!(matches!(result, Err(AppError::Config(_))));
    Ok(())
}

#[test]
fn test_log_level_toLevelFilter_shouldMapEachLevel() {
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
    assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
    assert_eq!(LogLevel::Info.to_level_filter(), log::LevelFilter::Info);
    assert_eq!(LogLevel::Debug.to_level_filter(), log::LevelFilter::Debug);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}

#[test]
fn test_prompt_style_display_shouldUseLowercaseNames() {
    assert_eq!(PromptStyle::Instruct.to_string(), "instruct");
    assert_eq!(PromptStyle::Raw.to_string(), "raw");
}
