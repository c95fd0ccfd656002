/*!
 * Integration tests for the validate / chunk / translate / write workflow
 */

use std::fs;
use anyhow::Result;

use srtwai::app_controller::{check_connection, check_file, translate_file, Controller, RunOutcome, RunState};
use srtwai::app_config::Config;
use srtwai::errors::{AppError, SubtitleError};
use srtwai::providers::mock::MockProvider;
use srtwai::subtitle_processor::split_srt_by_length;
use srtwai::translation::TranslationService;
use crate::common;

fn mock_controller(provider: MockProvider, max_chunk_chars: usize) -> Controller<MockProvider> {
    let config = common::raw_test_config(max_chunk_chars);
    let service = TranslationService::with_provider(provider, config.translation.clone());
    Controller::with_service(config, service).with_progress(false)
}

#[tokio::test]
async fn test_run_withEchoProvider_shouldWriteChunksJoinedByNewline() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let output = temp_dir.path().join("movie.es.srt");

    let provider = MockProvider::echo();
    let mut controller = mock_controller(provider.clone(), 40);

    let outcome = controller.run(&input, "es", &output).await?;

    let chunks = split_srt_by_length(common::SAMPLE_SRT, 40);
    let expected = chunks.iter()
        .map(|chunk| chunk.trim().to_string())
        .collect::<Vec<_>>()
        .join("\n");

    assert_eq!(outcome, RunOutcome::Completed { chunks: chunks.len(), output_path: output.clone() });
    assert_eq!(fs::read_to_string(&output)?, expected);
    assert_eq!(controller.state(), RunState::Done);

    // One request per chunk, in original order
    let prompts: Vec<String> = provider.requests().into_iter().map(|r| r.prompt).collect();
    assert_eq!(prompts, chunks);
    Ok(())
}

#[tokio::test]
async fn test_run_withSingleChunk_shouldWriteTrimmedDocument() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let output = temp_dir.path().join("out.srt");

    let mut controller = mock_controller(MockProvider::echo(), 4096);
    controller.run(&input, "es", &output).await?;

    assert_eq!(fs::read_to_string(&output)?, common::SAMPLE_SRT.trim());
    assert_eq!(controller.translation_service().stats().requests, 1);
    Ok(())
}

#[tokio::test]
async fn test_run_withPlainTextInput_shouldRejectWithoutWritingOrTranslating() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "notes.txt", "Hello world")?;
    let output = temp_dir.path().join("out.srt");

    let provider = MockProvider::echo();
    let mut controller = mock_controller(provider.clone(), 4096);

    let outcome = controller.run(&input, "es", &output).await?;

    assert_eq!(outcome, RunOutcome::Rejected);
    assert_eq!(controller.state(), RunState::Rejected);
    assert!(!output.exists());
    assert_eq!(provider.request_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_run_withRejectedInput_shouldLeaveExistingOutputUntouched() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "bad.srt", "1\nnot a timestamp\ntext\n")?;
    let output = common::create_test_file(temp_dir.path(), "out.srt", "previous translation")?;

    let mut controller = mock_controller(MockProvider::echo(), 4096);
    let outcome = controller.run(&input, "es", &output).await?;

    assert_eq!(outcome, RunOutcome::Rejected);
    assert_eq!(fs::read_to_string(&output)?, "previous translation");
    Ok(())
}

#[tokio::test]
async fn test_run_withProviderFailingMidway_shouldAbortWithoutOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let output = temp_dir.path().join("out.srt");

    let provider = MockProvider::fail_after(1);
    let mut controller = mock_controller(provider.clone(), 20);

    let result = controller.run(&input, "es", &output).await;

    let err = result.unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to translate chunk 2"));
    assert!(!output.exists());
    // No further chunks are attempted after the failure
    assert_eq!(provider.request_count(), 2);
    assert_eq!(controller.state(), RunState::Translating);
    Ok(())
}

#[tokio::test]
async fn test_run_withMissingInput_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output = temp_dir.path().join("out.srt");

    let mut controller = mock_controller(MockProvider::echo(), 4096);
    let result = controller.run(&temp_dir.path().join("missing.srt"), "es", &output).await;

    assert!(result.is_err());
    assert!(!output.exists());
    Ok(())
}

#[tokio::test]
async fn test_run_withExistingOutput_shouldOverwrite() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let output = common::create_test_file(temp_dir.path(), "out.srt", "stale content ".repeat(100).as_str())?;

    let mut controller = mock_controller(MockProvider::echo(), 4096);
    controller.run(&input, "es", &output).await?;

    assert_eq!(fs::read_to_string(&output)?, common::SAMPLE_SRT.trim());
    Ok(())
}

#[test]
fn test_check_file_withValidSubtitle_shouldReportChunks() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;

    let report = check_file(&input, 40)?;

    assert_eq!(report.characters, common::SAMPLE_SRT.chars().count());
    assert_eq!(report.chunks, split_srt_by_length(common::SAMPLE_SRT, 40).len());
    assert!(report.largest_chunk <= 40);
    Ok(())
}

#[test]
fn test_check_file_withInvalidOrEmptyInput_shouldReturnSubtitleError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let invalid = common::create_test_file(temp_dir.path(), "notes.txt", "Hello world")?;
    let empty = common::create_test_file(temp_dir.path(), "empty.srt", "")?;

    let invalid_err = check_file(&invalid, 4096).unwrap_err();
    assert!(matches!(invalid_err, AppError::Subtitle(SubtitleError::InvalidFormat(_))));

    let empty_err = check_file(&empty, 4096).unwrap_err();
    assert!(matches!(empty_err, AppError::Subtitle(SubtitleError::EmptyDocument)));
    Ok(())
}

#[test]
fn test_check_file_withMissingInput_shouldReturnFileError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let err = check_file(&temp_dir.path().join("missing.srt"), 4096).unwrap_err();

    assert!(matches!(err, AppError::File(_)));
    Ok(())
}

#[tokio::test]
async fn test_translate_file_withInvalidInputAndNoApiKey_shouldReject() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "bad.srt", "Hello world")?;
    let output = temp_dir.path().join("out.srt");

    // Default config has an empty API key
    let outcome = translate_file(Config::default(), &input, "es", &output).await?;

    assert_eq!(outcome, RunOutcome::Rejected);
    assert!(!output.exists());
    Ok(())
}

#[tokio::test]
async fn test_translate_file_withValidInputAndNoApiKey_shouldFailOnConfig() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let output = temp_dir.path().join("out.srt");

    let err = translate_file(Config::default(), &input, "es", &output).await.unwrap_err();

    assert!(format!("{:#}", err).contains("API key is required"));
    assert!(!output.exists());
    Ok(())
}

#[tokio::test]
async fn test_check_connection_withoutApiKey_shouldReturnConfigError() {
    let result = check_connection(&Config::default()).await;
    assert!(matches!(result, Err(AppError::Config(_))));
}
