use anyhow::{Result, Context};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, info, warn};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::errors::{AppError, SubtitleError};
use crate::file_utils::FileManager;
use crate::providers::Provider;
use crate::providers::openai::{CompletionRequest, CompletionResponse, OpenAI};
use crate::subtitle_processor::SubtitleDocument;
use crate::translation::TranslationService;

// @module: Application controller for subtitle translation

/// Message shown when the input does not look like a SubRip file
pub const REJECTION_MESSAGE: &str = "The file does not have a valid SRT format.";

/// Stage of a translation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Validating,
    Rejected,
    Translating,
    Done,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Rejected => "rejected",
            Self::Translating => "translating",
            Self::Done => "done",
        };
        write!(f, "{}", name)
    }
}

/// How a run ended when no fault occurred
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The input failed the format check, nothing was written
    Rejected,
    /// Every chunk was translated and the output file written
    Completed {
        /// Number of chunks sent to the service
        chunks: usize,
        /// File the translation was written to
        output_path: PathBuf,
    },
}

/// Result of a dry validation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// Characters in the document
    pub characters: usize,
    /// Chunks the document would be split into
    pub chunks: usize,
    /// Size of the largest chunk, in characters
    pub largest_chunk: usize,
}

/// Main application controller for subtitle translation
pub struct Controller<P = OpenAI> {
    // @field: App configuration
    config: Config,

    // @field: Chunk translator
    translation_service: TranslationService<P>,

    // @field: Current run stage
    state: RunState,

    // @field: Show a progress bar on stderr
    show_progress: bool,
}

impl Controller<OpenAI> {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        let translation_service = TranslationService::new(config.translation.clone());
        Ok(Self::with_service(config, translation_service))
    }
}

impl<P> Controller<P>
where
    P: Provider<Request = CompletionRequest, Response = CompletionResponse>,
{
    /// Create a controller around an existing translation service
    pub fn with_service(config: Config, translation_service: TranslationService<P>) -> Self {
        Self {
            config,
            translation_service,
            state: RunState::Idle,
            show_progress: true,
        }
    }

    /// Enable or disable the progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Current run stage
    pub fn state(&self) -> RunState {
        self.state
    }

    /// The translation service used for chunks
    pub fn translation_service(&self) -> &TranslationService<P> {
        &self.translation_service
    }

    fn transition(&mut self, next: RunState) {
        debug!("Run state: {} -> {}", self.state, next);
        self.state = next;
    }

    /// Validate, chunk, translate and write one subtitle file.
    ///
    /// Returns `RunOutcome::Rejected` without touching `output_file` when the
    /// input fails the format check. Any I/O or provider error aborts the run
    /// before anything is written.
    pub async fn run(&mut self, input_file: &Path, target_language: &str, output_file: &Path) -> Result<RunOutcome> {
        let document = SubtitleDocument::load(input_file)?;
        self.run_document(&document, target_language, output_file).await
    }

    /// Same as [`Controller::run`] for a document that is already loaded
    pub async fn run_document(
        &mut self,
        document: &SubtitleDocument,
        target_language: &str,
        output_file: &Path,
    ) -> Result<RunOutcome> {
        let start_time = std::time::Instant::now();
        let input_file = &document.source_file;
        self.transition(RunState::Validating);

        if !document.is_valid() {
            warn!("Leading cue check failed for {:?}", input_file);
            self.transition(RunState::Rejected);
            return Ok(RunOutcome::Rejected);
        }

        let chunks = document.chunks(self.config.subtitle.max_chunk_chars);
        info!(
            "Translating {:?} to '{}' in {} chunk(s)",
            input_file, target_language, chunks.len()
        );
        self.transition(RunState::Translating);

        let translated_parts = self.translate_chunks(&chunks, target_language).await?;
        let translated_text = translated_parts.join("\n");

        FileManager::write_to_file(output_file, &translated_text)?;
        self.transition(RunState::Done);

        info!("Token usage: {}", self.translation_service.stats().summary());
        info!(
            "Translation written to {:?} in {:.1}s",
            output_file,
            start_time.elapsed().as_secs_f64()
        );

        Ok(RunOutcome::Completed {
            chunks: chunks.len(),
            output_path: output_file.to_path_buf(),
        })
    }

    // @translates: Chunks one at a time, in order; the first error aborts
    async fn translate_chunks(&mut self, chunks: &[String], target_language: &str) -> Result<Vec<String>> {
        let progress_bar = self.progress_bar(chunks.len() as u64);
        let mut translated_parts = Vec::with_capacity(chunks.len());

        for (index, chunk) in chunks.iter().enumerate() {
            let translated_part = self.translation_service
                .translate_chunk(chunk, target_language)
                .await
                .with_context(|| format!("Failed to translate chunk {} of {}", index + 1, chunks.len()))
                .inspect_err(|_| progress_bar.abandon())?;

            translated_parts.push(translated_part);
            progress_bar.inc(1);
        }

        progress_bar.finish_and_clear();
        Ok(translated_parts)
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::with_draw_target(Some(len), ProgressDrawTarget::hidden());
        }

        let progress_bar = ProgressBar::new(len);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%)"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("#>-"));
        progress_bar
    }
}

/// Validate a file and report how it would be chunked, without translating
pub fn check_file(input_file: &Path, max_chunk_chars: usize) -> Result<CheckReport, AppError> {
    let document = SubtitleDocument::load(input_file)
        .map_err(|e| AppError::File(format!("{:#}", e)))?;

    if document.content.trim().is_empty() {
        return Err(SubtitleError::EmptyDocument.into());
    }
    if !document.is_valid() {
        return Err(SubtitleError::InvalidFormat(input_file.to_path_buf()).into());
    }

    let chunks = document.chunks(max_chunk_chars);
    let largest_chunk = chunks.iter()
        .map(|chunk| chunk.chars().count())
        .max()
        .unwrap_or(0);

    Ok(CheckReport {
        characters: document.char_count(),
        chunks: chunks.len(),
        largest_chunk,
    })
}

/// Translate one file, checking its format before the service is set up.
///
/// A file that fails the leading cue check is rejected even when the
/// configuration has no usable API key.
pub async fn translate_file(
    config: Config,
    input_file: &Path,
    target_language: &str,
    output_file: &Path,
) -> Result<RunOutcome> {
    let document = SubtitleDocument::load(input_file)?;
    if !document.is_valid() {
        warn!("Leading cue check failed for {:?}", input_file);
        return Ok(RunOutcome::Rejected);
    }

    let mut controller = Controller::with_config(config)?;
    controller.run_document(&document, target_language, output_file).await
}

/// Send a one-token request to the configured service
pub async fn check_connection(config: &Config) -> Result<(), AppError> {
    config.validate()?;
    let translation_service = TranslationService::new(config.translation.clone());
    translation_service.test_connection().await?;
    info!("Connected to {} using model '{}'", config.translation.endpoint, config.translation.model);
    Ok(())
}

