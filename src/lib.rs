/*!
 * # srtwai - SubRip translation with AI completions
 *
 * A Rust library for translating SubRip (SRT) subtitle files through a
 * text-completion API.
 *
 * ## Features
 *
 * - Shallow SRT format check on the leading cue
 * - Line-aligned chunking under a soft character limit
 * - Sequential chunk translation through the OpenAI completions endpoint
 * - Optional translate instruction naming the target language
 * - ISO 639-1 and ISO 639-2 language code support
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: SRT validation and chunking
 * - `translation`: Chunk translation service and prompt building
 * - `providers`: Completion service clients (`openai`, `mock`)
 * - `app_controller`: Validate, chunk, translate, write
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod subtitle_processor;
pub mod translation;
pub mod app_controller;
pub mod language_utils;
pub mod providers;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunOutcome, RunState};
pub use subtitle_processor::{SubtitleDocument, is_valid_srt, split_srt_by_length};
pub use translation::TranslationService;
pub use errors::{AppError, ProviderError, SubtitleError, TranslationError};
