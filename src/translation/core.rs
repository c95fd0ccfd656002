/*!
 * Core translation service implementation.
 *
 * `TranslationService` turns one subtitle chunk into one completion request,
 * sends it to a provider and returns the trimmed text of the first candidate.
 * There is no retry: any provider error is returned to the caller as is.
 */

use log::{debug, warn};
use std::time::{Duration, Instant};

use crate::app_config::{PromptStyle, TranslationConfig};
use crate::errors::TranslationError;
use crate::providers::Provider;
use crate::providers::openai::{CompletionRequest, CompletionResponse, OpenAI};
use super::prompts::{PromptTemplate, build_prompt};

/// Token usage statistics for tracking API consumption
#[derive(Debug, Clone)]
pub struct TokenUsageStats {
    /// Number of prompt tokens
    pub prompt_tokens: u64,

    /// Number of completion tokens
    pub completion_tokens: u64,

    /// Total time spent on API requests
    pub api_duration: Duration,

    /// Requests sent
    pub requests: usize,

    /// Completions cut off by the token limit
    pub truncated: usize,
}

impl Default for TokenUsageStats {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenUsageStats {
    /// Create a new empty token usage stats instance
    pub fn new() -> Self {
        Self {
            prompt_tokens: 0,
            completion_tokens: 0,
            api_duration: Duration::from_secs(0),
            requests: 0,
            truncated: 0,
        }
    }

    /// Record one completed request
    pub fn record(&mut self, response: &CompletionResponse, elapsed: Duration) {
        self.requests += 1;
        self.api_duration += elapsed;
        if let Some(usage) = &response.usage {
            self.prompt_tokens += u64::from(usage.prompt_tokens);
            self.completion_tokens += u64::from(usage.completion_tokens);
        }
        if response.choices.first().is_some_and(|c| c.is_truncated()) {
            self.truncated += 1;
        }
    }

    /// Total tokens consumed
    pub fn total_tokens(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }

    /// Generate a one-line summary of token usage
    pub fn summary(&self) -> String {
        format!(
            "{} request(s), {} prompt + {} completion = {} tokens in {:.1}s, {} truncated",
            self.requests,
            self.prompt_tokens,
            self.completion_tokens,
            self.total_tokens(),
            self.api_duration.as_secs_f64(),
            self.truncated
        )
    }
}

/// Main translation service for subtitle chunks
#[derive(Debug)]
pub struct TranslationService<P = OpenAI> {
    /// Provider implementation
    provider: P,

    /// Configuration for the translation service
    pub config: TranslationConfig,

    /// Instruction used in `PromptStyle::Instruct` mode
    pub template: PromptTemplate,

    /// Token usage collected so far
    stats: TokenUsageStats,
}

impl TranslationService<OpenAI> {
    /// Create a translation service talking to the configured OpenAI endpoint
    pub fn new(config: TranslationConfig) -> Self {
        let provider = OpenAI::from_config(&config);
        Self::with_provider(provider, config)
    }
}

impl<P> TranslationService<P>
where
    P: Provider<Request = CompletionRequest, Response = CompletionResponse>,
{
    /// Create a translation service around an existing provider
    pub fn with_provider(provider: P, config: TranslationConfig) -> Self {
        Self {
            provider,
            config,
            template: PromptTemplate::default(),
            stats: TokenUsageStats::new(),
        }
    }

    /// Access the underlying provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Token usage collected so far
    pub fn stats(&self) -> &TokenUsageStats {
        &self.stats
    }

    /// Prompt style in use
    pub fn prompt_style(&self) -> PromptStyle {
        self.config.prompt_style
    }

    /// Build the completion request for one chunk
    pub fn build_request(&self, chunk: &str, target_language: &str) -> CompletionRequest {
        let prompt = build_prompt(self.config.prompt_style, &self.template, chunk, target_language);
        CompletionRequest::new(self.config.model.clone(), prompt)
            .max_tokens(self.config.max_tokens)
            .temperature(self.config.temperature)
            .candidates(self.config.candidates)
    }

    /// Translate one chunk and return the first candidate's trimmed text
    pub async fn translate_chunk(&mut self, chunk: &str, target_language: &str) -> Result<String, TranslationError> {
        let request = self.build_request(chunk, target_language);

        let start = Instant::now();
        let response = self.provider.complete(request).await?;
        let elapsed = start.elapsed();
        self.stats.record(&response, elapsed);

        if response.choices.first().is_some_and(|c| c.is_truncated()) {
            warn!(
                "Completion hit the {} token limit, translated text for this chunk is truncated",
                self.config.max_tokens
            );
        }

        let text = P::extract_text(&response);
        debug!("Chunk translated in {:?} ({} -> {} chars)", elapsed, chunk.chars().count(), text.chars().count());

        Ok(text)
    }

    /// Test the connection to the completion service
    pub async fn test_connection(&self) -> Result<(), TranslationError> {
        self.provider.test_connection().await?;
        Ok(())
    }
}
