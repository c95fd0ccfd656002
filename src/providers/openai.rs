use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::app_config::TranslationConfig;
use crate::errors::ProviderError;
use crate::providers::Provider;

/// OpenAI client for the text-completion endpoint
#[derive(Debug)]
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API base URL, e.g. `https://api.openai.com/v1`
    endpoint: String,
    /// Model used for connection tests
    model: String,
}

/// Completion request body
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompletionRequest {
    /// The model to use
    pub model: String,

    /// Prompt text
    pub prompt: String,

    /// Maximum number of tokens to generate
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Number of candidates to generate
    pub n: u32,

    /// Stop sequences, omitted when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
}

impl Default for CompletionRequest {
    fn default() -> Self {
        Self {
            model: String::new(),
            prompt: String::new(),
            max_tokens: 100,
            temperature: 0.7,
            n: 1,
            stop: None,
        }
    }
}

impl CompletionRequest {
    /// Create a new completion request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    /// Set the maximum number of generated tokens
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the number of candidates
    pub fn candidates(mut self, n: u32) -> Self {
        self.n = n;
        self
    }
}

/// Token usage information
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// One completion candidate
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CompletionChoice {
    /// Generated text
    pub text: String,

    #[serde(default)]
    pub index: u32,

    /// Why generation stopped ("stop", "length", ...)
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl CompletionChoice {
    /// Whether generation was cut off by the token limit
    pub fn is_truncated(&self) -> bool {
        self.finish_reason.as_deref() == Some("length")
    }
}

/// Completion response
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CompletionResponse {
    /// Generated candidates
    pub choices: Vec<CompletionChoice>,

    /// Token usage information
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl OpenAI {
    /// Create a new OpenAI client
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }

    /// Create a client from the translation configuration
    pub fn from_config(config: &TranslationConfig) -> Self {
        Self::new(
            config.api_key.clone(),
            config.endpoint.clone(),
            config.model.clone(),
            config.timeout_secs,
        )
    }

    fn completions_url(&self) -> String {
        format!("{}/completions", self.endpoint.trim_end_matches('/'))
    }

    // @maps: Non-success HTTP status to a provider error
    fn status_error(status: StatusCode, body: &str) -> ProviderError {
        let message = serde_json::from_str::<ApiErrorBody>(body)
            .map(|b| b.error.message)
            .unwrap_or_else(|_| body.to_string());

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ProviderError::AuthenticationError(message)
            }
            StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(message),
            _ => ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait]
impl Provider for OpenAI {
    type Request = CompletionRequest;
    type Response = CompletionResponse;

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        let api_url = self.completions_url();
        debug!("POST {} ({} prompt chars)", api_url, request.prompt.chars().count());

        let response = self.client.post(&api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ProviderError::ConnectionError(e.to_string())
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("OpenAI API error ({}): {}", status, error_text);
            return Err(Self::status_error(status, &error_text));
        }

        let completion = response.json::<CompletionResponse>().await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        if completion.choices.is_empty() {
            return Err(ProviderError::ParseError("response contained no choices".to_string()));
        }

        Ok(completion)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let request = CompletionRequest::new(self.model.clone(), "Hello").max_tokens(1);
        self.complete(request).await?;
        Ok(())
    }

    fn extract_text(response: &CompletionResponse) -> String {
        response.choices.first()
            .map(|choice| choice.text.trim().to_string())
            .unwrap_or_default()
    }
}
