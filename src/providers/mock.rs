/*!
 * Mock provider implementation for testing.
 *
 * Speaks the same request/response types as the OpenAI provider so it can be
 * dropped into a `TranslationService` without network access:
 * - `MockProvider::echo()` - returns the prompt as the completion
 * - `MockProvider::failing()` - always fails with an API error
 * - `MockProvider::fail_after(n)` - succeeds `n` times, then fails
 * - `MockProvider::truncated()` - echoes but reports `finish_reason: "length"`
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::Provider;
use crate::providers::openai::{CompletionChoice, CompletionRequest, CompletionResponse, TokenUsage};

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds, echoing the prompt
    Echo,
    /// Always fails with an error
    Failing,
    /// Succeeds for the first `successes` requests, then fails
    FailAfter { successes: usize },
    /// Echoes the prompt but flags the completion as cut off
    Truncated,
}

/// Mock provider for testing translation behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter
    request_count: Arc<AtomicUsize>,
    /// Every request received, in order
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock provider that echoes its prompt
    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that fails once `successes` requests went through
    pub fn fail_after(successes: usize) -> Self {
        Self::new(MockBehavior::FailAfter { successes })
    }

    /// Create a mock that reports truncated completions
    pub fn truncated() -> Self {
        Self::new(MockBehavior::Truncated)
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Copy of all requests received so far
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }

    fn respond(request: &CompletionRequest, finish_reason: &str) -> CompletionResponse {
        let tokens = request.prompt.split_whitespace().count() as u32;
        CompletionResponse {
            choices: vec![CompletionChoice {
                text: request.prompt.clone(),
                index: 0,
                finish_reason: Some(finish_reason.to_string()),
            }],
            usage: Some(TokenUsage {
                prompt_tokens: tokens,
                completion_tokens: tokens,
                total_tokens: tokens * 2,
            }),
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Request = CompletionRequest;
    type Response = CompletionResponse;

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());

        match self.behavior {
            MockBehavior::Echo => Ok(Self::respond(&request, "stop")),
            MockBehavior::Truncated => Ok(Self::respond(&request, "length")),
            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 500,
                message: "Mock provider failure".to_string(),
            }),
            MockBehavior::FailAfter { successes } => {
                if count < successes {
                    Ok(Self::respond(&request, "stop"))
                } else {
                    Err(ProviderError::ConnectionError(format!(
                        "Mock connection dropped on request {}",
                        count + 1
                    )))
                }
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError("Mock provider unavailable".to_string())),
            _ => Ok(()),
        }
    }

    fn extract_text(response: &CompletionResponse) -> String {
        response.choices.first()
            .map(|choice| choice.text.trim().to_string())
            .unwrap_or_default()
    }
}
