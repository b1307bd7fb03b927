//! Mock LLM Provider for testing
//!
//! Returns queued results in order, or a default text response once the
//! queue is empty. Every request is recorded for later inspection.

use crate::completion::{CompletionRequest, CompletionResponse};
use crate::error::Result;
use crate::provider::LlmProvider;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A mock LLM provider that returns queued responses or a default one.
#[derive(Clone)]
pub struct MockProvider {
    responses: Arc<Mutex<VecDeque<Result<CompletionResponse>>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    /// Create a new mock provider.
    #[must_use]
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a successful text response.
    pub fn add_response(&self, content: impl Into<String>) {
        self.push(Ok(CompletionResponse::text(content, "mock-model")));
    }

    /// Queue a failure.
    pub fn add_error(&self, error: crate::Error) {
        self.push(Err(error));
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn push(&self, result: Result<CompletionResponse>) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(result);
    }
}

#[async_trait::async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);

        let mut responses = self.responses.lock().unwrap_or_else(|e| e.into_inner());
        responses
            .pop_front()
            .unwrap_or_else(|| Ok(CompletionResponse::text("mock response", "mock-model")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[tokio::test]
    async fn test_queued_responses_in_order() {
        let provider = MockProvider::new();
        provider.add_response("first");
        provider.add_error(Error::RateLimit);

        let first = provider.complete(CompletionRequest::new("m")).await.unwrap();
        assert_eq!(first.content, "first");

        let second = provider.complete(CompletionRequest::new("m")).await;
        assert!(matches!(second, Err(Error::RateLimit)));

        let fallback = provider.complete(CompletionRequest::new("m")).await.unwrap();
        assert_eq!(fallback.content, "mock response");
        assert_eq!(provider.requests().len(), 3);
    }
}
