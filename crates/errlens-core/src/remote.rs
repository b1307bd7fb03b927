//! Remote diagnosis client
//!
//! Builds the diagnosis prompt and performs exactly one chat-completion
//! round-trip. The completion text comes back unparsed; see
//! [`crate::interpreter`]. No retries happen here.

use crate::error::{Error, Result};
use errlens_llm::openai::{DEFAULT_MODEL, DEFAULT_TIMEOUT, OPENAI_API_BASE};
use errlens_llm::{CompletionRequest, LlmProvider, Message, OpenAiConfig, OpenAiProvider};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

const SYSTEM_PROMPT: &str = "You are a React Native expert. Analyze errors and provide \
solutions as a single JSON object with exactly these keys: \"type\", \"cause\", \
\"solution\", \"prevention\". Respond with the JSON object only.";

/// Source of raw diagnosis text for an error message
#[async_trait::async_trait]
pub trait DiagnosisClient: Send + Sync {
    /// Ask the remote service about `error_text`, returning its raw reply
    ///
    /// # Errors
    /// [`Error::Configuration`] for an empty credential (before any network
    /// work), [`Error::RemoteService`] for every transport or API failure
    async fn request_diagnosis(&self, error_text: &str, credential: &str) -> Result<String>;
}

/// Builds a provider bound to one credential
pub trait ProviderFactory: Send + Sync {
    /// Create a provider authenticated with `credential`
    ///
    /// # Errors
    /// Returns error if the provider cannot be constructed
    fn build(&self, credential: &str) -> errlens_llm::Result<Arc<dyn LlmProvider>>;
}

/// Sampling and endpoint settings for the remote request
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteSettings {
    /// OpenAI-compatible base URL
    pub base_url: String,
    /// Model name
    pub model: String,
    /// Sampling temperature, kept low for near-deterministic answers
    pub temperature: f32,
    /// Response length bound
    pub max_tokens: u32,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            base_url: OPENAI_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.3,
            max_tokens: 1000,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Factory producing [`OpenAiProvider`]s
#[derive(Debug, Clone)]
pub struct OpenAiProviderFactory {
    settings: RemoteSettings,
}

impl OpenAiProviderFactory {
    /// Create a factory for the given endpoint settings
    #[must_use]
    pub fn new(settings: RemoteSettings) -> Self {
        Self { settings }
    }
}

impl ProviderFactory for OpenAiProviderFactory {
    fn build(&self, credential: &str) -> errlens_llm::Result<Arc<dyn LlmProvider>> {
        let config = OpenAiConfig::new(credential)
            .with_base_url(&self.settings.base_url)
            .with_model(&self.settings.model)
            .with_timeout(self.settings.timeout);
        Ok(Arc::new(OpenAiProvider::new(config)?))
    }
}

/// Client that asks a chat-completion service for a diagnosis
pub struct RemoteDiagnosisClient<F = OpenAiProviderFactory> {
    factory: F,
    settings: RemoteSettings,
}

impl RemoteDiagnosisClient<OpenAiProviderFactory> {
    /// Create a client talking to an OpenAI-compatible endpoint
    #[must_use]
    pub fn new(settings: RemoteSettings) -> Self {
        Self {
            factory: OpenAiProviderFactory::new(settings.clone()),
            settings,
        }
    }
}

impl<F: ProviderFactory> RemoteDiagnosisClient<F> {
    /// Create a client with a custom provider factory
    #[must_use]
    pub fn with_factory(factory: F, settings: RemoteSettings) -> Self {
        Self { factory, settings }
    }

    fn build_request(&self, error_text: &str) -> CompletionRequest {
        CompletionRequest::new(&self.settings.model)
            .with_message(Message::system(SYSTEM_PROMPT))
            .with_message(Message::user(user_prompt(error_text)))
            .with_temperature(self.settings.temperature)
            .with_max_tokens(self.settings.max_tokens)
    }
}

fn user_prompt(error_text: &str) -> String {
    format!(
        r#"Analyze this React Native error and provide a solution in this exact JSON format:
{{
    "type": "error type here",
    "cause": "detailed cause here",
    "solution": "solution with code examples here",
    "prevention": "prevention tips here"
}}

Error: {error_text}"#
    )
}

#[async_trait::async_trait]
impl<F: ProviderFactory> DiagnosisClient for RemoteDiagnosisClient<F> {
    #[instrument(skip_all)]
    async fn request_diagnosis(&self, error_text: &str, credential: &str) -> Result<String> {
        if credential.trim().is_empty() {
            return Err(Error::configuration(
                "API key not configured. Set analyzer.credential or OPENAI_API_KEY",
            ));
        }

        let provider = self.factory.build(credential)?;
        debug!(provider = provider.name(), "Sending diagnosis request");

        let response = provider.complete(self.build_request(error_text)).await?;
        debug!(
            chars = response.content.len(),
            finish_reason = ?response.finish_reason,
            "Received diagnosis response"
        );

        Ok(response.content)
    }
}
