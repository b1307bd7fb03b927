//! errlens LLM - Chat-completion provider abstraction
//!
//! This crate provides the remote completion plumbing for errlens:
//! - Provider: `LlmProvider` trait shared by every backend
//! - OpenAI: OpenAI-compatible `/chat/completions` provider
//! - Mock: Queue-driven provider for tests
//! - Util: API key masking and error sanitizing

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod completion;
pub mod error;
pub mod message;
pub mod mock;
pub mod openai;
pub mod provider;
pub mod util;

pub use completion::{CompletionRequest, CompletionResponse, TokenUsage};
pub use error::{Error, Result};
pub use message::{Message, MessageRole};
pub use mock::MockProvider;
pub use openai::{OpenAiConfig, OpenAiProvider};
pub use provider::LlmProvider;
