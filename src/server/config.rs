//! Server configuration types

use errlens_core::{AnalysisMode, RemoteSettings};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Environment variable consulted when no credential is configured
pub const CREDENTIAL_ENV: &str = "OPENAI_API_KEY";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Analysis mode settings
#[derive(Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default = "default_true")]
    pub ai_enabled: bool,
    #[serde(default)]
    pub credential: Option<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            ai_enabled: true,
            credential: None,
        }
    }
}

impl fmt::Debug for AnalyzerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyzerConfig")
            .field("ai_enabled", &self.ai_enabled)
            .field("credential", &self.credential.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Completion service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    RemoteSettings::default().base_url
}

fn default_model() -> String {
    RemoteSettings::default().model
}

fn default_temperature() -> f32 {
    RemoteSettings::default().temperature
}

fn default_max_tokens() -> u32 {
    RemoteSettings::default().max_tokens
}

fn default_timeout_secs() -> u64 {
    RemoteSettings::default().timeout.as_secs()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8765
}

impl AppConfig {
    /// Analysis mode, reading the credential from the environment when unset
    pub fn to_mode(&self) -> AnalysisMode {
        self.mode_with_fallback(std::env::var(CREDENTIAL_ENV).ok())
    }

    fn mode_with_fallback(&self, env_credential: Option<String>) -> AnalysisMode {
        let credential = self
            .analyzer
            .credential
            .clone()
            .filter(|c| !c.trim().is_empty())
            .or(env_credential.filter(|c| !c.trim().is_empty()));

        AnalysisMode {
            ai_enabled: self.analyzer.ai_enabled,
            credential,
        }
    }

    /// Settings for the remote diagnosis client
    pub fn remote_settings(&self) -> RemoteSettings {
        RemoteSettings {
            base_url: self.llm.base_url.clone(),
            model: self.llm.model.clone(),
            temperature: self.llm.temperature,
            max_tokens: self.llm.max_tokens,
            timeout: Duration::from_secs(self.llm.timeout_secs),
        }
    }
}
