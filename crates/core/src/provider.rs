//! Provider trait — the seam to the hosted reasoning service.
//!
//! A Provider takes a conversation and returns free text. Nothing here
//! assumes how the service reasons; it is a request/response boundary.
//!
//! Implementations: OpenAI-compatible endpoints (`scopedesk-providers`),
//! scripted mocks in tests.

use crate::credential::Credential;
use crate::error::ProviderError;
use crate::message::ChatTurn;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single completion request.
///
/// Carries the operator's credential, so it is deliberately not
/// `Serialize`.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// Secret used to authenticate this request
    pub credential: Credential,

    /// The model to use (e.g., "gpt-3.5-turbo")
    pub model: String,

    /// System instructions, history, then the new question
    pub messages: Vec<ChatTurn>,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
}

impl ProviderRequest {
    pub fn new(credential: Credential, model: impl Into<String>, messages: Vec<ChatTurn>) -> Self {
        Self {
            credential,
            model: model.into(),
            messages,
            temperature: default_temperature(),
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

fn default_temperature() -> f32 {
    0.0
}

/// A complete response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// The answer text
    pub content: String,

    /// Token usage statistics
    pub usage: Option<Usage>,

    /// Which model actually responded (may differ from requested)
    pub model: String,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core Provider trait.
///
/// The query bridge calls `complete()` without knowing which backend is in
/// use.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "openai", "openrouter").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError>;

    /// Health check — can we reach the provider with this credential?
    async fn health_check(&self, _credential: &Credential) -> Result<bool, ProviderError> {
        Ok(true)
    }
}
