//! The query bridge — hands a scoped question to the reasoning service.

use crate::prompt::system_prompt;
use scopedesk_core::credential::Credential;
use scopedesk_core::dataset::ScopedView;
use scopedesk_core::message::{ChatTurn, Role};
use scopedesk_core::provider::{Provider, ProviderRequest};
use std::sync::Arc;
use tracing::{debug, error, info};

/// What the operator sees when the reasoning service fails for any reason.
pub const FALLBACK_MESSAGE: &str = "Sorry, I encountered an error while processing your request.";

/// Answers questions against a scoped view via a [`Provider`].
///
/// Callers must check that the view is non-empty and a credential is
/// present before calling [`QueryBridge::answer`]; the bridge does not
/// re-validate either.
pub struct QueryBridge {
    /// The reasoning service
    provider: Arc<dyn Provider>,

    /// Model selector passed with every request
    model: String,

    /// Temperature setting
    temperature: f32,

    /// Max tokens per answer
    max_tokens: Option<u32>,
}

impl QueryBridge {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.0,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the default max tokens per answer.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Build the request: scoped system prompt, prior turns, new question.
    fn build_request(
        &self,
        credential: &Credential,
        view: &ScopedView,
        history: &[ChatTurn],
        question: &str,
    ) -> ProviderRequest {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatTurn::system(system_prompt(view)));
        messages.extend(
            history
                .iter()
                .filter(|t| matches!(t.role, Role::User | Role::Assistant))
                .cloned(),
        );
        messages.push(ChatTurn::user(question));

        ProviderRequest::new(credential.clone(), self.model.clone(), messages)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens)
    }

    /// Answer `question` using only `view`.
    ///
    /// `history` holds the turns before this question. Provider failures are
    /// logged and replaced with [`FALLBACK_MESSAGE`]; nothing is retried.
    pub async fn answer(
        &self,
        credential: &Credential,
        view: &ScopedView,
        history: &[ChatTurn],
        question: &str,
    ) -> String {
        let request = self.build_request(credential, view, history, question);

        debug!(
            provider = %self.provider.name(),
            model = %self.model,
            rows = view.len(),
            history = history.len(),
            "Dispatching scoped question"
        );

        match self.provider.complete(request).await {
            Ok(response) => {
                if let Some(usage) = &response.usage {
                    info!(
                        model = %response.model,
                        tokens = usage.total_tokens,
                        "Answer received"
                    );
                }
                response.content
            }
            Err(e) => {
                error!(
                    provider = %self.provider.name(),
                    error = %e,
                    "Reasoning service call failed"
                );
                FALLBACK_MESSAGE.to_string()
            }
        }
    }
}
