//! OpenAI-compatible completion provider.
//!
//! Sends one non-streaming request to `{base_url}/chat/completions` with a
//! bearer credential and returns the first choice's text. Works against
//! OpenAI and any server exposing the same endpoint.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is only exposed
//! when building the `Authorization` header.

pub mod types;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use parley_core::llm::provider::LlmProvider;
use parley_types::config::ProviderSettings;
use parley_types::llm::{
    CompletionRequest, CompletionResponse, EMPTY_REPLY_PLACEHOLDER, ProviderError, Usage,
};

use self::types::{ChatCompletionBody, ChatCompletionResponse, ChatMessage};

/// Provider for any OpenAI-compatible Chat Completions API.
///
/// Does NOT derive Debug so the credential can never end up in output.
pub struct OpenAiCompatibleProvider {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    provider_name: String,
    base_url: String,
    model: String,
}

impl OpenAiCompatibleProvider {
    /// Create a provider from settings.
    ///
    /// The reqwest client carries the per-request deadline
    /// (`request_timeout_secs`).
    pub fn new(
        settings: &ProviderSettings,
        api_key: Option<SecretString>,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| ProviderError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            provider_name: settings.name.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
        })
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// The default model for this provider.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_credential(&self) -> bool {
        self.credential().is_some()
    }

    fn credential(&self) -> Option<&str> {
        self.api_key
            .as_ref()
            .map(|k| k.expose_secret())
            .filter(|k| !k.trim().is_empty())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Convert a generic [`CompletionRequest`] into the wire body.
    ///
    /// An empty request model means "use the configured default".
    fn build_body(&self, request: &CompletionRequest) -> ChatCompletionBody {
        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        ChatCompletionBody {
            model,
            messages: request
                .turns
                .iter()
                .map(|t| ChatMessage {
                    role: t.role.to_string(),
                    content: t.content.clone(),
                })
                .collect(),
        }
    }
}

/// Map a non-success HTTP status and its body to a [`ProviderError`].
fn status_error(status: u16, body: String) -> ProviderError {
    match status {
        401 | 403 => ProviderError::AuthenticationFailed { status, body },
        429 => ProviderError::RateLimited { body },
        _ => ProviderError::Status { status, body },
    }
}

fn transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Transport(e.to_string())
    }
}

/// Turn a parsed response into a [`CompletionResponse`].
///
/// Absent or blank content becomes [`EMPTY_REPLY_PLACEHOLDER`].
fn into_completion(parsed: ChatCompletionResponse, requested_model: String) -> CompletionResponse {
    let content = match parsed.first_content().map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => EMPTY_REPLY_PLACEHOLDER.to_string(),
    };
    let usage = parsed.usage.unwrap_or_default();

    CompletionResponse {
        content,
        model: parsed.model.unwrap_or(requested_model),
        usage: Usage {
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
        },
    }
}

impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.provider_name
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let Some(api_key) = self.credential() else {
            return Err(ProviderError::MissingCredential);
        };

        let body = self.build_body(request);
        let model = body.model.clone();

        let response = self
            .client
            .post(self.url("/chat/completions"))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), error_body));
        }

        let text = response.text().await.map_err(transport_error)?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&text).map_err(|e| {
            ProviderError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        Ok(into_completion(parsed, model))
    }
}
