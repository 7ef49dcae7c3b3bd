//! Completion provider implementations.
//!
//! Contains the concrete [`LlmProvider`](parley_core::llm::provider::LlmProvider)
//! used in production, plus [`create_provider`] which builds it from
//! configuration.

pub mod openai_compat;

use secrecy::SecretString;

use parley_core::llm::box_provider::BoxLlmProvider;
use parley_types::config::ProviderSettings;
use parley_types::llm::ProviderError;

use self::openai_compat::OpenAiCompatibleProvider;

/// Create a [`BoxLlmProvider`] from provider settings and an optional credential.
///
/// A missing credential is not an error here: the provider reports
/// `MissingCredential` per request and the orchestrator falls back.
pub fn create_provider(
    settings: &ProviderSettings,
    api_key: Option<SecretString>,
) -> Result<BoxLlmProvider, ProviderError> {
    let provider = OpenAiCompatibleProvider::new(settings, api_key)?;
    Ok(BoxLlmProvider::new(provider))
}
