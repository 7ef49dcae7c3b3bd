//! LlmProvider trait definition.
//!
//! This is the core abstraction that all completion providers implement.
//! Uses RPITIT for `complete`.

use parley_types::llm::{CompletionRequest, CompletionResponse, ProviderError};

/// Trait for completion provider backends.
///
/// Implementations perform exactly one outbound call per `complete` and never
/// retry internally; retry policy belongs to the caller.
///
/// Implementations live in parley-infra (e.g., `OpenAiCompatibleProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full reply.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, ProviderError>> + Send;
}
