//! Chat service orchestrating one conversation turn at a time.
//!
//! ChatService coordinates the TranscriptStore, ContextBuilder and the
//! completion provider: validate the user text, persist it, ask the provider
//! for a reply (falling back to a synthesized one on failure), persist the
//! reply, and hand back the updated transcript.
//!
//! Every load-mutate-save cycle runs under one async mutex, so concurrent
//! sends are applied in lock order and never overwrite each other.

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{Instrument, debug, info, info_span, warn};

use parley_types::error::ValidationError;
use parley_types::llm::{
    CompletionRequest, CompletionResponse, EMPTY_REPLY_PLACEHOLDER, ProviderError,
};
use parley_types::message::{Message, MessageRole, Transcript};

use crate::context::ContextBuilder;
use crate::fallback::FallbackSynthesizer;
use crate::llm::box_provider::BoxLlmProvider;
use crate::llm::retry::RetryPolicy;
use crate::store::TranscriptStore;

use super::id::MessageIdGenerator;

/// Where the assistant reply of a turn came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    Provider,
    Fallback,
}

/// Result of an accepted turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Full transcript including the new user and assistant messages.
    pub transcript: Transcript,
    pub reply_source: ReplySource,
}

/// Orchestrates conversation turns over a single transcript.
///
/// Generic over `TranscriptStore` to maintain clean architecture
/// (parley-core never depends on parley-infra).
pub struct ChatService<S: TranscriptStore> {
    store: S,
    provider: BoxLlmProvider,
    context: ContextBuilder,
    model: String,
    retry: RetryPolicy,
    ids: MessageIdGenerator,
    /// Last transcript this service loaded or produced. Guards every turn.
    last_known: Mutex<Option<Transcript>>,
}

impl<S: TranscriptStore> ChatService<S> {
    pub fn new(
        store: S,
        provider: BoxLlmProvider,
        context: ContextBuilder,
        model: impl Into<String>,
    ) -> Self {
        Self {
            store,
            provider,
            context,
            model: model.into(),
            retry: RetryPolicy::default(),
            ids: MessageIdGenerator::new(),
            last_known: Mutex::new(None),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Access the transcript store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Trim and check user text. Missing or blank text is rejected.
    pub fn validate(text: Option<&str>) -> Result<String, ValidationError> {
        text.map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_owned)
            .ok_or(ValidationError::EmptyText)
    }

    /// Current transcript.
    ///
    /// A read failure is logged and answered with the last transcript this
    /// service saw (empty if none).
    pub async fn history(&self) -> Transcript {
        let mut last_known = self.last_known.lock().await;
        let transcript = self.load_or_recover(last_known.as_ref()).await;
        *last_known = Some(transcript.clone());
        transcript
    }

    /// Run one turn and return the updated transcript.
    ///
    /// Only validation failures are reported; storage and provider failures
    /// are logged and absorbed.
    pub async fn send(&self, text: Option<&str>) -> Result<Transcript, ValidationError> {
        self.send_with_outcome(text)
            .await
            .map(|outcome| outcome.transcript)
    }

    /// Run one turn and report where the reply came from.
    pub async fn send_with_outcome(
        &self,
        text: Option<&str>,
    ) -> Result<TurnOutcome, ValidationError> {
        let user_text = Self::validate(text)?;

        let mut last_known = self.last_known.lock().await;
        let mut transcript = self.load_or_recover(last_known.as_ref()).await;

        // The user message is made durable before the provider is involved.
        let user_message = self.next_message(&transcript, MessageRole::User, user_text.clone());
        debug!(id = %user_message.id, "Appending user message");
        transcript.push(user_message);
        self.persist(&transcript).await;
        *last_known = Some(transcript.clone());

        let request = CompletionRequest {
            model: self.model.clone(),
            turns: self.context.build(&transcript),
        };

        let (reply, reply_source) = match self.complete_with_retry(&request).await {
            Ok(response) => (response.content, ReplySource::Provider),
            Err(e) => {
                warn!(
                    provider = self.provider.name(),
                    error = %e,
                    "Provider call failed, replying with fallback"
                );
                (
                    FallbackSynthesizer::synthesize(&user_text),
                    ReplySource::Fallback,
                )
            }
        };

        let reply = if reply.trim().is_empty() {
            EMPTY_REPLY_PLACEHOLDER.to_string()
        } else {
            reply.trim().to_string()
        };
        let assistant_message = self.next_message(&transcript, MessageRole::Assistant, reply);
        transcript.push(assistant_message);
        self.persist(&transcript).await;
        *last_known = Some(transcript.clone());

        info!(
            messages = transcript.len(),
            source = ?reply_source,
            "Turn completed"
        );

        Ok(TurnOutcome {
            transcript,
            reply_source,
        })
    }

    /// Call the provider, retrying transient failures per the retry policy.
    async fn complete_with_retry(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let mut attempt: u32 = 1;
        loop {
            let span = info_span!(
                "gen_ai.complete",
                gen_ai.operation.name = "chat",
                gen_ai.provider.name = self.provider.name(),
                gen_ai.request.model = %request.model,
                turns = request.turns.len(),
                attempt,
            );

            match self.provider.complete(request).instrument(span).await {
                Ok(response) => {
                    debug!(
                        gen_ai.usage.input_tokens = response.usage.input_tokens,
                        gen_ai.usage.output_tokens = response.usage.output_tokens,
                        attempt,
                        "Provider reply received"
                    );
                    return Ok(response);
                }
                Err(e) if self.retry.should_retry(attempt, &e) => {
                    let delay = self.retry.backoff_for(attempt);
                    warn!(
                        attempt,
                        max_attempts = self.retry.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Transient provider failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn load_or_recover(&self, last_known: Option<&Transcript>) -> Transcript {
        match self.store.load().await {
            Ok(transcript) => transcript,
            Err(e) => {
                warn!(error = %e, "Failed to load transcript, continuing from last known state");
                last_known.cloned().unwrap_or_default()
            }
        }
    }

    /// Save the transcript; a failure leaves memory ahead of disk.
    async fn persist(&self, transcript: &Transcript) {
        if let Err(e) = self.store.save(transcript).await {
            warn!(
                error = %e,
                messages = transcript.len(),
                "Failed to persist transcript; in-memory state is ahead of storage"
            );
        }
    }

    /// Build a message whose id and timestamp sort after everything in `transcript`.
    fn next_message(&self, transcript: &Transcript, role: MessageRole, text: String) -> Message {
        if let Some(max_id) = transcript.max_id() {
            self.ids.observe(max_id);
        }
        let now = Utc::now();
        let timestamp = match transcript.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        };

        Message {
            id: self.ids.next_id(),
            role,
            text,
            timestamp,
        }
    }
}
