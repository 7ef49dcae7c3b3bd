//! LLM request/response types for Parley.
//!
//! These types model the data shapes for completion provider interactions:
//! the turn sequence sent upstream, the reply, usage, and error handling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::message::MessageRole;

/// Reply text used when the provider answers without any usable content.
pub const EMPTY_REPLY_PLACEHOLDER: &str = "I'm sorry, I couldn't generate a response.";

/// Role of a turn in a provider conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnRole::System => write!(f, "system"),
            TurnRole::User => write!(f, "user"),
            TurnRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for TurnRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(TurnRole::System),
            "user" => Ok(TurnRole::User),
            "assistant" => Ok(TurnRole::Assistant),
            other => Err(format!("invalid turn role: '{other}'")),
        }
    }
}

impl From<MessageRole> for TurnRole {
    fn from(role: MessageRole) -> Self {
        match role {
            MessageRole::User => TurnRole::User,
            MessageRole::Assistant => TurnRole::Assistant,
        }
    }
}

/// A single role-tagged unit of a provider conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
}

impl Turn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::System,
            content: content.into(),
        }
    }
}

/// Request to a completion provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub turns: Vec<Turn>,
}

/// Reply from a completion provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Trimmed reply text (never empty; a placeholder is substituted upstream).
    pub content: String,
    pub model: String,
    pub usage: Usage,
}

/// Token usage reported by the provider, when available.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Errors from completion provider calls.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("no provider credential configured")]
    MissingCredential,

    #[error("authentication failed (HTTP {status}): {body}")]
    AuthenticationFailed { status: u16, body: String },

    #[error("rate limited: {body}")]
    RateLimited { body: String },

    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),
}

impl ProviderError {
    /// Whether a later attempt could plausibly succeed.
    ///
    /// Credential, auth, client-side (4xx) and malformed-body errors are
    /// permanent for the lifetime of the request.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Transport(_)
            | ProviderError::Timeout
            | ProviderError::RateLimited { .. } => true,
            ProviderError::Status { status, .. } => *status >= 500,
            ProviderError::MissingCredential
            | ProviderError::AuthenticationFailed { .. }
            | ProviderError::Deserialization(_) => false,
        }
    }
}
