//! Provider context assembly.
//!
//! Turns the stored transcript into the ordered turn sequence sent to the
//! completion provider: one system directive, then the conversation history
//! in chronological order.

use parley_types::config::ChatSettings;
use parley_types::llm::{Turn, TurnRole};
use parley_types::message::Transcript;

/// Builds provider turn sequences from a transcript.
#[derive(Debug, Clone)]
pub struct ContextBuilder {
    system_prompt: String,
    /// Most recent messages to keep; `None` keeps the whole history.
    max_history_messages: Option<usize>,
}

impl ContextBuilder {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            max_history_messages: None,
        }
    }

    pub fn from_settings(settings: &ChatSettings) -> Self {
        Self::new(settings.system_prompt.clone()).with_max_history(settings.max_history_messages)
    }

    pub fn with_max_history(mut self, max_history_messages: Option<usize>) -> Self {
        self.max_history_messages = max_history_messages;
        self
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Build the turn sequence for `transcript`.
    ///
    /// The first turn is always the system directive; message text is passed
    /// through verbatim.
    pub fn build(&self, transcript: &Transcript) -> Vec<Turn> {
        let messages = transcript.messages();
        let skip = match self.max_history_messages {
            Some(max) => messages.len().saturating_sub(max),
            None => 0,
        };

        let mut turns = Vec::with_capacity(messages.len() - skip + 1);
        turns.push(Turn::system(self.system_prompt.clone()));
        turns.extend(messages[skip..].iter().map(|m| Turn {
            role: TurnRole::from(m.role),
            content: m.text.clone(),
        }));
        turns
    }
}
