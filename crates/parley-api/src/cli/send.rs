//! `parley send`: run one conversation turn from the terminal.

use anyhow::Result;
use console::style;

use parley_core::chat::service::ReplySource;

use crate::cli::history::print_message;
use crate::state::AppState;

/// Send `text` through the same orchestrator the HTTP API uses and print
/// the assistant reply.
pub async fn send_message(state: &AppState, text: &str, json: bool) -> Result<()> {
    let outcome = state.chat_service.send_with_outcome(Some(text)).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.transcript)?);
        return Ok(());
    }

    println!();
    if let Some(reply) = outcome.transcript.last() {
        print_message(reply);
    }
    if outcome.reply_source == ReplySource::Fallback {
        let hint = if state.has_credential {
            "provider unavailable, see logs"
        } else {
            "no OPENAI_API_KEY configured"
        };
        println!("  {}", style(format!("(fallback reply: {hint})")).yellow());
        println!();
    }

    Ok(())
}
