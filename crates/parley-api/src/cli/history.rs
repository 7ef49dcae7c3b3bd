//! `parley history`: print the stored conversation.

use anyhow::Result;
use console::style;

use parley_types::message::{Message, MessageRole};

use crate::state::AppState;

/// Print every message, oldest first.
pub async fn show_history(state: &AppState, json: bool) -> Result<()> {
    let transcript = state.chat_service.history().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&transcript)?);
        return Ok(());
    }

    if transcript.is_empty() {
        println!();
        println!("  {}", style("No messages yet.").dim());
        println!(
            "  Start a conversation with: {}",
            style("parley send \"hello\"").yellow()
        );
        println!();
        return Ok(());
    }

    println!();
    for message in &transcript {
        print_message(message);
    }
    println!(
        "  {}",
        style(format!("{} messages", transcript.len())).dim()
    );
    println!();

    Ok(())
}

pub(crate) fn print_message(message: &Message) {
    let who = match message.role {
        MessageRole::User => style("you").cyan().bold(),
        MessageRole::Assistant => style("assistant").green().bold(),
    };
    println!(
        "  {} {}",
        who,
        style(message.timestamp.format("%Y-%m-%d %H:%M:%S")).dim()
    );
    for line in message.text.lines() {
        println!("    {line}");
    }
    println!();
}
