//! Transcript endpoints: read the conversation and submit a turn.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Deserialize;
use serde_json::Value;

use parley_types::error::ValidationError;
use parley_types::message::Transcript;

use crate::http::error::AppError;
use crate::state::AppState;

/// Body of `POST /api/send`.
///
/// `text` stays untyped so a non-string value is reported as a validation
/// error instead of a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    #[serde(default)]
    pub text: Option<Value>,
}

/// GET /api/messages
pub async fn list_messages(State(state): State<AppState>) -> Json<Transcript> {
    Json(state.chat_service.history().await)
}

/// POST /api/send
///
/// Runs the turn on its own task so a client disconnect does not abort it
/// halfway (the user message would be stored without a reply).
pub async fn send_message(
    State(state): State<AppState>,
    payload: Result<Json<SendRequest>, JsonRejection>,
) -> Result<Json<Transcript>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Rejected send body");
        AppError::from(ValidationError::EmptyText)
    })?;
    let text = request
        .text
        .as_ref()
        .and_then(Value::as_str)
        .map(str::to_owned);

    let service = Arc::clone(&state.chat_service);
    let turn = tokio::spawn(async move { service.send(text.as_deref()).await });

    let transcript = turn
        .await
        .map_err(|e| AppError::Internal(format!("turn task failed: {e}")))??;

    Ok(Json(transcript))
}
