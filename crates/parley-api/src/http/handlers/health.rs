//! Liveness endpoint.

use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde_json::{Value, json};

/// GET /api/health
///
/// Always answers, independent of storage and provider state.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "time": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}
