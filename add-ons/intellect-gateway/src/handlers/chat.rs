//! `POST /api/chat`: one tutoring turn.
//!
//! The body is read as raw bytes and parsed leniently so that a malformed request can still
//! recover the flags (and the topical fallback). With no upstream status to forward, malformed
//! bodies answer 500.

use crate::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use intellect_core::pipeline::HistoryEntry;
use intellect_core::visual::{assemble_error, assemble_unreadable};
use intellect_core::{run_chat, ChatRequest, ChatTurn, TurnMode};
use serde_json::Value;

fn turn_mode(body: &Value) -> TurnMode {
    TurnMode::new(
        body.get("useThinkingModel").and_then(Value::as_bool).unwrap_or(false),
        body.get("isFollowUp").and_then(Value::as_bool).unwrap_or(false),
    )
}

fn history(body: &Value) -> Result<Vec<ChatTurn>, serde_json::Error> {
    match body.get("history") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(raw) => {
            let entries: Vec<HistoryEntry> = serde_json::from_value(raw.clone())?;
            Ok(entries.into_iter().map(ChatTurn::from).collect())
        }
    }
}

pub async fn chat(State(state): State<AppState>, body: Bytes) -> Response {
    let parsed: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "unreadable chat body");
            let payload = assemble_unreadable(&format!("Invalid request body: {}", e));
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response();
        }
    };

    let mode = turn_mode(&parsed);
    let Some(message) = parsed.get("message").and_then(Value::as_str) else {
        tracing::warn!("chat body without message");
        let payload = assemble_error(mode, "", "Message is required");
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response();
    };
    let history = match history(&parsed) {
        Ok(h) => h,
        Err(e) => {
            tracing::warn!(error = %e, "malformed chat history");
            let payload = assemble_error(mode, message, &format!("Invalid history: {}", e));
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response();
        }
    };

    let request = ChatRequest {
        message: message.to_string(),
        history,
        mode,
    };
    match run_chat(state.client.as_ref(), &state.models, &request).await {
        Ok(payload) => Json(payload).into_response(),
        Err(err) => {
            let status =
                StatusCode::from_u16(err.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(err.payload)).into_response()
        }
    }
}
