//! `POST /api/svg` and the `/api/svg-status` job endpoints.

use crate::AppState;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use intellect_core::generate_svg;
use serde::Deserialize;
use serde_json::{json, Value};

fn required_str<'a>(body: &'a Value, field: &str) -> Option<&'a str> {
    body.get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Always 200 with `svgData` once a prompt is present; generation failures use the fallback.
pub async fn svg(State(state): State<AppState>, body: Bytes) -> Response {
    let parsed: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let Some(prompt) = required_str(&parsed, "prompt") else {
        return prompt_required();
    };
    tracing::info!(prompt_len = prompt.len(), "direct SVG request");
    let svg_data = generate_svg(state.client.as_ref(), &state.config.svg_model, prompt).await;
    Json(json!({ "svgData": svg_data })).into_response()
}

fn prompt_required() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "Prompt is required" })),
    )
        .into_response()
}

fn message_id_required() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "Message ID is required" })),
    )
        .into_response()
}

pub async fn svg_status_start(State(state): State<AppState>, body: Bytes) -> Response {
    let parsed: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let Some(message_id) = required_str(&parsed, "messageId") else {
        return message_id_required();
    };
    let Some(prompt) = required_str(&parsed, "prompt") else {
        return prompt_required();
    };
    Json(state.svg_jobs.start(message_id, prompt)).into_response()
}

#[derive(Debug, Deserialize)]
pub struct SvgStatusQuery {
    #[serde(rename = "messageId")]
    message_id: Option<String>,
}

pub async fn svg_status_get(
    State(state): State<AppState>,
    Query(query): Query<SvgStatusQuery>,
) -> Response {
    let Some(message_id) = query.message_id.filter(|id| !id.trim().is_empty()) else {
        return message_id_required();
    };
    match state.svg_jobs.status(&message_id) {
        Some(status) => Json(status).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "No SVG generation found for this message ID" })),
        )
            .into_response(),
    }
}
