//! Identity mapping, environment check, and health routes.

use crate::AppState;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use intellect_core::{auth0_id_to_uuid, EnvStatus};
use serde_json::{json, Value};

/// Set by the identity proxy in front of the gateway.
pub const SUBJECT_HEADER: &str = "x-auth0-sub";

pub async fn auth0_uuid(headers: HeaderMap) -> Json<Value> {
    let subject = headers
        .get(SUBJECT_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty());
    match subject {
        Some(sub) => Json(json!({
            "authenticated": true,
            "auth0Id": sub,
            "uuid": auth0_id_to_uuid(sub).to_string(),
        })),
        None => Json(json!({
            "authenticated": false,
            "message": "No authenticated user found",
        })),
    }
}

/// Presence only; values are never returned.
pub async fn check_env(State(state): State<AppState>) -> Json<Value> {
    let status = EnvStatus::collect(&state.config);
    Json(json!({
        "environment": status,
        "models": {
            "chat": state.config.chat_model,
            "thinking": state.config.thinking_model,
            "svg": state.config.svg_model,
        },
    }))
}

pub async fn health() -> &'static str {
    "OK"
}
