//! `POST /api/quiz/generate`: multiple-choice quiz from document text.

use crate::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use intellect_core::quiz::DEFAULT_QUESTION_COUNT;
use intellect_core::{generate_quiz, QuizError};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizBody {
    #[serde(default)]
    document_text: String,
    question_count: Option<u32>,
}

pub async fn generate(State(state): State<AppState>, body: Bytes) -> Response {
    let body: QuizBody = match serde_json::from_slice(&body) {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(error = %e, "unreadable quiz body");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("Invalid request body: {}", e) })),
            )
                .into_response();
        }
    };
    let count = body.question_count.unwrap_or(DEFAULT_QUESTION_COUNT);
    match generate_quiz(
        state.client.as_ref(),
        &state.config.chat_model,
        &body.document_text,
        count,
    )
    .await
    {
        Ok(quiz) => Json(json!({
            "quiz": quiz,
            "message": "Quiz generated successfully",
        }))
        .into_response(),
        Err(QuizError::InvalidRequest(msg)) => {
            (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "quiz generation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
