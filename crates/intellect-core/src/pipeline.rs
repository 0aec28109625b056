//! Chat pipeline: compose one completion request, call the model once, assemble the payload.
//!
//! No retries. An upstream failure is turned into an [`ErrorPayload`] carrying the upstream
//! status so the gateway can forward it.

use crate::config::AppConfig;
use crate::llm::{
    ChatTurn, CompletionClient, CompletionError, CompletionRequest, GenerationConfig,
    ModelProfile, Role,
};
use crate::prompts::select_chat_instruction;
use crate::visual::{assemble, assemble_error, ErrorPayload, ResponsePayload, TurnMode};
use serde::Deserialize;
use thiserror::Error;

/// Model identifiers for the two chat paths.
#[derive(Debug, Clone)]
pub struct ChatModels {
    pub chat_model: String,
    pub thinking_model: String,
}

impl ChatModels {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            chat_model: config.chat_model.clone(),
            thinking_model: config.thinking_model.clone(),
        }
    }

    /// The thinking model rejects `systemInstruction`; the standard model accepts it.
    pub fn profile_for(&self, use_thinking_model: bool) -> ModelProfile {
        if use_thinking_model {
            ModelProfile::PlainChatOnly {
                model: self.thinking_model.clone(),
            }
        } else {
            ModelProfile::SupportsSystemInstruction {
                model: self.chat_model.clone(),
            }
        }
    }
}

/// Wire shape of one history entry: `{ role, parts: [{ text }] }`.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    #[serde(default)]
    pub parts: Vec<HistoryPart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryPart {
    #[serde(default)]
    pub text: String,
}

impl From<HistoryEntry> for ChatTurn {
    fn from(entry: HistoryEntry) -> Self {
        let text = entry
            .parts
            .into_iter()
            .map(|p| p.text)
            .collect::<Vec<_>>()
            .join("\n");
        ChatTurn {
            role: entry.role,
            text,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<ChatTurn>,
    pub mode: TurnMode,
}

/// Prompt composer. History is copied in order; the message is always the final user turn,
/// even when empty.
pub fn compose(models: &ChatModels, request: &ChatRequest) -> CompletionRequest {
    let instruction =
        select_chat_instruction(request.mode.use_thinking_model, request.mode.is_follow_up);
    let mut turns = Vec::with_capacity(request.history.len() + 1);
    turns.extend(request.history.iter().cloned());
    turns.push(ChatTurn::user(request.message.as_str()));
    CompletionRequest {
        profile: models.profile_for(request.mode.use_thinking_model),
        system_instruction: Some(instruction.to_string()),
        turns,
        generation: GenerationConfig::CHAT,
    }
}

#[derive(Error, Debug)]
#[error("chat completion failed with status {status}: {source}")]
pub struct ChatError {
    pub status: u16,
    pub payload: ErrorPayload,
    #[source]
    pub source: CompletionError,
}

pub async fn run_chat(
    client: &dyn CompletionClient,
    models: &ChatModels,
    request: &ChatRequest,
) -> Result<ResponsePayload, ChatError> {
    let completion_request = compose(models, request);
    tracing::info!(
        model = completion_request.profile.model(),
        thinking = request.mode.use_thinking_model,
        follow_up = request.mode.is_follow_up,
        history = request.history.len(),
        "chat turn"
    );

    match client.complete(completion_request).await {
        Ok(completion) => {
            tracing::debug!(
                preview = %completion.raw_text.chars().take(200).collect::<String>(),
                "completion received"
            );
            let payload = assemble(request.mode, &request.message, &completion);
            tracing::info!(
                has_svg = payload.svg_data.is_some(),
                text_len = payload.response_text.len(),
                "chat response assembled"
            );
            Ok(payload)
        }
        Err(source) => {
            let status = source.status().filter(|s| *s >= 400).unwrap_or(500);
            tracing::error!(status, error = %source, "chat completion failed");
            let payload = assemble_error(request.mode, &request.message, &source.to_string());
            Err(ChatError {
                status,
                payload,
                source,
            })
        }
    }
}
