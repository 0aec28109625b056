//! Completion client seam: prompt and history in, free-form text out.
//!
//! The pipeline only depends on [`CompletionClient`]; [`GeminiClient`] is the production
//! implementation and [`ScriptedCompletionClient`] replays canned replies for tests.

mod gemini;
mod scripted;

pub use gemini::GeminiClient;
pub use scripted::ScriptedCompletionClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned as the completion text when the model answered with a candidate that has no text.
pub const EMPTY_RESPONSE_SENTINEL: &str = "Sorry, I couldn't generate a response.";
/// Returned as the completion text when the model answered with no candidates at all.
pub const NO_RESPONSE_SENTINEL: &str = "No response received from the AI model.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    #[serde(alias = "assistant")]
    Model,
}

/// One immutable turn of caller-supplied conversation history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// What a model accepts, decided once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelProfile {
    /// Instruction travels in the dedicated `systemInstruction` field.
    SupportsSystemInstruction { model: String },
    /// Instruction is replayed as a leading user/model exchange.
    PlainChatOnly { model: String },
}

impl ModelProfile {
    pub fn model(&self) -> &str {
        match self {
            ModelProfile::SupportsSystemInstruction { model } => model,
            ModelProfile::PlainChatOnly { model } => model,
        }
    }
}

/// Sampling and length parameters sent with every completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_k: Option<u32>,
    pub top_p: Option<f32>,
    pub max_output_tokens: u32,
}

impl GenerationConfig {
    /// Chat turns: near-deterministic so the model follows formatting instructions.
    pub const CHAT: GenerationConfig = GenerationConfig {
        temperature: 0.2,
        top_k: Some(1),
        top_p: Some(0.95),
        max_output_tokens: 8192,
    };

    pub const SVG: GenerationConfig = GenerationConfig {
        temperature: 0.7,
        top_k: None,
        top_p: None,
        max_output_tokens: 4000,
    };

    pub const QUIZ: GenerationConfig = GenerationConfig {
        temperature: 0.7,
        top_k: Some(40),
        top_p: Some(0.95),
        max_output_tokens: 8192,
    };
}

/// A fully composed request ready for the external model.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub profile: ModelProfile,
    pub system_instruction: Option<String>,
    pub turns: Vec<ChatTurn>,
    pub generation: GenerationConfig,
}

/// Raw model output, consumed exactly once by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResult {
    pub raw_text: String,
}

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("completion API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("completion response parse failed: {0}")]
    Parse(String),
}

impl CompletionError {
    /// Upstream HTTP status, when the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            CompletionError::Api { status, .. } => Some(*status),
            CompletionError::Request(e) => e.status().map(|s| s.as_u16()),
            CompletionError::Parse(_) => None,
        }
    }
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResult, CompletionError>;
}
