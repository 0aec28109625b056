//! intellect-core: tutoring chat pipeline (prompt composition, Gemini completion client,
//! SVG extraction, text cleanup, fallback visualizations) plus SVG jobs, quiz generation,
//! and identity mapping.
//!
//! The gateway depends only on this crate's public API.

mod config;
pub mod identity;
pub mod llm;
pub mod pipeline;
pub mod prompts;
pub mod quiz;
pub mod svg_gen;
pub mod svg_jobs;
pub mod visual;

// Configuration
pub use config::{
    AppConfig, ConfigError, EnvStatus, DEFAULT_API_BASE, DEFAULT_CHAT_MODEL, DEFAULT_SVG_MODEL,
    DEFAULT_THINKING_MODEL,
};

// Completion seam
pub use llm::{
    ChatTurn, CompletionClient, CompletionError, CompletionRequest, CompletionResult,
    GeminiClient, GenerationConfig, ModelProfile, Role, ScriptedCompletionClient,
};

// Chat pipeline
pub use pipeline::{compose, run_chat, ChatError, ChatModels, ChatRequest, HistoryEntry};
pub use visual::{ErrorPayload, ResponsePayload, Topic, TurnMode};

// Side endpoints
pub use identity::auth0_id_to_uuid;
pub use quiz::{generate_quiz, QuizError, QuizQuestion};
pub use svg_gen::{generate_svg, try_generate_svg, SvgGenerationError};
pub use svg_jobs::{SvgJobRegistry, SvgJobStatus};
