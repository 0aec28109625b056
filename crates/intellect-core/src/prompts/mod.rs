//! Prompt templates for tutoring chat, direct SVG generation, and quiz generation.

pub mod chat;
pub mod quiz;
pub mod svg;

pub use chat::{
    select_chat_instruction, FOLLOW_UP_NO_VISUALIZATION, GENERIC_NO_VISUALIZATION,
    NEW_TOPIC_WITH_VISUALIZATION,
};
pub use quiz::{quiz_user_prompt, QUIZ_USER_TEMPLATE};
pub use svg::{svg_user_prompt, SVG_SYSTEM, SVG_USER_TEMPLATE};
