//! Response assembler: turn one raw completion into the `{ responseText, svgData }` payload.
//!
//! A turn on the thinking model that is not a follow-up MUST carry an SVG. Every other turn
//! MUST carry `null`. [`ensure_visualization`] re-checks both rules on the way out.

use super::extract::extract_visualization;
use super::fallback::{self, FALLBACK_NOTICE, TROUBLE_GENERATING};
use super::sanitize::sanitize;
use super::topic::Topic;
use crate::llm::{CompletionResult, EMPTY_RESPONSE_SENTINEL, NO_RESPONSE_SENTINEL};
use serde::{Deserialize, Serialize};

/// Shown as `responseText` whenever the completion call itself failed.
pub const ERROR_APOLOGY: &str = "I'm sorry, I encountered an error while processing your request.";

/// Caller flags for one chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TurnMode {
    pub use_thinking_model: bool,
    pub is_follow_up: bool,
}

impl TurnMode {
    pub fn new(use_thinking_model: bool, is_follow_up: bool) -> Self {
        Self {
            use_thinking_model,
            is_follow_up,
        }
    }

    pub fn mandates_visualization(&self) -> bool {
        self.use_thinking_model && !self.is_follow_up
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePayload {
    pub response_text: String,
    pub svg_data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub error: String,
    pub response_text: String,
    pub svg_data: Option<String>,
}

fn is_placeholder_text(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || trimmed == EMPTY_RESPONSE_SENTINEL || trimmed == NO_RESPONSE_SENTINEL
}

fn looks_like_svg(markup: &str) -> bool {
    markup.contains("<svg") && markup.contains("</svg>")
}

/// Build the payload for a successful completion.
pub fn assemble(mode: TurnMode, message: &str, completion: &CompletionResult) -> ResponsePayload {
    let payload = if !mode.mandates_visualization() {
        // Follow-ups and the standard model never extract, even if the text holds an <svg>.
        ResponsePayload {
            response_text: sanitize(&completion.raw_text, message),
            svg_data: None,
        }
    } else {
        let extraction = extract_visualization(&completion.raw_text);
        match extraction.visualization {
            Some(vis) => ResponsePayload {
                response_text: sanitize(&extraction.text, message),
                svg_data: Some(vis.svg_markup),
            },
            None => {
                tracing::warn!("no SVG block in completion, synthesizing fallback");
                let fallback = fallback::synthesize(message);
                let response_text = if is_placeholder_text(&extraction.text) {
                    FALLBACK_NOTICE.to_string()
                } else {
                    let cleaned = sanitize(&extraction.text, message);
                    if cleaned.is_empty() {
                        FALLBACK_NOTICE.to_string()
                    } else {
                        format!("{}\n\n{}", FALLBACK_NOTICE, cleaned)
                    }
                };
                ResponsePayload {
                    response_text,
                    svg_data: Some(fallback.markup),
                }
            }
        }
    };
    ensure_visualization(payload, mode, message)
}

/// Final guard: enforce the svg-present / svg-null rule regardless of how the payload was built.
/// A repaired visualization turn has its text replaced, not prefixed.
pub fn ensure_visualization(
    mut payload: ResponsePayload,
    mode: TurnMode,
    message: &str,
) -> ResponsePayload {
    if !mode.mandates_visualization() {
        payload.svg_data = None;
        return payload;
    }
    let valid = payload.svg_data.as_deref().map(looks_like_svg).unwrap_or(false);
    if !valid {
        tracing::warn!("visualization turn lost its SVG, applying generic template");
        payload.svg_data = Some(fallback::template_for(Topic::Generic, message));
        payload.response_text = TROUBLE_GENERATING.to_string();
    }
    payload
}

/// Payload for a failed completion call. Mandated turns still get their topical fallback.
pub fn assemble_error(mode: TurnMode, message: &str, error: &str) -> ErrorPayload {
    let svg_data = if mode.mandates_visualization() {
        Some(fallback::synthesize(message).markup)
    } else {
        None
    };
    ErrorPayload {
        error: error.to_string(),
        response_text: ERROR_APOLOGY.to_string(),
        svg_data,
    }
}

/// Payload when the request body could not be read at all: flags are unknown, so the generic
/// template is returned.
pub fn assemble_unreadable(error: &str) -> ErrorPayload {
    ErrorPayload {
        error: error.to_string(),
        response_text: ERROR_APOLOGY.to_string(),
        svg_data: Some(fallback::template_for(Topic::Generic, "Visualization")),
    }
}
