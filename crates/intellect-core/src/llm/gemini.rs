//! Gemini `generateContent` client over reqwest.
//!
//! API key comes from [`AppConfig`]; the key is sent in the `x-goog-api-key` header and never logged.

use super::{
    ChatTurn, CompletionClient, CompletionError, CompletionRequest, CompletionResult, ModelProfile,
    Role, EMPTY_RESPONSE_SENTINEL, NO_RESPONSE_SENTINEL,
};
use crate::config::AppConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SAFETY_CATEGORIES: &[&str] = &[
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];
const SAFETY_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";
const PLAIN_CHAT_ACK: &str = "I'll follow these instructions.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    pub generation_config: WireGenerationConfig,
    pub safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireGenerationConfig {
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    pub max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct SafetySetting {
    pub category: &'static str,
    pub threshold: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

fn text_content(role: Role, text: &str) -> Content {
    let role = match role {
        Role::User => "user",
        Role::Model => "model",
    };
    Content {
        role: Some(role.to_string()),
        parts: vec![Part {
            text: Some(text.to_string()),
        }],
    }
}

/// Map a composed request onto the wire shape. The profile alone decides where the
/// instruction goes.
pub(crate) fn build_body(request: &CompletionRequest) -> GenerateContentRequest {
    let mut contents = Vec::with_capacity(request.turns.len() + 2);
    let mut system_instruction = None;

    if let Some(instruction) = request.system_instruction.as_deref() {
        match &request.profile {
            ModelProfile::SupportsSystemInstruction { .. } => {
                system_instruction = Some(Content {
                    role: None,
                    parts: vec![Part {
                        text: Some(instruction.to_string()),
                    }],
                });
            }
            ModelProfile::PlainChatOnly { .. } => {
                contents.push(text_content(
                    Role::User,
                    &format!("System instruction: {}", instruction),
                ));
                contents.push(text_content(Role::Model, PLAIN_CHAT_ACK));
            }
        }
    }

    contents.extend(
        request
            .turns
            .iter()
            .map(|ChatTurn { role, text }| text_content(*role, text)),
    );

    GenerateContentRequest {
        contents,
        system_instruction,
        generation_config: WireGenerationConfig {
            temperature: request.generation.temperature,
            top_k: request.generation.top_k,
            top_p: request.generation.top_p,
            max_output_tokens: request.generation.max_output_tokens,
        },
        safety_settings: SAFETY_CATEGORIES
            .iter()
            .map(|&category| SafetySetting {
                category,
                threshold: SAFETY_THRESHOLD,
            })
            .collect(),
    }
}

fn first_candidate_text(response: GenerateContentResponse) -> String {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return NO_RESPONSE_SENTINEL.to_string();
    };
    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        EMPTY_RESPONSE_SENTINEL.to_string()
    } else {
        text
    }
}

/// Production completion client for the Gemini REST API.
pub struct GeminiClient {
    api_key: String,
    api_base: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: &AppConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            api_key: config.google_api_key.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResult, CompletionError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.api_base,
            request.profile.model()
        );
        let body = build_body(&request);
        tracing::debug!(
            model = request.profile.model(),
            turns = body.contents.len(),
            "sending generateContent request"
        );

        let res = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "Gemini API returned an error");
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&text).map_err(|e| CompletionError::Parse(e.to_string()))?;
        let raw_text = first_candidate_text(parsed);
        tracing::debug!(
            preview = %raw_text.chars().take(200).collect::<String>(),
            "Gemini response text"
        );
        Ok(CompletionResult { raw_text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::GenerationConfig;

    fn request(profile: ModelProfile) -> CompletionRequest {
        CompletionRequest {
            profile,
            system_instruction: Some("Be helpful.".to_string()),
            turns: vec![ChatTurn::user("hi"), ChatTurn::model("hello"), ChatTurn::user("why?")],
            generation: GenerationConfig::CHAT,
        }
    }

    #[test]
    fn system_instruction_profile_uses_dedicated_field() {
        let body = build_body(&request(ModelProfile::SupportsSystemInstruction {
            model: "gemini-2.0-flash".into(),
        }));
        assert_eq!(body.contents.len(), 3);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "Be helpful.");
        assert_eq!(json["generationConfig"]["topK"], 1);
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 8192);
        assert_eq!(json["safetySettings"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn plain_chat_profile_replays_instruction_as_turns() {
        let body = build_body(&request(ModelProfile::PlainChatOnly {
            model: "thinker".into(),
        }));
        assert!(body.system_instruction.is_none());
        assert_eq!(body.contents.len(), 5);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "System instruction: Be helpful.");
        assert_eq!(json["contents"][1]["role"], "model");
        assert_eq!(json["contents"][4]["parts"][0]["text"], "why?");
        assert!(json.get("systemInstruction").is_none());
    }

    #[test]
    fn candidate_text_falls_back_to_sentinels() {
        let none: GenerateContentResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(first_candidate_text(none), NO_RESPONSE_SENTINEL);

        let blank: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[]}}]}"#).unwrap();
        assert_eq!(first_candidate_text(blank), EMPTY_RESPONSE_SENTINEL);

        let ok: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"a"},{"text":"b"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(first_candidate_text(ok), "ab");
    }
}
