//! Multiple-choice quiz generation from extracted document text.

use crate::llm::{
    ChatTurn, CompletionClient, CompletionError, CompletionRequest, GenerationConfig, ModelProfile,
};
use crate::prompts::quiz_user_prompt;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_QUESTION_COUNT: u32 = 10;
pub const MAX_QUESTION_COUNT: u32 = 20;
pub const MIN_DOCUMENT_CHARS: usize = 100;

static JSON_ARRAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\[\s*\{.*\}\s*\]").expect("json array regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOptions {
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
    #[serde(rename = "C")]
    pub c: String,
    #[serde(rename = "D")]
    pub d: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: QuizOptions,
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Error, Debug)]
pub enum QuizError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("failed to generate quiz: {0}")]
    Completion(#[from] CompletionError),

    #[error("failed to parse quiz data from AI response: {0}")]
    Parse(String),
}

pub fn validate_request(document_text: &str, question_count: u32) -> Result<(), QuizError> {
    if !(1..=MAX_QUESTION_COUNT).contains(&question_count) {
        return Err(QuizError::InvalidRequest(format!(
            "Question count must be between 1 and {}.",
            MAX_QUESTION_COUNT
        )));
    }
    if document_text.trim().chars().count() < MIN_DOCUMENT_CHARS {
        return Err(QuizError::InvalidRequest(
            "The document contains too little text to generate a quiz.".to_string(),
        ));
    }
    Ok(())
}

fn non_empty(questions: Vec<QuizQuestion>) -> Result<Vec<QuizQuestion>, QuizError> {
    if questions.is_empty() || questions.iter().any(|q| q.question.trim().is_empty()) {
        return Err(QuizError::Parse("quiz has an invalid structure".to_string()));
    }
    Ok(questions)
}

/// Strict parse first, then retry on the first `[ { … } ]` span in the text.
pub fn parse_quiz(raw: &str) -> Result<Vec<QuizQuestion>, QuizError> {
    match serde_json::from_str::<Vec<QuizQuestion>>(raw.trim()) {
        Ok(questions) => non_empty(questions),
        Err(strict) => {
            tracing::warn!(error = %strict, "quiz response is not bare JSON, searching for an array");
            let span = JSON_ARRAY
                .find(raw)
                .ok_or_else(|| QuizError::Parse("no JSON array in response".to_string()))?;
            let questions = serde_json::from_str::<Vec<QuizQuestion>>(span.as_str())
                .map_err(|e| QuizError::Parse(e.to_string()))?;
            non_empty(questions)
        }
    }
}

pub async fn generate_quiz(
    client: &dyn CompletionClient,
    model: &str,
    document_text: &str,
    question_count: u32,
) -> Result<Vec<QuizQuestion>, QuizError> {
    validate_request(document_text, question_count)?;
    tracing::info!(question_count, chars = document_text.len(), "generating quiz");

    let request = CompletionRequest {
        profile: ModelProfile::SupportsSystemInstruction {
            model: model.to_string(),
        },
        system_instruction: None,
        turns: vec![ChatTurn::user(quiz_user_prompt(document_text, question_count))],
        generation: GenerationConfig::QUIZ,
    };
    let completion = client.complete(request).await?;
    let quiz = parse_quiz(&completion.raw_text)?;
    tracing::info!(questions = quiz.len(), "quiz generated");
    Ok(quiz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ScriptedCompletionClient;

    const ONE_QUESTION: &str = r#"[{"question":"What do plants absorb?","options":{"A":"Light","B":"Sound","C":"Heat","D":"Salt"},"correctAnswer":"A","explanation":"Photosynthesis uses light."}]"#;

    fn long_text() -> String {
        "Photosynthesis converts light energy into chemical energy. ".repeat(4)
    }

    #[test]
    fn strict_json_parses() {
        let quiz = parse_quiz(ONE_QUESTION).unwrap();
        assert_eq!(quiz.len(), 1);
        assert_eq!(quiz[0].correct_answer, "A");
        assert_eq!(quiz[0].options.d, "Salt");
    }

    #[test]
    fn wrapped_json_is_recovered() {
        let raw = format!("Sure! Here is your quiz:\n```json\n{}\n```", ONE_QUESTION);
        assert_eq!(parse_quiz(&raw).unwrap().len(), 1);
    }

    #[test]
    fn garbage_and_empty_arrays_fail() {
        assert!(matches!(parse_quiz("no quiz today"), Err(QuizError::Parse(_))));
        assert!(matches!(parse_quiz("[]"), Err(QuizError::Parse(_))));
    }

    #[test]
    fn validation_bounds() {
        let text = long_text();
        assert!(validate_request(&text, 1).is_ok());
        assert!(validate_request(&text, 20).is_ok());
        assert!(matches!(validate_request(&text, 0), Err(QuizError::InvalidRequest(_))));
        assert!(matches!(validate_request(&text, 21), Err(QuizError::InvalidRequest(_))));
        assert!(matches!(validate_request("short", 5), Err(QuizError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn generate_uses_quiz_parameters() {
        let client = ScriptedCompletionClient::replying(ONE_QUESTION);
        let quiz = generate_quiz(&client, "quiz-model", &long_text(), 3).await.unwrap();
        assert_eq!(quiz.len(), 1);
        let seen = client.requests();
        assert_eq!(seen[0].generation, GenerationConfig::QUIZ);
        assert!(seen[0].turns[0].text.contains("exactly 3 questions"));
    }
}
