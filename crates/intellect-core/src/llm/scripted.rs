//! Canned completion client for tests and offline runs.

use super::{CompletionClient, CompletionError, CompletionRequest, CompletionResult};
use async_trait::async_trait;
use std::sync::Mutex;

enum Reply {
    Text(String),
    Failure { status: u16, body: String },
}

/// Replays one fixed reply for every call and records the requests it saw.
pub struct ScriptedCompletionClient {
    reply: Reply,
    seen: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompletionClient {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Reply::Text(text.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16, body: impl Into<String>) -> Self {
        Self {
            reply: Reply::Failure {
                status,
                body: body.into(),
            },
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletionClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResult, CompletionError> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(request);
        }
        match &self.reply {
            Reply::Text(text) => Ok(CompletionResult {
                raw_text: text.clone(),
            }),
            Reply::Failure { status, body } => Err(CompletionError::Api {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}
