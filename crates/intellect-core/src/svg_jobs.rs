//! Background SVG generation keyed by chat message id, polled by the client.
//!
//! In-memory only: statuses are lost on restart and never evicted.

use crate::llm::CompletionClient;
use crate::svg_gen::try_generate_svg;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SvgJobStatus {
    Pending,
    Completed {
        #[serde(rename = "svgData")]
        svg_data: String,
    },
    Failed {
        error: String,
    },
}

#[derive(Clone)]
pub struct SvgJobRegistry {
    jobs: Arc<DashMap<String, SvgJobStatus>>,
    client: Arc<dyn CompletionClient>,
    svg_model: String,
}

impl SvgJobRegistry {
    pub fn new(client: Arc<dyn CompletionClient>, svg_model: impl Into<String>) -> Self {
        Self {
            jobs: Arc::new(DashMap::new()),
            client,
            svg_model: svg_model.into(),
        }
    }

    /// Start generation for `message_id` unless a job already exists. Returns the current status.
    pub fn start(&self, message_id: &str, prompt: &str) -> SvgJobStatus {
        match self.jobs.entry(message_id.to_string()) {
            Entry::Occupied(existing) => return existing.get().clone(),
            Entry::Vacant(slot) => {
                slot.insert(SvgJobStatus::Pending);
            }
        }
        tracing::info!(message_id, "starting SVG generation job");

        let jobs = Arc::clone(&self.jobs);
        let client = Arc::clone(&self.client);
        let model = self.svg_model.clone();
        let id = message_id.to_string();
        let prompt = prompt.to_string();
        tokio::spawn(async move {
            let status = match try_generate_svg(client.as_ref(), &model, &prompt).await {
                Ok(svg_data) => SvgJobStatus::Completed { svg_data },
                Err(e) => {
                    tracing::warn!(message_id = %id, error = %e, "SVG generation job failed");
                    SvgJobStatus::Failed {
                        error: e.to_string(),
                    }
                }
            };
            jobs.insert(id, status);
        });
        SvgJobStatus::Pending
    }

    pub fn status(&self, message_id: &str) -> Option<SvgJobStatus> {
        self.jobs.get(message_id).map(|s| s.value().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ScriptedCompletionClient;
    use std::time::Duration;

    async fn settle(registry: &SvgJobRegistry, id: &str) -> SvgJobStatus {
        for _ in 0..100 {
            match registry.status(id) {
                Some(SvgJobStatus::Pending) | None => {
                    tokio::time::sleep(Duration::from_millis(10)).await
                }
                Some(done) => return done,
            }
        }
        panic!("job {} never finished", id);
    }

    #[tokio::test]
    async fn job_completes_and_is_idempotent() {
        let client = Arc::new(ScriptedCompletionClient::replying("```svg\n<svg></svg>\n```"));
        let registry = SvgJobRegistry::new(client.clone(), "svg-model");

        assert_eq!(registry.start("m1", "a circle"), SvgJobStatus::Pending);
        let done = settle(&registry, "m1").await;
        assert_eq!(
            done,
            SvgJobStatus::Completed {
                svg_data: "<svg></svg>".to_string()
            }
        );
        assert_eq!(registry.start("m1", "a circle"), done);
        assert_eq!(client.requests().len(), 1);
    }

    #[tokio::test]
    async fn failures_are_recorded() {
        let registry =
            SvgJobRegistry::new(Arc::new(ScriptedCompletionClient::failing(503, "busy")), "m");
        registry.start("m2", "x");
        match settle(&registry, "m2").await {
            SvgJobStatus::Failed { error } => assert!(error.contains("503")),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(registry.status("unknown"), None);
    }

    #[test]
    fn status_wire_shape() {
        let json = serde_json::to_value(SvgJobStatus::Completed {
            svg_data: "<svg/>".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "status": "completed", "svgData": "<svg/>" }));
        let json = serde_json::to_value(SvgJobStatus::Pending).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "pending" }));
    }
}
