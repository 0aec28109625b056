//! Direct SVG generation for `/api/svg` and the status jobs.

use crate::llm::{
    ChatTurn, CompletionClient, CompletionError, CompletionRequest, GenerationConfig, ModelProfile,
};
use crate::prompts::{svg_user_prompt, SVG_SYSTEM};
use crate::visual::fallback;
use thiserror::Error;

const FENCE_OPENERS: &[&str] = &["```svg\n", "```xml\n", "```html\n"];

#[derive(Error, Debug)]
pub enum SvgGenerationError {
    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error("no <svg> opening tag in model output")]
    MissingOpenTag,

    #[error("no </svg> closing tag in model output")]
    MissingCloseTag,
}

/// Strip markdown fences and cut the text down to first `<svg` … last `</svg>`.
pub fn clean_svg_output(raw: &str) -> Result<String, SvgGenerationError> {
    let mut text = raw.to_string();
    for opener in FENCE_OPENERS {
        text = text.replace(opener, "");
    }
    text = text.replace("```", "");

    let start = text.find("<svg").ok_or(SvgGenerationError::MissingOpenTag)?;
    let text = &text[start..];
    let end = text
        .rfind("</svg>")
        .ok_or(SvgGenerationError::MissingCloseTag)?;
    Ok(text[..end + "</svg>".len()].trim().to_string())
}

pub async fn try_generate_svg(
    client: &dyn CompletionClient,
    model: &str,
    prompt: &str,
) -> Result<String, SvgGenerationError> {
    let request = CompletionRequest {
        profile: ModelProfile::SupportsSystemInstruction {
            model: model.to_string(),
        },
        system_instruction: Some(SVG_SYSTEM.to_string()),
        turns: vec![ChatTurn::user(svg_user_prompt(prompt))],
        generation: GenerationConfig::SVG,
    };
    let completion = client.complete(request).await?;
    let svg = clean_svg_output(&completion.raw_text)?;
    tracing::info!(len = svg.len(), "generated SVG");
    Ok(svg)
}

/// Always yields markup: any failure falls back to the topical template for `prompt`.
pub async fn generate_svg(client: &dyn CompletionClient, model: &str, prompt: &str) -> String {
    match try_generate_svg(client, model, prompt).await {
        Ok(svg) => svg,
        Err(e) => {
            tracing::warn!(error = %e, "SVG generation failed, using fallback");
            fallback::synthesize(prompt).markup
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ScriptedCompletionClient;

    #[test]
    fn cleans_fences_and_surrounding_text() {
        let raw = "Here you go:\n```svg\n<svg width=\"600\"><g/></svg>\n```\nEnjoy!";
        assert_eq!(
            clean_svg_output(raw).unwrap(),
            "<svg width=\"600\"><g/></svg>"
        );
    }

    #[test]
    fn keeps_everything_up_to_last_close_tag() {
        let raw = "<svg><svg></svg></svg> trailing";
        assert_eq!(clean_svg_output(raw).unwrap(), "<svg><svg></svg></svg>");
    }

    #[test]
    fn missing_tags_are_errors() {
        assert!(matches!(
            clean_svg_output("nothing here"),
            Err(SvgGenerationError::MissingOpenTag)
        ));
        assert!(matches!(
            clean_svg_output("<svg width=\"1\">"),
            Err(SvgGenerationError::MissingCloseTag)
        ));
    }

    #[tokio::test]
    async fn failure_falls_back_to_template() {
        let client = ScriptedCompletionClient::failing(500, "down");
        let svg = generate_svg(&client, "m", "chemical reaction").await;
        assert!(svg.contains("Atomic Structure"));

        let client = ScriptedCompletionClient::replying("I can't draw that.");
        let svg = generate_svg(&client, "m", "timeline of Rome").await;
        assert!(svg.contains("Historical Timeline"));
    }

    #[tokio::test]
    async fn sends_svg_generation_parameters() {
        let client = ScriptedCompletionClient::replying("<svg></svg>");
        let svg = generate_svg(&client, "svg-model", "a cat").await;
        assert_eq!(svg, "<svg></svg>");
        let seen = client.requests();
        assert_eq!(seen[0].generation, GenerationConfig::SVG);
        assert_eq!(seen[0].profile.model(), "svg-model");
        assert!(seen[0].turns[0].text.contains("\"a cat\""));
    }
}
