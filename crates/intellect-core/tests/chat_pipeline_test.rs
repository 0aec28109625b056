//! Chat pipeline test: end-to-end turns through `run_chat` with a scripted completion client.
//!
//! Covers the visualization rules for every flag combination and the documented scenarios
//! (missing SVG fallback, standard-model answer, fenced SVG extraction, follow-up suppression).
//!
//! Run with: `cargo test --test chat_pipeline_test`

use intellect_core::visual::FALLBACK_NOTICE;
use intellect_core::{
    run_chat, ChatModels, ChatRequest, ChatTurn, ModelProfile, ScriptedCompletionClient, TurnMode,
};

fn models() -> ChatModels {
    ChatModels {
        chat_model: "gemini-2.0-flash".to_string(),
        thinking_model: "gemini-2.0-flash-thinking-exp-01-21".to_string(),
    }
}

fn chat(message: &str, thinking: bool, follow_up: bool) -> ChatRequest {
    ChatRequest {
        message: message.to_string(),
        history: Vec::new(),
        mode: TurnMode::new(thinking, follow_up),
    }
}

const COMPLETIONS: &[&str] = &[
    "",
    "Plain answer without any drawing.",
    "Answer 🎈 with a bare <svg width=\"10\"><rect/></svg> inline.",
    "```xml\n<svg width=\"600\" height=\"400\"><circle r=\"4\"/></svg>\n```\nExplanation.",
    "Sorry, I couldn't generate a response.",
    "Quick Recap\neverything after is dropped",
];

#[tokio::test]
async fn visualization_rule_holds_for_every_flag_combination() {
    for &raw in COMPLETIONS {
        for (thinking, follow_up) in [(true, false), (true, true), (false, false), (false, true)] {
            let client = ScriptedCompletionClient::replying(raw);
            let payload = run_chat(&client, &models(), &chat("Explain gravity", thinking, follow_up))
                .await
                .expect("scripted reply succeeds");

            if thinking && !follow_up {
                let svg = payload.svg_data.as_deref().expect("svg required");
                assert!(svg.contains("<svg") && svg.contains("</svg>"), "raw={:?}", raw);
            } else {
                assert_eq!(payload.svg_data, None, "raw={:?} flags={:?}", raw, (thinking, follow_up));
            }
        }
    }
}

#[tokio::test]
async fn newton_without_svg_gets_physics_fallback() {
    let client = ScriptedCompletionClient::replying(
        "Newton's first law says an object keeps its state of motion unless acted on.",
    );
    let payload = run_chat(&client, &models(), &chat("Explain Newton's first law", true, false))
        .await
        .unwrap();

    let svg = payload.svg_data.unwrap();
    assert!(svg.contains(r#"id="force""#));
    assert!(payload.response_text.starts_with(FALLBACK_NOTICE));

    // Thinking model: instruction travels as a leading exchange, not systemInstruction.
    let seen = client.requests();
    assert!(matches!(seen[0].profile, ModelProfile::PlainChatOnly { .. }));
}

#[tokio::test]
async fn standard_model_answer_is_emoji_prefixed_and_svg_free() {
    let client = ScriptedCompletionClient::replying("2 + 2 = 4.");
    let payload = run_chat(&client, &models(), &chat("what's 2+2", false, false))
        .await
        .unwrap();
    assert_eq!(payload.svg_data, None);
    assert_eq!(payload.response_text, "✨ 🔍 💡 📚 2 + 2 = 4.");
    assert!(matches!(
        client.requests()[0].profile,
        ModelProfile::SupportsSystemInstruction { .. }
    ));
}

#[tokio::test]
async fn fenced_svg_is_extracted_and_text_normalized() {
    let raw = "```xml\n<svg width=\"600\" height=\"400\"><line x1=\"0\"/></svg>\n```\n\n\n\nThe line shows motion 🚀.\n\n\n";
    let client = ScriptedCompletionClient::replying(raw);
    let payload = run_chat(&client, &models(), &chat("motion", true, false))
        .await
        .unwrap();
    assert_eq!(
        payload.svg_data.as_deref(),
        Some("<svg width=\"600\" height=\"400\"><line x1=\"0\"/></svg>")
    );
    assert_eq!(payload.response_text, "The line shows motion 🚀.");
}

#[tokio::test]
async fn follow_up_keeps_svg_text_but_returns_null() {
    let raw = "As before: <svg><rect/></svg>";
    let client = ScriptedCompletionClient::replying(raw);
    let mut request = chat("and friction?", true, true);
    request.history = vec![
        ChatTurn::user("Explain force"),
        ChatTurn::model("Force is a push or pull."),
    ];
    let payload = run_chat(&client, &models(), &request).await.unwrap();
    assert_eq!(payload.svg_data, None);
    assert_eq!(client.requests()[0].turns.len(), 3);
}

#[tokio::test]
async fn upstream_error_keeps_mandated_fallback() {
    let client = ScriptedCompletionClient::failing(503, "overloaded");
    let err = run_chat(&client, &models(), &chat("the French revolution", true, false))
        .await
        .unwrap_err();
    assert_eq!(err.status, 503);
    assert!(err.payload.svg_data.unwrap().contains("Historical Timeline"));

    let client = ScriptedCompletionClient::failing(503, "overloaded");
    let err = run_chat(&client, &models(), &chat("the French revolution", false, false))
        .await
        .unwrap_err();
    assert_eq!(err.payload.svg_data, None);
}
