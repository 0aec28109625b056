//! Text sanitizer: strip model meta-commentary, normalize blank lines, and make sure the answer
//! opens with emoji.
//!
//! The meta-commentary strippers TRUNCATE: each deletes from its match to the end of the text.
//! A legitimate "Quick Recap" heading in the middle of an answer loses everything after it.
//! Each stripper is a separate function so that behavior stays visible and replaceable.

use super::topic::Topic;
use once_cell::sync::Lazy;
use regex::Regex;

static IMPROVED_EXAMPLE_STRUCTURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|\n)[^\n]*Improved Example Structure").expect("improved example regex")
});
static SELF_CRITIQUE_LIST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:^|\n)[ \t>#*]*(?:here are (?:some|a few) (?:formatting )?(?:suggestions|improvements|ways to improve)|(?:self-)?critique\s*:|areas for improvement\s*:)",
    )
    .expect("self critique regex")
});
static QUICK_RECAP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:^|\n)[ \t>#*]*quick recap").expect("quick recap regex"));
static IMPLEMENTATION_CONCLUSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|\n)[ \t>*]*By implementing these").expect("conclusion regex")
});
static VISUALIZATION_SENTINEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^Below is an interactive visualization[^\n]*\n*").expect("sentinel regex")
});
static EXCESS_BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n(?:[ \t]*\n){2,}").expect("blank line regex"));

fn truncate_from(pattern: &Regex, text: &str, label: &str) -> String {
    match pattern.find(text) {
        Some(m) => {
            tracing::debug!(pattern = label, at = m.start(), "truncating meta-commentary");
            text[..m.start()].to_string()
        }
        None => text.to_string(),
    }
}

/// "Improved Example Structure" rewrites of the model's own answer.
pub fn strip_improved_example_structure(text: &str) -> String {
    truncate_from(&IMPROVED_EXAMPLE_STRUCTURE, text, "improved_example_structure")
}

/// Numbered self-critique lists ("Here are some suggestions…", "Critique:", "Areas for improvement:").
pub fn strip_self_critique_list(text: &str) -> String {
    truncate_from(&SELF_CRITIQUE_LIST, text, "self_critique_list")
}

pub fn strip_quick_recap(text: &str) -> String {
    truncate_from(&QUICK_RECAP, text, "quick_recap")
}

/// "By implementing these…" closing paragraphs.
pub fn strip_implementation_conclusion(text: &str) -> String {
    truncate_from(&IMPLEMENTATION_CONCLUSION, text, "implementation_conclusion")
}

pub fn remove_visualization_sentinel(text: &str) -> String {
    VISUALIZATION_SENTINEL.replace_all(text, "").into_owned()
}

/// Three or more line breaks (blank lines may hold spaces) become one blank line; ends trimmed.
pub fn collapse_blank_lines(text: &str) -> String {
    EXCESS_BLANK_LINES
        .replace_all(text, "\n\n")
        .trim()
        .to_string()
}

/// True if any char falls in the emoji blocks U+1F300–1F6FF, U+1F900–1F9FF, U+2600–26FF, U+2700–27BF.
pub fn contains_emoji(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(
            c as u32,
            0x1F300..=0x1F6FF | 0x1F900..=0x1F9FF | 0x2600..=0x26FF | 0x2700..=0x27BF
        )
    })
}

pub fn emoji_prefix(topic: Topic) -> &'static str {
    match topic {
        Topic::Physics => "⚛️ 🚀 💫 ",
        Topic::Math => "🔢 📐 ✏️ ",
        Topic::Biology => "🧬 🔬 🌱 ",
        Topic::Chemistry => "🧪 ⚗️ 🔬 ",
        Topic::History => "📜 🏛️ ⏳ ",
        Topic::Generic => "✨ 🔍 💡 📚 ",
    }
}

/// Full sanitizer. Order matters: truncation, then sentinel and blank-line cleanup, then the
/// emoji check runs against the already-cleaned text. Running it twice changes nothing.
pub fn sanitize(text: &str, user_message: &str) -> String {
    let text = strip_improved_example_structure(text);
    let text = strip_self_critique_list(&text);
    let text = strip_quick_recap(&text);
    let text = strip_implementation_conclusion(&text);
    let text = remove_visualization_sentinel(&text);
    let text = collapse_blank_lines(&text);

    if text.is_empty() || contains_emoji(&text) {
        return text;
    }
    format!("{}{}", emoji_prefix(Topic::classify(user_message)), text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn improved_example_structure_truncates_to_end() {
        let text = "Force equals mass times acceleration.\n\nHere's an Improved Example Structure:\n1. Intro\n2. Body";
        assert_eq!(
            strip_improved_example_structure(text),
            "Force equals mass times acceleration.\n"
        );
    }

    #[test]
    fn self_critique_list_truncates_to_end() {
        let text = "Cells divide.\nHere are some suggestions to improve this answer:\n1. Add a diagram\n2. Shorter";
        assert_eq!(strip_self_critique_list(text), "Cells divide.");
        let text = "Atoms bond.\n\nHere are some formatting suggestions\n- use bold";
        assert_eq!(strip_self_critique_list(text), "Atoms bond.\n");
    }

    #[test]
    fn quick_recap_loses_everything_after_it() {
        let text = "Part one.\n## Quick Recap\nrecap\n\nPart two that was legitimate.";
        assert_eq!(strip_quick_recap(text), "Part one.");
    }

    #[test]
    fn implementation_conclusion_truncates() {
        let text = "Step 1.\nStep 2.\nBy implementing these changes, the example is clearer.";
        assert_eq!(strip_implementation_conclusion(text), "Step 1.\nStep 2.");
    }

    #[test]
    fn sentinel_and_blank_lines() {
        let text = "Intro 🎉\n\nBelow is an interactive visualization of the concept:\n\n\n\nMore text\n \n \n\nEnd";
        let out = collapse_blank_lines(&remove_visualization_sentinel(text));
        assert_eq!(out, "Intro 🎉\n\nMore text\n\nEnd");
    }

    #[test]
    fn emoji_injected_only_when_missing() {
        assert_eq!(
            sanitize("Inertia keeps things moving.", "Explain Newton's first law"),
            "⚛️ 🚀 💫 Inertia keeps things moving."
        );
        assert_eq!(sanitize("4 🎯", "what's 2+2"), "4 🎯");
        assert_eq!(sanitize("It is 4.", "what's 2+2"), "✨ 🔍 💡 📚 It is 4.");
        assert_eq!(sanitize("", "anything"), "");
    }

    #[test]
    fn emoji_check_runs_after_truncation() {
        // The only emoji sits in the truncated recap, so a prefix is still injected.
        let out = sanitize("Mitosis splits cells.\nQuick Recap 🧠\n- split", "cell division");
        assert_eq!(out, "🧬 🔬 🌱 Mitosis splits cells.");
    }

    #[test]
    fn sanitizing_twice_is_a_no_op() {
        let raw = "\n\nEquations balance.\n\n\n\nBelow is an interactive visualization:\nBy implementing these ideas you win.";
        let once = sanitize(raw, "math equation");
        let twice = sanitize(&once, "math equation");
        assert_eq!(once, "🔢 📐 ✏️ Equations balance.");
        assert_eq!(once, twice);
    }

    #[test]
    fn mid_line_sentinel_is_left_alone() {
        // Removing it would splice the two lines into an "Improved Example Structure" heading.
        let raw = "Intro 🎉\nImproved Example Below is an interactive visualization\nStructure: x";
        let once = sanitize(raw, "");
        let twice = sanitize(&once, "");
        assert_eq!(once, raw);
        assert_eq!(once, twice);
    }

    #[test]
    fn injected_prefixes_count_as_emoji() {
        for topic in [
            Topic::Physics,
            Topic::Math,
            Topic::Biology,
            Topic::Chemistry,
            Topic::History,
            Topic::Generic,
        ] {
            assert!(contains_emoji(emoji_prefix(topic)), "{:?}", topic);
        }
    }
}
