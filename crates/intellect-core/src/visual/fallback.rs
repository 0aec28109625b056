//! Fallback synthesizer: a fixed, topic-appropriate SVG for when no model-generated
//! visualization is available. One shared entry point for chat, chat errors, and `/api/svg`.

use super::topic::Topic;

/// Replaces the explanatory text when the completion produced nothing usable.
pub const FALLBACK_NOTICE: &str =
    "I couldn't generate a custom visualization for this answer, so here is a general diagram of the topic instead.";

/// Used by the final guard when a visualization turn somehow ended up without one.
pub const TROUBLE_GENERATING: &str =
    "I had trouble generating a visualization for this question. Here is a general diagram instead.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackSvg {
    pub topic: Topic,
    pub markup: String,
}

const PHYSICS_SVG: &str = r##"<svg width="600" height="400" xmlns="http://www.w3.org/2000/svg">
  <rect width="600" height="400" fill="#1a1a2e"/>
  <rect x="50" y="200" width="500" height="10" fill="#e1e1e1" id="ground" data-label="Ground surface"/>
  <rect x="100" y="150" width="80" height="50" fill="#ff6b6b" id="object" data-label="Object with mass"/>
  <line x1="180" y1="175" x2="280" y2="175" stroke="#4cc9f0" stroke-width="5" marker-end="url(#arrowhead)" id="force" data-label="Applied force"/>
  <text x="300" y="50" font-family="Arial" font-size="24" fill="white" id="title">Physics Visualization</text>
  <text x="300" y="80" font-family="Arial" font-size="16" fill="white" id="subtitle">Interactive Demonstration</text>
  <text x="220" y="160" font-family="Arial" font-size="16" fill="white" id="force-label">Force</text>
  <text x="140" y="140" font-family="Arial" font-size="16" fill="white" id="mass-label">Mass</text>
  <defs>
    <marker id="arrowhead" markerWidth="10" markerHeight="7" refX="10" refY="3.5" orient="auto">
      <polygon points="0 0, 10 3.5, 0 7" fill="#4cc9f0"/>
    </marker>
  </defs>
</svg>"##;

const MATH_SVG: &str = r##"<svg width="600" height="400" xmlns="http://www.w3.org/2000/svg">
  <rect width="600" height="400" fill="#1a1a2e"/>
  <circle cx="300" cy="200" r="150" fill="none" stroke="#e1e1e1" stroke-width="2" id="unit-circle" data-label="Unit Circle"/>
  <line x1="150" y1="200" x2="450" y2="200" stroke="#e1e1e1" stroke-width="2" id="x-axis" data-label="X-Axis"/>
  <line x1="300" y1="50" x2="300" y2="350" stroke="#e1e1e1" stroke-width="2" id="y-axis" data-label="Y-Axis"/>
  <circle cx="400" cy="200" r="5" fill="#ff6b6b" id="point" data-label="Point on circle"/>
  <line x1="300" y1="200" x2="400" y2="200" stroke="#4cc9f0" stroke-width="2" id="cos-line" data-label="Cosine value"/>
  <line x1="400" y1="200" x2="400" y2="150" stroke="#4ecdc4" stroke-width="2" id="sin-line" data-label="Sine value"/>
  <path d="M 300 200 L 400 200 A 10 10 0 0 0 390 190" fill="none" stroke="#ffd166" stroke-width="2" id="angle" data-label="Angle θ"/>
  <text x="300" y="50" font-family="Arial" font-size="24" fill="white" id="title">Mathematical Concepts</text>
  <text x="300" y="80" font-family="Arial" font-size="16" fill="white" id="subtitle">Interactive Visualization</text>
</svg>"##;

const BIOLOGY_SVG: &str = r##"<svg width="600" height="400" xmlns="http://www.w3.org/2000/svg">
  <rect width="600" height="400" fill="#1a1a2e"/>
  <ellipse cx="300" cy="200" rx="150" ry="100" fill="#2a9d8f" stroke="#e1e1e1" stroke-width="2" id="cell" data-label="Cell membrane"/>
  <circle cx="300" cy="200" r="40" fill="#264653" stroke="#e1e1e1" stroke-width="2" id="nucleus" data-label="Nucleus: Contains genetic material"/>
  <ellipse cx="230" cy="150" rx="25" ry="15" fill="#e76f51" stroke="#e1e1e1" stroke-width="1" id="mitochondria1" data-label="Mitochondria: Powerhouse of the cell"/>
  <ellipse cx="350" cy="230" rx="25" ry="15" fill="#e76f51" stroke="#e1e1e1" stroke-width="1" id="mitochondria2" data-label="Mitochondria: Powerhouse of the cell"/>
  <circle cx="370" cy="170" r="15" fill="#e9c46a" stroke="#e1e1e1" stroke-width="1" id="lysosome" data-label="Lysosome: Contains digestive enzymes"/>
  <path d="M 250 220 C 270 240, 290 240, 310 220" fill="none" stroke="#f4a261" stroke-width="3" id="er" data-label="Endoplasmic Reticulum: Protein synthesis"/>
  <text x="300" y="50" font-family="Arial" font-size="24" fill="white" id="title">Cell Structure</text>
  <text x="300" y="80" font-family="Arial" font-size="16" fill="white" id="subtitle">Interactive Cell Diagram</text>
</svg>"##;

const CHEMISTRY_SVG: &str = r##"<svg width="600" height="400" xmlns="http://www.w3.org/2000/svg">
  <rect width="600" height="400" fill="#1a1a2e"/>
  <circle cx="300" cy="200" r="30" fill="#264653" stroke="#e1e1e1" stroke-width="2" id="nucleus" data-label="Nucleus: Contains protons and neutrons"/>
  <circle cx="300" cy="200" r="5" fill="#e76f51" id="proton1" data-label="Proton: Positive charge"/>
  <circle cx="310" cy="195" r="5" fill="#e76f51" id="proton2" data-label="Proton: Positive charge"/>
  <circle cx="290" cy="205" r="5" fill="#2a9d8f" id="neutron1" data-label="Neutron: No charge"/>
  <circle cx="295" cy="190" r="5" fill="#2a9d8f" id="neutron2" data-label="Neutron: No charge"/>
  <ellipse cx="300" cy="200" rx="100" ry="100" fill="none" stroke="#e9c46a" stroke-width="1" stroke-dasharray="5,5" id="electron-orbit1" data-label="Electron orbit"/>
  <circle cx="400" cy="200" r="4" fill="#4cc9f0" id="electron1" data-label="Electron: Negative charge"/>
  <ellipse cx="300" cy="200" rx="70" ry="70" fill="none" stroke="#e9c46a" stroke-width="1" stroke-dasharray="5,5" id="electron-orbit2" data-label="Electron orbit"/>
  <circle cx="300" cy="130" r="4" fill="#4cc9f0" id="electron2" data-label="Electron: Negative charge"/>
  <text x="300" y="50" font-family="Arial" font-size="24" fill="white" id="title">Atomic Structure</text>
  <text x="300" y="80" font-family="Arial" font-size="16" fill="white" id="subtitle">Interactive Atom Model</text>
</svg>"##;

const HISTORY_SVG: &str = r##"<svg width="600" height="400" xmlns="http://www.w3.org/2000/svg">
  <rect width="600" height="400" fill="#1a1a2e"/>
  <line x1="100" y1="200" x2="500" y2="200" stroke="#e1e1e1" stroke-width="2" id="timeline" data-label="Timeline"/>
  <circle cx="150" cy="200" r="10" fill="#ff6b6b" id="event1" data-label="Historical Event 1"/>
  <circle cx="250" cy="200" r="10" fill="#ff6b6b" id="event2" data-label="Historical Event 2"/>
  <circle cx="350" cy="200" r="10" fill="#ff6b6b" id="event3" data-label="Historical Event 3"/>
  <circle cx="450" cy="200" r="10" fill="#ff6b6b" id="event4" data-label="Historical Event 4"/>
  <text x="150" y="230" font-family="Arial" font-size="12" fill="white" text-anchor="middle" id="date1">1700</text>
  <text x="250" y="230" font-family="Arial" font-size="12" fill="white" text-anchor="middle" id="date2">1800</text>
  <text x="350" y="230" font-family="Arial" font-size="12" fill="white" text-anchor="middle" id="date3">1900</text>
  <text x="450" y="230" font-family="Arial" font-size="12" fill="white" text-anchor="middle" id="date4">2000</text>
  <text x="150" y="170" font-family="Arial" font-size="12" fill="white" text-anchor="middle" id="event1-text">Event 1</text>
  <text x="250" y="170" font-family="Arial" font-size="12" fill="white" text-anchor="middle" id="event2-text">Event 2</text>
  <text x="350" y="170" font-family="Arial" font-size="12" fill="white" text-anchor="middle" id="event3-text">Event 3</text>
  <text x="450" y="170" font-family="Arial" font-size="12" fill="white" text-anchor="middle" id="event4-text">Event 4</text>
  <text x="300" y="50" font-family="Arial" font-size="24" fill="white" id="title">Historical Timeline</text>
  <text x="300" y="80" font-family="Arial" font-size="16" fill="white" id="subtitle">Interactive History Visualization</text>
</svg>"##;

/// Character-based (not byte-based) truncation with a trailing ellipsis.
fn truncate_label(prompt: &str, max_chars: usize) -> String {
    if prompt.chars().count() > max_chars {
        let head: String = prompt.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        prompt.to_string()
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn generic_svg(prompt: &str) -> String {
    let main_label = escape_xml(&truncate_label(prompt, 20));
    let subtitle = escape_xml(&truncate_label(prompt, 30));
    format!(
        r##"<svg width="600" height="400" xmlns="http://www.w3.org/2000/svg">
  <rect width="600" height="400" fill="#1a1a2e"/>
  <circle cx="300" cy="200" r="80" fill="#2a9d8f" id="main-concept" data-label="Main concept"/>
  <circle cx="180" cy="150" r="40" fill="#e9c46a" id="related1" data-label="Related concept 1"/>
  <circle cx="420" cy="150" r="40" fill="#e9c46a" id="related2" data-label="Related concept 2"/>
  <circle cx="180" cy="250" r="40" fill="#e9c46a" id="related3" data-label="Related concept 3"/>
  <circle cx="420" cy="250" r="40" fill="#e9c46a" id="related4" data-label="Related concept 4"/>
  <line x1="230" y1="150" x2="260" y2="170" stroke="#e1e1e1" stroke-width="2" id="connection1" data-label="Connection"/>
  <line x1="370" y1="150" x2="340" y2="170" stroke="#e1e1e1" stroke-width="2" id="connection2" data-label="Connection"/>
  <line x1="230" y1="250" x2="260" y2="230" stroke="#e1e1e1" stroke-width="2" id="connection3" data-label="Connection"/>
  <line x1="370" y1="250" x2="340" y2="230" stroke="#e1e1e1" stroke-width="2" id="connection4" data-label="Connection"/>
  <text x="300" y="200" font-family="Arial" font-size="16" fill="white" text-anchor="middle" id="main-text">{main_label}</text>
  <text x="180" y="150" font-family="Arial" font-size="12" fill="white" text-anchor="middle" id="related1-text">Topic 1</text>
  <text x="420" y="150" font-family="Arial" font-size="12" fill="white" text-anchor="middle" id="related2-text">Topic 2</text>
  <text x="180" y="250" font-family="Arial" font-size="12" fill="white" text-anchor="middle" id="related3-text">Topic 3</text>
  <text x="420" y="250" font-family="Arial" font-size="12" fill="white" text-anchor="middle" id="related4-text">Topic 4</text>
  <text x="300" y="50" font-family="Arial" font-size="24" fill="white" text-anchor="middle" id="title">Interactive Visualization</text>
  <text x="300" y="80" font-family="Arial" font-size="16" fill="white" text-anchor="middle" id="subtitle">{subtitle}</text>
</svg>"##
    )
}

/// Template for an already-classified topic. The prompt only matters for `Generic`.
pub fn template_for(topic: Topic, prompt: &str) -> String {
    match topic {
        Topic::Physics => PHYSICS_SVG.to_string(),
        Topic::Math => MATH_SVG.to_string(),
        Topic::Biology => BIOLOGY_SVG.to_string(),
        Topic::Chemistry => CHEMISTRY_SVG.to_string(),
        Topic::History => HISTORY_SVG.to_string(),
        Topic::Generic => generic_svg(prompt),
    }
}

/// Classify the message and return its template. Cannot fail.
pub fn synthesize(message: &str) -> FallbackSvg {
    let topic = Topic::classify(message);
    tracing::info!(topic = topic.as_str(), "using fallback visualization");
    FallbackSvg {
        topic,
        markup: template_for(topic, message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newton_selects_physics_template() {
        let svg = synthesize("Explain Newton's first law");
        assert_eq!(svg.topic, Topic::Physics);
        assert!(svg.markup.contains(r#"id="force""#));
        assert!(svg.markup.contains(r#"id="arrowhead""#));
    }

    #[test]
    fn every_template_is_a_600_by_400_svg() {
        for msg in ["gravity", "calculus", "dna", "atom", "revolution", "hello"] {
            let svg = synthesize(msg).markup;
            assert!(svg.starts_with(r#"<svg width="600" height="400""#), "{}", msg);
            assert!(svg.trim_end().ends_with("</svg>"), "{}", msg);
        }
    }

    #[test]
    fn generic_truncates_by_chars() {
        let prompt = "Tell me about the lifecycle of stars in galaxies";
        let svg = synthesize(prompt);
        assert_eq!(svg.topic, Topic::Generic);
        assert!(svg.markup.contains(">Tell me about the li...</text>"));
        assert!(svg.markup.contains(">Tell me about the lifecycle of...</text>"));

        // Multi-byte chars must not split.
        let wide = "日本語の質問です日本語の質問です日本語の質問です";
        let svg = synthesize(wide).markup;
        assert!(svg.contains("日本語の質問です日本語の質問です日本語の...</text>"));
    }

    #[test]
    fn generic_short_prompt_has_no_ellipsis() {
        let svg = synthesize("hi").markup;
        assert!(svg.contains(r#"id="main-text">hi</text>"#));
        assert!(svg.contains(r#"id="subtitle">hi</text>"#));
    }

    #[test]
    fn generic_escapes_markup() {
        let svg = synthesize("<b>&</b>").markup;
        assert!(svg.contains("&lt;b&gt;&amp;&lt;/b&gt;"));
        assert_eq!(svg.matches("<svg").count(), 1);
    }
}
