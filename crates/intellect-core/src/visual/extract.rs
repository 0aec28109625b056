//! Visualization extractor: find one embedded SVG block in free-form model output.
//!
//! Ordered cascade, first pattern that matches anywhere in the text wins. A later pattern is
//! only tried when every earlier one found nothing, even if its match would sit earlier in
//! the text. This is string matching, not an SVG parser: nested or malformed `<svg>` markup can
//! fool it, and only the first match is ever used.

use once_cell::sync::Lazy;
use regex::Regex;

// Fenced patterns tolerate other non-fence content (an XML prolog, comments) around the svg.
static XML_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```xml[^`]*?(<svg.*?</svg>)[^`]*?```").expect("xml fence regex")
});
static ANY_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```[\w-]*[^`]*?(<svg.*?</svg>)[^`]*?```").expect("fence regex")
});
// Some completions spell the fence out instead of emitting backtick characters.
static PLACEHOLDER_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\(triple backticks\)\s*(?:xml)?\s*(<svg.*?</svg>)\s*\(triple backticks\)")
        .expect("placeholder regex")
});
static BARE_SVG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)(<svg.*?</svg>)").expect("bare svg regex"));

/// Which matcher in the cascade produced the visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionPattern {
    XmlFence,
    AnyFence,
    PlaceholderFence,
    BareSvg,
}

impl ExtractionPattern {
    const CASCADE: [ExtractionPattern; 4] = [
        ExtractionPattern::XmlFence,
        ExtractionPattern::AnyFence,
        ExtractionPattern::PlaceholderFence,
        ExtractionPattern::BareSvg,
    ];

    fn regex(&self) -> &'static Regex {
        match self {
            ExtractionPattern::XmlFence => &*XML_FENCE,
            ExtractionPattern::AnyFence => &*ANY_FENCE,
            ExtractionPattern::PlaceholderFence => &*PLACEHOLDER_FENCE,
            ExtractionPattern::BareSvg => &*BARE_SVG,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedVisualization {
    /// The `<svg>…</svg>` markup, trimmed.
    pub svg_markup: String,
    /// The full source span that was removed from the text (fence included).
    pub matched_span: String,
    pub pattern: ExtractionPattern,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub text: String,
    pub visualization: Option<ExtractedVisualization>,
}

/// Run the cascade over raw completion text.
pub fn extract_visualization(raw: &str) -> Extraction {
    for pattern in ExtractionPattern::CASCADE {
        let Some(caps) = pattern.regex().captures(raw) else {
            continue;
        };
        let (Some(whole), Some(svg)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        tracing::debug!(?pattern, len = svg.as_str().len(), "extracted SVG block");
        let mut text = String::with_capacity(raw.len() - whole.len());
        text.push_str(&raw[..whole.start()]);
        text.push_str(&raw[whole.end()..]);
        return Extraction {
            text,
            visualization: Some(ExtractedVisualization {
                svg_markup: svg.as_str().trim().to_string(),
                matched_span: whole.as_str().to_string(),
                pattern,
            }),
        };
    }
    Extraction {
        text: raw.to_string(),
        visualization: None,
    }
}
