//! Keyword classification of a user message into a subject area.

/// Subject areas, in match priority order. `Generic` is the no-match fallthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Physics,
    Math,
    Biology,
    Chemistry,
    History,
    Generic,
}

const KEYWORDS: &[(Topic, &[&str])] = &[
    (Topic::Physics, &["physics", "force", "newton", "motion", "gravity"]),
    (Topic::Math, &["math", "equation", "formula", "calculus"]),
    (Topic::Biology, &["biology", "cell", "organism", "dna"]),
    (Topic::Chemistry, &["chemistry", "molecule", "atom", "reaction"]),
    (Topic::History, &["history", "timeline", "century", "revolution"]),
];

impl Topic {
    /// First keyword set with a substring hit in the lowercased message wins, regardless of
    /// where later sets' keywords appear.
    pub fn classify(message: &str) -> Topic {
        let lower = message.to_lowercase();
        KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
            .map(|(topic, _)| *topic)
            .unwrap_or(Topic::Generic)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Physics => "physics",
            Topic::Math => "math",
            Topic::Biology => "biology",
            Topic::Chemistry => "chemistry",
            Topic::History => "history",
            Topic::Generic => "generic",
        }
    }
}
