use std::sync::LazyLock;

use regex::Regex;

use crate::models::IntentTag;

/// Ordered rule table: first matching pattern wins. Priority is part of
/// the contract — SUBMIT outranks REQUEST outranks DISCUSSION, so an
/// utterance carrying both a submission cue and a request cue classifies
/// as a submission.
const RULES: &[(IntentTag, &[&str])] = &[
    (
        IntentTag::SubmitRecommendation,
        &[
            r"(?i)just watched",
            r"(?i)watched.*and",
            r"(?i)saw.*was",
            r"(?i)finished.*season",
            r"(?i)binged",
            r"(?i)loved",
            r"(?i)hated",
            r"(?i)amazing",
            r"(?i)incredible",
            r"(?i)mind.?blowing",
        ],
    ),
    (
        IntentTag::RequestRecommendation,
        &[
            r"(?i)what.*should.*watch",
            r"(?i)recommend",
            r"(?i)suggest",
            r"(?i)looking for",
            r"(?i)want.*watch",
            r"(?i)need.*movie",
            r"(?i)feel like",
            r"(?i)mood for",
            r"(?i)tonight",
            r"(?i)weekend",
        ],
    ),
    (
        IntentTag::Discussion,
        &[
            r"(?i)what.*think",
            r"(?i)opinion",
            r"(?i)thoughts",
            r"(?i)about",
            r"(?i)review",
        ],
    ),
];

static COMPILED_RULES: LazyLock<Vec<(IntentTag, Vec<Regex>)>> = LazyLock::new(|| {
    RULES
        .iter()
        .map(|(tag, patterns)| {
            let compiled = patterns
                .iter()
                .map(|p| Regex::new(p).expect("invalid intent pattern"))
                .collect();
            (*tag, compiled)
        })
        .collect()
});

/// Classify a raw utterance. Pure and total: no I/O, no failure mode,
/// falls back to `Question` when nothing matches.
pub fn classify(text: &str) -> IntentTag {
    for (tag, patterns) in COMPILED_RULES.iter() {
        if patterns.iter().any(|p| p.is_match(text)) {
            return *tag;
        }
    }

    IntentTag::Question
}
