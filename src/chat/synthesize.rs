use std::sync::Arc;

use serde::Serialize;

use crate::{
    chat::context::{CatalogSnapshot, ContextEntry},
    models::{IntentTag, SearchCandidate},
    services::generation::GenerativeClient,
};

const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 300;
const PROMPT_CONTEXT_ENTRIES: usize = 5;

/// Terminal outcome of the reply cascade. Always produced: no tier is
/// allowed to propagate an error past its own boundary.
#[derive(Debug, Clone)]
pub struct Reply {
    pub text: String,
    pub candidates: Vec<SearchCandidate>,
    pub status: ReplyStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyStatus {
    Completed,
    Error,
}

impl Reply {
    fn completed(text: String, candidates: Vec<SearchCandidate>) -> Self {
        Self {
            text,
            candidates,
            status: ReplyStatus::Completed,
        }
    }
}

/// Three-tier reply cascade: generative call, then a search-only
/// template, then a deterministic rule engine. Modeled as a strategy
/// chain — each tier returns `Some(reply)` or bows out — so a tier can
/// be exercised on its own and the fallback order stays obvious.
pub struct Synthesizer {
    generative: Option<Arc<dyn GenerativeClient>>,
}

impl Synthesizer {
    pub fn new(generative: Option<Arc<dyn GenerativeClient>>) -> Self {
        Self { generative }
    }

    pub async fn synthesize(
        &self,
        message: &str,
        intent: IntentTag,
        extracted_title: Option<&str>,
        snapshot: &CatalogSnapshot,
        candidates: Vec<SearchCandidate>,
    ) -> Reply {
        // The store being down with nothing from search leaves no
        // grounding at all: answer with guidance rather than guessing.
        if candidates.is_empty() && snapshot.is_unavailable() {
            return Reply {
                text: "I'm having trouble reaching the film catalog right now. \
                       Please try again in a moment."
                    .to_string(),
                candidates: Vec::new(),
                status: ReplyStatus::Error,
            };
        }

        if candidates.is_empty() && snapshot.is_empty() {
            return Reply::completed(
                "I don't have any films in the catalog yet! Import a collection \
                 first and I'll have plenty to recommend."
                    .to_string(),
                Vec::new(),
            );
        }

        if let Some(reply) = self.generative_tier(message, snapshot, &candidates).await {
            return reply;
        }
        if let Some(reply) = search_only_tier(&candidates) {
            return reply;
        }
        deterministic_tier(message, intent, extracted_title, snapshot)
    }

    /// Tier 1: one generative-completion call grounded in either the
    /// catalog snapshot or the search candidates. Bows out when the
    /// client is unconfigured or the call fails.
    async fn generative_tier(
        &self,
        message: &str,
        snapshot: &CatalogSnapshot,
        candidates: &[SearchCandidate],
    ) -> Option<Reply> {
        let client = self.generative.as_ref()?;

        let system_prompt = if candidates.is_empty() {
            catalog_prompt(snapshot.entries())
        } else {
            candidate_prompt(candidates)
        };

        match client
            .complete(&system_prompt, message, TEMPERATURE, MAX_TOKENS)
            .await
        {
            Ok(text) => Some(Reply::completed(text, candidates.to_vec())),
            Err(e) => {
                tracing::warn!(error = %e, "Generative completion failed, cascading");
                None
            }
        }
    }
}

fn catalog_prompt(entries: &[ContextEntry]) -> String {
    let context = serde_json::to_string_pretty(&entries[..entries.len().min(PROMPT_CONTEXT_ENTRIES)])
        .unwrap_or_else(|_| "[]".to_string());

    format!(
        "You are a film recommendation assistant for a curated personal collection. \
         Here are the most recently added titles with the curator's ratings:\n\n{}\n\n\
         Help the viewer discover films from this collection. Be conversational and \
         enthusiastic, give specific recommendations, and mention the curator's notes \
         when relevant. Keep responses under 200 words.",
        context
    )
}

fn candidate_prompt(candidates: &[SearchCandidate]) -> String {
    let titles: Vec<&str> = candidates.iter().map(|c| c.title.as_str()).collect();

    format!(
        "You are a film recommendation assistant. A metadata search for the viewer's \
         request turned up {} candidate title(s): {}. Write a short, enthusiastic reply \
         that points the viewer at those suggestions. Keep it under 100 words.",
        candidates.len(),
        titles.join(", ")
    )
}

/// Tier 2: generation is down but search already produced value — hand
/// the candidates over with a canned sentence instead of failing.
fn search_only_tier(candidates: &[SearchCandidate]) -> Option<Reply> {
    if candidates.is_empty() {
        return None;
    }

    let text = if candidates.len() == 1 {
        format!(
            "I found one title matching your request: \"{}\". Take a look at the suggestion below!",
            candidates[0].title
        )
    } else {
        format!(
            "I found {} titles matching your request. Take a look at the suggestions below \
             and tell me if one jumps out!",
            candidates.len()
        )
    };

    Some(Reply::completed(text, candidates.to_vec()))
}

// ---------------------------------------------------------------------------
// Tier 3: deterministic rule engine
// ---------------------------------------------------------------------------

/// One keyword bucket of the rule engine. Message cues decide whether the
/// bucket fires; the hint lists pick matching catalog entries.
struct GenreRule {
    cues: &'static [&'static str],
    title_hints: &'static [&'static str],
    overview_hints: &'static [&'static str],
    genre_ids: &'static [&'static str],
    genre_fragments: &'static [&'static str],
    picks: usize,
    single_lead: &'static str,
    pair_lead: &'static str,
}

const GENRE_RULES: &[GenreRule] = &[
    GenreRule {
        cues: &[
            "sci-fi",
            "sci fi",
            "science fiction",
            "scifi",
            "space",
            "artificial intelligence",
            "future",
        ],
        title_hints: &[
            "inception",
            "interstellar",
            "matrix",
            "blade runner",
            "alien",
            "star",
        ],
        overview_hints: &[
            "space",
            "future",
            "alien",
            "technology",
            "artificial",
            "robot",
            "cyber",
        ],
        genre_ids: &["878"],
        genre_fragments: &["sci"],
        picks: 2,
        single_lead: "Perfect! For sci-fi, I recommend",
        pair_lead: "Great choice! For sci-fi, I'd suggest",
    },
    GenreRule {
        cues: &["horror", "scary", "thriller", "suspense"],
        title_hints: &["horror", "nightmare", "dead"],
        overview_hints: &["horror", "scary", "terror", "killer", "murder"],
        genre_ids: &["27"],
        genre_fragments: &["horror", "thriller"],
        picks: 1,
        single_lead: "For something scary, try",
        pair_lead: "For something scary, try",
    },
    GenreRule {
        cues: &["comedy", "funny", "laugh", "humor"],
        title_hints: &["comedy", "funny"],
        overview_hints: &["comedy", "funny", "humor", "laugh"],
        genre_ids: &["35"],
        genre_fragments: &["comedy"],
        picks: 1,
        single_lead: "For a good laugh, check out",
        pair_lead: "For a good laugh, check out",
    },
];

const GENERAL_CUES: &[&str] = &["recommend", "suggest", "watch", "good"];

fn deterministic_tier(
    message: &str,
    intent: IntentTag,
    extracted_title: Option<&str>,
    snapshot: &CatalogSnapshot,
) -> Reply {
    let lower = message.to_lowercase();
    let entries = snapshot.entries();

    // Submission and discussion turns get intent-shaped replies; the
    // keyword buckets below only make sense for recommendation requests.
    match intent {
        IntentTag::SubmitRecommendation => {
            let text = match extracted_title {
                Some(title) => format!(
                    "Nice! \"{}\" sounds interesting. I'll help you add it to the \
                     collection. What did you think of it?",
                    title
                ),
                None => "That's awesome! What film did you watch? I'd love to add it \
                         to the collection."
                    .to_string(),
            };
            return Reply::completed(text, Vec::new());
        }
        IntentTag::Discussion => {
            return Reply::completed(
                "I'd love to discuss that! What specific film are you thinking about?"
                    .to_string(),
                Vec::new(),
            );
        }
        _ => {}
    }

    for rule in GENRE_RULES {
        if !rule.cues.iter().any(|cue| lower.contains(cue)) {
            continue;
        }

        let mut matches: Vec<&ContextEntry> =
            entries.iter().filter(|e| entry_matches(e, rule)).collect();
        if matches.is_empty() {
            continue;
        }

        // Stable sort: ties keep the snapshot's recency order.
        matches.sort_by(|a, b| b.enthusiasm.cmp(&a.enthusiasm));
        matches.truncate(rule.picks);

        let text = if matches.len() == 1 {
            phrase_single(rule.single_lead, matches[0])
        } else {
            format!(
                "{} \"{}\" or \"{}\". Both are excellent picks from the collection!",
                rule.pair_lead, matches[0].title, matches[1].title
            )
        };

        return Reply::completed(text, Vec::new());
    }

    // Bare recommendation request: top of the catalog by enthusiasm.
    if GENERAL_CUES.iter().any(|cue| lower.contains(cue)) {
        let mut top: Vec<&ContextEntry> =
            entries.iter().filter(|e| e.enthusiasm >= 4).collect();
        top.sort_by(|a, b| b.enthusiasm.cmp(&a.enthusiasm));
        top.truncate(3);

        if top.len() == 1 {
            let text = format!(
                "I highly recommend {} What do you think?",
                phrase_tail(top[0])
            );
            return Reply::completed(text, Vec::new());
        }
        if !top.is_empty() {
            let titles: Vec<String> = top.iter().map(|e| format!("\"{}\"", e.title)).collect();
            let text = format!(
                "Here are the collection's top picks: {}. Any of these sound good to you?",
                titles.join(", ")
            );
            return Reply::completed(text, Vec::new());
        }
    }

    // Nothing matched: show a sample of what's available.
    let sample: Vec<String> = entries
        .iter()
        .take(3)
        .map(|e| format!("\"{}\"", e.title))
        .collect();
    let text = format!(
        "I have {} films in the catalog! Some options include: {}. What genre or mood \
         are you in the mood for?",
        entries.len(),
        sample.join(", ")
    );

    Reply::completed(text, Vec::new())
}

fn entry_matches(entry: &ContextEntry, rule: &GenreRule) -> bool {
    let title = entry.title.to_lowercase();
    if rule.title_hints.iter().any(|h| title.contains(h)) {
        return true;
    }

    if let Some(overview) = &entry.overview {
        let overview = overview.to_lowercase();
        if rule.overview_hints.iter().any(|h| overview.contains(h)) {
            return true;
        }
    }

    entry.genres.iter().any(|genre| {
        rule.genre_ids.iter().any(|id| genre == id)
            || rule
                .genre_fragments
                .iter()
                .any(|f| genre.to_lowercase().contains(f))
    })
}

fn phrase_single(lead: &str, entry: &ContextEntry) -> String {
    format!("{} {}", lead, phrase_tail(entry))
}

fn phrase_tail(entry: &ContextEntry) -> String {
    let mut tail = format!("\"{}\"!", entry.title);
    if let Some(note) = &entry.personal_note {
        tail.push_str(&format!(" {}", note));
    }
    if let Some(rating) = entry.rating {
        tail.push_str(&format!(" ({}/10)", rating));
    }
    tail
}
