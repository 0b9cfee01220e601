use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::{models::SearchCandidate, services::providers::MetadataProvider};

/// Caps and quality gates for candidate lists. Similarity-mode lists keep
/// only well-rated titles with an overview; exact-mode lists additionally
/// require a poster so the UI can render an add-to-catalog card.
const SIMILAR_CAP: usize = 6;
const EXACT_CAP: usize = 3;
const MIN_RATING: f64 = 6.0;

static REFERENCE_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:similar to|like)\s+([^?.!,]+)").expect("invalid reference pattern")
});

static EXACT_QUERY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:show me|add|display|get)\s+([^?.!,]+)").expect("invalid query pattern")
});

const QUERY_SUFFIXES: &[&str] = &["to the collection", "to my collection", "movie", "film"];

/// Candidate discovery against the metadata provider.
///
/// Holds the provider as an optional explicit dependency: when the
/// service is unconfigured both lookups return empty lists without I/O,
/// and the reply cascade carries on with catalog-only strategies.
#[derive(Clone)]
pub struct DiscoveryService {
    provider: Option<Arc<dyn MetadataProvider>>,
}

impl DiscoveryService {
    pub fn new(provider: Option<Arc<dyn MetadataProvider>>) -> Self {
        Self { provider }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Reference title from "similar to X" / "like X" phrasing
    pub fn reference_title(text: &str) -> Option<String> {
        REFERENCE_TITLE
            .captures(text)
            .map(|c| c[1].trim().to_string())
            .filter(|t| !t.is_empty())
    }

    /// Lookup query from "show me X" / "add X" / "display X" / "get X"
    /// phrasing, with trailing filler ("movie", "film", "to the
    /// collection") stripped.
    pub fn exact_query(text: &str) -> Option<String> {
        let raw = EXACT_QUERY.captures(text).map(|c| c[1].trim().to_string())?;

        let mut query = raw;
        loop {
            let Some(suffix) = QUERY_SUFFIXES.iter().find(|s| {
                query.len() >= s.len()
                    && query.is_char_boundary(query.len() - s.len())
                    && query[query.len() - s.len()..].eq_ignore_ascii_case(s)
            }) else {
                break;
            };
            query.truncate(query.len() - suffix.len());
            query = query.trim_end().to_string();
        }

        Some(query).filter(|q| !q.is_empty())
    }

    /// Titles similar to whatever the utterance references.
    ///
    /// With a reference title: search it, anchor on the first ranked
    /// result, ask for similar titles. Without one: fall back to the
    /// currently-popular list. Either way the result is quality-filtered
    /// and capped; any upstream failure yields an empty list.
    pub async fn find_similar(&self, utterance: &str) -> Vec<SearchCandidate> {
        let Some(provider) = &self.provider else {
            tracing::debug!("Metadata provider unconfigured, skipping similarity search");
            return Vec::new();
        };

        let Some(reference) = Self::reference_title(utterance) else {
            return match provider.popular().await {
                Ok(movies) => quality_filter(movies, SIMILAR_CAP),
                Err(e) => {
                    tracing::warn!(error = %e, "Popular titles fetch failed");
                    Vec::new()
                }
            };
        };

        let anchor = match provider.search(&reference).await {
            Ok(results) => results.into_iter().next(),
            Err(e) => {
                tracing::warn!(reference = %reference, error = %e, "Anchor search failed");
                return Vec::new();
            }
        };

        let Some(anchor) = anchor else {
            tracing::debug!(reference = %reference, "No anchor found for reference title");
            return Vec::new();
        };

        match provider.similar(anchor.id).await {
            Ok(movies) => {
                let candidates = quality_filter(movies, SIMILAR_CAP);
                tracing::info!(
                    reference = %reference,
                    anchor_id = anchor.id,
                    candidates = candidates.len(),
                    "Similarity search completed"
                );
                candidates
            }
            Err(e) => {
                tracing::warn!(anchor_id = anchor.id, error = %e, "Similar titles fetch failed");
                Vec::new()
            }
        }
    }

    /// Exact title lookup for "show me X" style utterances. Empty
    /// extraction, empty search result, or any upstream failure all
    /// yield an empty list.
    pub async fn find_exact(&self, utterance: &str) -> Vec<SearchCandidate> {
        let Some(provider) = &self.provider else {
            tracing::debug!("Metadata provider unconfigured, skipping exact search");
            return Vec::new();
        };

        let Some(query) = Self::exact_query(utterance) else {
            return Vec::new();
        };

        match provider.search(&query).await {
            Ok(movies) => movies
                .into_iter()
                .filter(|m| {
                    m.overview.as_deref().is_some_and(|o| !o.is_empty())
                        && m.poster_path.as_deref().is_some_and(|p| !p.is_empty())
                })
                .map(SearchCandidate::from)
                .take(EXACT_CAP)
                .collect(),
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "Exact search failed");
                Vec::new()
            }
        }
    }
}

fn quality_filter(movies: Vec<crate::models::TmdbMovie>, cap: usize) -> Vec<SearchCandidate> {
    movies
        .into_iter()
        .filter(|m| {
            m.vote_average.unwrap_or(0.0) > MIN_RATING
                && m.overview.as_deref().is_some_and(|o| !o.is_empty())
        })
        .map(SearchCandidate::from)
        .take(cap)
        .collect()
}
