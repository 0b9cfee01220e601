use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Classified purpose of a user utterance. Classification is total:
/// every message maps to exactly one tag, with `Question` as the default.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntentTag {
    SubmitRecommendation,
    RequestRecommendation,
    Discussion,
    Question,
}

impl IntentTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentTag::SubmitRecommendation => "SUBMIT_RECOMMENDATION",
            IntentTag::RequestRecommendation => "REQUEST_RECOMMENDATION",
            IntentTag::Discussion => "DISCUSSION",
            IntentTag::Question => "QUESTION",
        }
    }
}

impl std::fmt::Display for IntentTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One logged chat exchange. Append-only: created once per exchange,
/// never mutated or deleted by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub input: String,
    pub intent: IntentTag,
    pub response: String,
    pub created_at: DateTime<Utc>,
}

impl ChatTurn {
    pub fn new(input: String, intent: IntentTag, response: String) -> Self {
        Self {
            input,
            intent,
            response,
            created_at: Utc::now(),
        }
    }
}

/// Sort order for catalog reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOrder {
    /// Newest first (prompt grounding)
    Recency,
    /// Enthusiasm descending, recency as tie-break (top picks)
    Enthusiasm,
}

/// A title already in the personal catalog, with curator annotations.
/// Owned by the store; the pipeline only reads it and ranks in memory.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CatalogEntry {
    pub id: Uuid,
    pub tmdb_id: Option<i64>,
    pub title: String,
    pub overview: Option<String>,
    pub rating: Option<f64>,
    pub genres: Vec<String>,
    pub poster_path: Option<String>,
    pub personal_note: Option<String>,
    /// 1..=5 personal-preference score
    pub enthusiasm: i16,
    pub created_at: DateTime<Utc>,
}

/// Payload for inserting a catalog entry sourced from the metadata provider
#[derive(Debug, Clone)]
pub struct NewCatalogEntry {
    pub tmdb_id: i64,
    pub title: String,
    pub overview: Option<String>,
    pub rating: Option<f64>,
    pub genres: Vec<String>,
    pub poster_path: Option<String>,
    pub personal_note: Option<String>,
    pub enthusiasm: i16,
}

/// A title returned by the metadata provider, not yet part of the catalog.
/// Ephemeral: produced per request and only surfaced in the reply payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchCandidate {
    pub external_id: i64,
    pub title: String,
    pub overview: String,
    pub poster_ref: Option<String>,
    pub rating: f64,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// One movie row as returned by TMDB search/similar/popular endpoints.
/// TV results use `name` instead of `title`, hence the alias.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: i64,
    #[serde(alias = "name")]
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
    #[serde(default)]
    pub release_date: Option<String>,
}

/// Paged list wrapper used by every TMDB list endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage {
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
}

impl From<TmdbMovie> for SearchCandidate {
    fn from(movie: TmdbMovie) -> Self {
        SearchCandidate {
            external_id: movie.id,
            title: movie.title,
            overview: movie.overview.unwrap_or_default(),
            poster_ref: movie.poster_path,
            rating: movie.vote_average.unwrap_or(0.0),
        }
    }
}

/// Full movie record from GET /movie/{id}
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub runtime: Option<i64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbGenre {
    pub id: i64,
    pub name: String,
}

/// Credits from GET /movie/{id}/credits
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbCredits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CastMember {
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CrewMember {
    pub name: String,
    pub job: String,
}

/// Videos from GET /movie/{id}/videos
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbVideoPage {
    #[serde(default)]
    pub results: Vec<TmdbVideo>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbVideo {
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_tag_serde() {
        let json = serde_json::to_string(&IntentTag::SubmitRecommendation).unwrap();
        assert_eq!(json, "\"SUBMIT_RECOMMENDATION\"");

        let tag: IntentTag = serde_json::from_str("\"REQUEST_RECOMMENDATION\"").unwrap();
        assert_eq!(tag, IntentTag::RequestRecommendation);
    }

    #[test]
    fn test_intent_tag_display_matches_serde() {
        assert_eq!(IntentTag::Discussion.to_string(), "DISCUSSION");
        assert_eq!(IntentTag::Question.to_string(), "QUESTION");
    }

    #[test]
    fn test_tmdb_movie_to_candidate() {
        let movie = TmdbMovie {
            id: 157336,
            title: "Interstellar".to_string(),
            overview: Some("A team of explorers travel through a wormhole".to_string()),
            poster_path: Some("/poster.jpg".to_string()),
            vote_average: Some(8.4),
            genre_ids: vec![878, 12],
            release_date: Some("2014-11-05".to_string()),
        };

        let candidate: SearchCandidate = movie.into();
        assert_eq!(candidate.external_id, 157336);
        assert_eq!(candidate.title, "Interstellar");
        assert_eq!(candidate.rating, 8.4);
        assert_eq!(candidate.poster_ref, Some("/poster.jpg".to_string()));
    }

    #[test]
    fn test_tmdb_movie_to_candidate_missing_fields() {
        let movie = TmdbMovie {
            id: 1,
            title: "Obscure".to_string(),
            overview: None,
            poster_path: None,
            vote_average: None,
            genre_ids: vec![],
            release_date: None,
        };

        let candidate: SearchCandidate = movie.into();
        assert_eq!(candidate.overview, "");
        assert_eq!(candidate.rating, 0.0);
        assert_eq!(candidate.poster_ref, None);
    }

    #[test]
    fn test_candidate_serializes_camel_case() {
        let candidate = SearchCandidate {
            external_id: 42,
            title: "Dune".to_string(),
            overview: "Spice".to_string(),
            poster_ref: Some("/dune.jpg".to_string()),
            rating: 8.0,
        };

        let value = serde_json::to_value(&candidate).unwrap();
        assert_eq!(value["externalId"], 42);
        assert_eq!(value["posterRef"], "/dune.jpg");
        assert!(value.get("external_id").is_none());
    }

    #[test]
    fn test_tmdb_movie_accepts_name_alias() {
        let json = r#"{"id": 9, "name": "Some Series", "vote_average": 7.1}"#;
        let movie: TmdbMovie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.title, "Some Series");
        assert_eq!(movie.vote_average, Some(7.1));
    }
}
