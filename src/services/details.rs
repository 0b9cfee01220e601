use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::CatalogStore,
    error::{AppError, AppResult},
    models::{CastMember, CatalogEntry, CrewMember, SearchCandidate, TmdbVideo},
    services::providers::MetadataProvider,
};

const CAST_LIMIT: usize = 10;
const CREW_LIMIT: usize = 5;
const TRAILER_LIMIT: usize = 3;
const SIMILAR_LIMIT: usize = 8;

const KEY_CREW_JOBS: &[&str] = &[
    "Director",
    "Producer",
    "Executive Producer",
    "Screenplay",
    "Writer",
];

/// How a details request names the entry
#[derive(Debug, Clone, Copy)]
pub enum EntrySelector {
    Catalog(Uuid),
    Tmdb(i64),
}

/// Catalog entry merged with provider metadata. Every provider-sourced
/// field degrades independently to empty when its upstream call fails.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedDetails {
    pub id: Uuid,
    pub tmdb_id: Option<i64>,
    pub title: String,
    pub overview: Option<String>,
    pub rating: Option<f64>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub runtime: Option<i64>,
    pub release_date: Option<String>,
    pub genres: Vec<String>,
    pub personal_note: Option<String>,
    pub enthusiasm: i16,
    pub cast: Vec<CastMember>,
    pub crew: Vec<CrewMember>,
    pub trailers: Vec<TmdbVideo>,
    pub similar: Vec<SearchCandidate>,
}

impl EnrichedDetails {
    fn from_catalog(entry: CatalogEntry) -> Self {
        Self {
            id: entry.id,
            tmdb_id: entry.tmdb_id,
            title: entry.title,
            overview: entry.overview,
            rating: entry.rating,
            poster_path: entry.poster_path,
            backdrop_path: None,
            runtime: None,
            release_date: None,
            genres: entry.genres,
            personal_note: entry.personal_note,
            enthusiasm: entry.enthusiasm,
            cast: Vec::new(),
            crew: Vec::new(),
            trailers: Vec::new(),
            similar: Vec::new(),
        }
    }
}

/// Look an entry up and enrich it with provider metadata.
///
/// The four provider calls run concurrently and are aggregated with
/// partial-failure tolerance: a failed call degrades its own field to
/// "unavailable" without failing the response. With no provider
/// configured (or no TMDB id on the entry) the catalog data stands alone.
pub async fn enrich_details(
    store: &dyn CatalogStore,
    provider: Option<&Arc<dyn MetadataProvider>>,
    selector: EntrySelector,
) -> AppResult<EnrichedDetails> {
    let entry = match selector {
        EntrySelector::Catalog(id) => store.find_by_id(id).await?,
        EntrySelector::Tmdb(id) => store.find_by_tmdb_id(id).await?,
    };

    let entry = entry.ok_or_else(|| AppError::NotFound("Entry not in catalog".to_string()))?;

    let mut enriched = EnrichedDetails::from_catalog(entry);

    let (Some(provider), Some(tmdb_id)) = (provider, enriched.tmdb_id) else {
        return Ok(enriched);
    };

    let (details, credits, videos, similar) = tokio::join!(
        provider.details(tmdb_id),
        provider.credits(tmdb_id),
        provider.videos(tmdb_id),
        provider.similar(tmdb_id),
    );

    match details {
        Ok(details) => {
            enriched.backdrop_path = details.backdrop_path;
            enriched.runtime = details.runtime;
            enriched.release_date = details.release_date;
            if enriched.overview.is_none() {
                enriched.overview = details.overview;
            }
            if enriched.poster_path.is_none() {
                enriched.poster_path = details.poster_path;
            }
            if enriched.genres.is_empty() {
                enriched.genres = details.genres.into_iter().map(|g| g.name).collect();
            }
        }
        Err(e) => tracing::warn!(tmdb_id, error = %e, "Details fetch failed"),
    }

    match credits {
        Ok(mut credits) => {
            credits.cast.truncate(CAST_LIMIT);
            enriched.cast = credits.cast;
            enriched.crew = credits
                .crew
                .into_iter()
                .filter(|member| KEY_CREW_JOBS.contains(&member.job.as_str()))
                .take(CREW_LIMIT)
                .collect();
        }
        Err(e) => tracing::warn!(tmdb_id, error = %e, "Credits fetch failed"),
    }

    match videos {
        Ok(videos) => {
            enriched.trailers = videos
                .results
                .into_iter()
                .filter(|v| v.video_type == "Trailer" && v.site == "YouTube")
                .take(TRAILER_LIMIT)
                .collect();
        }
        Err(e) => tracing::warn!(tmdb_id, error = %e, "Videos fetch failed"),
    }

    match similar {
        Ok(movies) => {
            enriched.similar = movies
                .into_iter()
                .map(SearchCandidate::from)
                .take(SIMILAR_LIMIT)
                .collect();
        }
        Err(e) => tracing::warn!(tmdb_id, error = %e, "Similar titles fetch failed"),
    }

    Ok(enriched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockCatalogStore;
    use crate::models::{TmdbCredits, TmdbMovie, TmdbMovieDetails, TmdbVideoPage};
    use crate::services::providers::MockMetadataProvider;
    use chrono::Utc;

    fn entry(tmdb_id: Option<i64>) -> CatalogEntry {
        CatalogEntry {
            id: Uuid::new_v4(),
            tmdb_id,
            title: "Interstellar".to_string(),
            overview: Some("explorers travel through a wormhole".to_string()),
            rating: Some(8.4),
            genres: vec!["878".to_string()],
            poster_path: Some("/poster.jpg".to_string()),
            personal_note: Some("watch on the biggest screen you can".to_string()),
            enthusiasm: 5,
            created_at: Utc::now(),
        }
    }

    fn details_ok() -> TmdbMovieDetails {
        TmdbMovieDetails {
            id: 157336,
            title: "Interstellar".to_string(),
            original_title: None,
            overview: None,
            poster_path: None,
            backdrop_path: Some("/backdrop.jpg".to_string()),
            vote_average: Some(8.4),
            runtime: Some(169),
            release_date: Some("2014-11-05".to_string()),
            genres: vec![],
        }
    }

    #[tokio::test]
    async fn test_enrich_merges_provider_data() {
        let mut store = MockCatalogStore::new();
        store
            .expect_find_by_tmdb_id()
            .returning(|_| Ok(Some(entry(Some(157336)))));

        let mut provider = MockMetadataProvider::new();
        provider.expect_details().returning(|_| Ok(details_ok()));
        provider.expect_credits().returning(|_| {
            Ok(TmdbCredits {
                cast: vec![CastMember {
                    name: "Matthew McConaughey".to_string(),
                    character: Some("Cooper".to_string()),
                    profile_path: None,
                }],
                crew: vec![
                    CrewMember {
                        name: "Christopher Nolan".to_string(),
                        job: "Director".to_string(),
                    },
                    CrewMember {
                        name: "Someone Else".to_string(),
                        job: "Gaffer".to_string(),
                    },
                ],
            })
        });
        provider.expect_videos().returning(|_| {
            Ok(TmdbVideoPage {
                results: vec![
                    TmdbVideo {
                        key: "abc".to_string(),
                        name: "Official Trailer".to_string(),
                        site: "YouTube".to_string(),
                        video_type: "Trailer".to_string(),
                    },
                    TmdbVideo {
                        key: "def".to_string(),
                        name: "Featurette".to_string(),
                        site: "YouTube".to_string(),
                        video_type: "Featurette".to_string(),
                    },
                ],
            })
        });
        provider.expect_similar().returning(|_| {
            Ok(vec![TmdbMovie {
                id: 1,
                title: "Contact".to_string(),
                overview: Some("signals from space".to_string()),
                poster_path: None,
                vote_average: Some(7.4),
                genre_ids: vec![],
                release_date: None,
            }])
        });

        let provider: Arc<dyn MetadataProvider> = Arc::new(provider);
        let enriched = enrich_details(&store, Some(&provider), EntrySelector::Tmdb(157336))
            .await
            .unwrap();

        assert_eq!(enriched.runtime, Some(169));
        assert_eq!(enriched.backdrop_path, Some("/backdrop.jpg".to_string()));
        assert_eq!(enriched.cast.len(), 1);
        assert_eq!(enriched.crew.len(), 1);
        assert_eq!(enriched.crew[0].job, "Director");
        assert_eq!(enriched.trailers.len(), 1);
        assert_eq!(enriched.similar.len(), 1);
        // Catalog fields win over provider fields
        assert_eq!(enriched.enthusiasm, 5);
        assert!(enriched.overview.as_ref().unwrap().contains("wormhole"));
    }

    #[tokio::test]
    async fn test_enrich_survives_total_provider_failure() {
        let mut store = MockCatalogStore::new();
        store
            .expect_find_by_tmdb_id()
            .returning(|_| Ok(Some(entry(Some(157336)))));

        let mut provider = MockMetadataProvider::new();
        provider
            .expect_details()
            .returning(|_| Err(AppError::ExternalApi("down".to_string())));
        provider
            .expect_credits()
            .returning(|_| Err(AppError::ExternalApi("down".to_string())));
        provider
            .expect_videos()
            .returning(|_| Err(AppError::ExternalApi("down".to_string())));
        provider
            .expect_similar()
            .returning(|_| Err(AppError::ExternalApi("down".to_string())));

        let provider: Arc<dyn MetadataProvider> = Arc::new(provider);
        let enriched = enrich_details(&store, Some(&provider), EntrySelector::Tmdb(157336))
            .await
            .unwrap();

        assert_eq!(enriched.title, "Interstellar");
        assert!(enriched.cast.is_empty());
        assert!(enriched.trailers.is_empty());
        assert!(enriched.similar.is_empty());
    }

    #[tokio::test]
    async fn test_enrich_without_provider_returns_catalog_data() {
        let mut store = MockCatalogStore::new();
        store
            .expect_find_by_tmdb_id()
            .returning(|_| Ok(Some(entry(Some(157336)))));

        let enriched = enrich_details(&store, None, EntrySelector::Tmdb(157336))
            .await
            .unwrap();

        assert_eq!(enriched.title, "Interstellar");
        assert!(enriched.cast.is_empty());
    }

    #[tokio::test]
    async fn test_enrich_unknown_entry_is_not_found() {
        let mut store = MockCatalogStore::new();
        store.expect_find_by_tmdb_id().returning(|_| Ok(None));

        let result = enrich_details(&store, None, EntrySelector::Tmdb(404)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
