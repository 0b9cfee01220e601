use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{CatalogEntry, CatalogOrder, NewCatalogEntry, SearchCandidate},
    services::{
        details::{enrich_details, EnrichedDetails, EntrySelector},
        status,
    },
    state::AppState,
};

const LIST_LIMIT: i64 = 100;
const DISCOVERY_ENTHUSIASM: i16 = 3;

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub results: Vec<CatalogEntry>,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListSort {
    Recent,
    Top,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub sort: Option<ListSort>,
}

/// Catalog listing: newest first by default, `?sort=top` ranks by
/// enthusiasm with recency as tie-break
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> AppResult<Json<ListResponse>> {
    let order = match params.sort {
        Some(ListSort::Top) => CatalogOrder::Enthusiasm,
        _ => CatalogOrder::Recency,
    };

    let results = state.store.entries(LIST_LIMIT, order).await?;
    let total = results.len();

    Ok(Json(ListResponse { results, total }))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<SearchCandidate>,
    pub total_results: usize,
}

/// Metadata-provider search passthrough for the add-to-catalog UI
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<SearchResponse>> {
    let provider = state
        .metadata
        .as_ref()
        .ok_or_else(|| AppError::Configuration("Metadata provider not configured".to_string()))?;

    let results: Vec<SearchCandidate> = provider
        .search(&params.query)
        .await?
        .into_iter()
        .map(SearchCandidate::from)
        .collect();
    let total_results = results.len();

    Ok(Json(SearchResponse {
        results,
        total_results,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    pub tmdb_ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub success: bool,
    pub status_map: HashMap<i64, bool>,
}

/// Batch membership check for duplicate-prevention in the search UI
pub async fn check_status(
    State(state): State<AppState>,
    Json(request): Json<StatusRequest>,
) -> Json<StatusResponse> {
    let status_map = status::check_membership(state.store.as_ref(), &request.tmdb_ids).await;

    Json(StatusResponse {
        success: true,
        status_map,
    })
}

/// Enriched details for one catalog entry, addressed by catalog id or
/// TMDB id
pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<EnrichedDetails>> {
    let selector = parse_selector(&id)?;

    let enriched = enrich_details(state.store.as_ref(), state.metadata.as_ref(), selector).await?;

    Ok(Json(enriched))
}

fn parse_selector(id: &str) -> AppResult<EntrySelector> {
    if let Ok(uuid) = Uuid::parse_str(id) {
        return Ok(EntrySelector::Catalog(uuid));
    }
    if let Ok(tmdb_id) = id.parse::<i64>() {
        return Ok(EntrySelector::Tmdb(tmdb_id));
    }

    Err(AppError::InvalidInput(format!(
        "'{}' is neither a catalog id nor a TMDB id",
        id
    )))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRequest {
    pub tmdb_id: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<CatalogEntry>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub already_exists: bool,
}

/// Add a title to the catalog from the metadata provider
pub async fn add_from_tmdb(
    State(state): State<AppState>,
    Json(request): Json<AddRequest>,
) -> AppResult<Json<AddResponse>> {
    if let Some(existing) = state.store.find_by_tmdb_id(request.tmdb_id).await? {
        return Ok(Json(AddResponse {
            success: false,
            message: "Title already in the catalog".to_string(),
            entry: Some(existing),
            already_exists: true,
        }));
    }

    let provider = state
        .metadata
        .as_ref()
        .ok_or_else(|| AppError::Configuration("Metadata provider not configured".to_string()))?;

    let details = provider.details(request.tmdb_id).await?;

    let new_entry = NewCatalogEntry {
        tmdb_id: details.id,
        title: details.title,
        overview: details.overview,
        rating: details.vote_average,
        genres: details.genres.into_iter().map(|g| g.name).collect(),
        poster_path: details.poster_path,
        personal_note: Some("Added from similar titles discovery".to_string()),
        enthusiasm: DISCOVERY_ENTHUSIASM,
    };

    let entry = state.store.insert_entry(&new_entry).await?;

    tracing::info!(
        tmdb_id = request.tmdb_id,
        title = %entry.title,
        "Added new title to catalog"
    );

    Ok(Json(AddResponse {
        success: true,
        message: format!("\"{}\" added to your collection!", entry.title),
        entry: Some(entry),
        already_exists: false,
    }))
}
