use serde::Serialize;

use crate::{
    db::CatalogStore,
    models::{CatalogEntry, CatalogOrder},
};

/// Fixed ceiling on catalog entries embedded in a generative prompt
pub const CONTEXT_LIMIT: i64 = 10;

const OVERVIEW_MAX: usize = 200;
const NOTE_MAX: usize = 150;

/// Catalog entry projected down to what grounding a reply needs, with
/// free text truncated to keep the prompt bounded.
#[derive(Debug, Clone, Serialize)]
pub struct ContextEntry {
    pub title: String,
    pub overview: Option<String>,
    pub rating: Option<f64>,
    pub genres: Vec<String>,
    pub personal_note: Option<String>,
    pub enthusiasm: i16,
}

impl From<CatalogEntry> for ContextEntry {
    fn from(entry: CatalogEntry) -> Self {
        ContextEntry {
            title: entry.title,
            overview: entry.overview.map(|o| truncate(&o, OVERVIEW_MAX)),
            rating: entry.rating,
            genres: entry.genres,
            personal_note: entry.personal_note.map(|n| truncate(&n, NOTE_MAX)),
            enthusiasm: entry.enthusiasm,
        }
    }
}

/// Bounded snapshot of the known catalog, most recent first.
///
/// `Unavailable` is an explicit signal that the store could not be read;
/// the synthesizer turns it into a guidance message instead of crashing.
#[derive(Debug, Clone)]
pub enum CatalogSnapshot {
    Entries(Vec<ContextEntry>),
    Unavailable,
}

impl CatalogSnapshot {
    pub fn entries(&self) -> &[ContextEntry] {
        match self {
            CatalogSnapshot::Entries(entries) => entries,
            CatalogSnapshot::Unavailable => &[],
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, CatalogSnapshot::Unavailable)
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

/// Read the most recently created `limit` entries and project them for
/// prompt grounding. A store failure yields `Unavailable`, never an error.
pub async fn build_context(store: &dyn CatalogStore, limit: i64) -> CatalogSnapshot {
    match store.entries(limit, CatalogOrder::Recency).await {
        Ok(entries) => {
            CatalogSnapshot::Entries(entries.into_iter().map(ContextEntry::from).collect())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Catalog read failed, grounding context unavailable");
            CatalogSnapshot::Unavailable
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockCatalogStore;
    use crate::error::AppError;
    use chrono::Utc;
    use uuid::Uuid;

    fn entry(title: &str, overview: &str, enthusiasm: i16) -> CatalogEntry {
        CatalogEntry {
            id: Uuid::new_v4(),
            tmdb_id: Some(1),
            title: title.to_string(),
            overview: Some(overview.to_string()),
            rating: Some(7.5),
            genres: vec!["878".to_string()],
            poster_path: None,
            personal_note: None,
            enthusiasm,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_build_context_projects_entries() {
        let mut store = MockCatalogStore::new();
        store
            .expect_entries()
            .returning(|_, _| Ok(vec![entry("Dune", "Spice and sand", 5)]));

        let snapshot = build_context(&store, 10).await;
        assert!(!snapshot.is_unavailable());
        assert_eq!(snapshot.entries().len(), 1);
        assert_eq!(snapshot.entries()[0].title, "Dune");
        assert_eq!(snapshot.entries()[0].enthusiasm, 5);
    }

    #[tokio::test]
    async fn test_build_context_truncates_long_overviews() {
        let long_overview = "x".repeat(500);
        let mut store = MockCatalogStore::new();
        store
            .expect_entries()
            .returning(move |_, _| Ok(vec![entry("Long", &long_overview, 3)]));

        let snapshot = build_context(&store, 10).await;
        let projected = snapshot.entries()[0].overview.as_ref().unwrap();
        assert!(projected.chars().count() <= OVERVIEW_MAX + 3);
        assert!(projected.ends_with("..."));
    }

    #[tokio::test]
    async fn test_build_context_store_failure_is_unavailable() {
        let mut store = MockCatalogStore::new();
        store
            .expect_entries()
            .returning(|_, _| Err(AppError::Internal("connection refused".to_string())));

        let snapshot = build_context(&store, 10).await;
        assert!(snapshot.is_unavailable());
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate("short", 10), "short");
    }
}
