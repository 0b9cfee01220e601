use std::collections::HashMap;

use crate::db::CatalogStore;

/// Batch membership lookup used to suppress duplicate add-to-catalog
/// affordances in the UI. Computed on demand, never cached across
/// requests. A store failure degrades to an empty map — the caller
/// treats every id as "not yet present" rather than failing the request.
pub async fn check_membership(store: &dyn CatalogStore, tmdb_ids: &[i64]) -> HashMap<i64, bool> {
    match store.membership(tmdb_ids).await {
        Ok(map) => map,
        Err(e) => {
            tracing::warn!(ids = tmdb_ids.len(), error = %e, "Membership check failed");
            HashMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockCatalogStore;
    use crate::error::AppError;

    #[tokio::test]
    async fn test_check_membership_one_key_per_input() {
        let mut store = MockCatalogStore::new();
        store.expect_membership().returning(|ids| {
            Ok(ids.iter().map(|id| (*id, *id == 2)).collect())
        });

        let map = check_membership(&store, &[1, 2, 3]).await;
        assert_eq!(map.len(), 3);
        assert_eq!(map[&1], false);
        assert_eq!(map[&2], true);
        assert_eq!(map[&3], false);
    }

    #[tokio::test]
    async fn test_check_membership_failure_is_empty() {
        let mut store = MockCatalogStore::new();
        store
            .expect_membership()
            .returning(|_| Err(AppError::Internal("down".to_string())));

        let map = check_membership(&store, &[1, 2]).await;
        assert!(map.is_empty());
    }
}
