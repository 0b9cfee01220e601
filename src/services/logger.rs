use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::{db::CatalogStore, models::ChatTurn};

/// Append one exchange to the audit log, fire-and-forget.
///
/// Runs detached from the reply so persistence latency or failure can
/// never alter the HTTP-visible outcome. Errors are logged and dropped.
/// The join handle is returned for tests; production callers ignore it.
pub fn log_turn(store: Arc<dyn CatalogStore>, turn: ChatTurn) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = store.append_turn(&turn).await {
            tracing::warn!(intent = %turn.intent, error = %e, "Failed to persist chat turn");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockCatalogStore;
    use crate::error::AppError;
    use crate::models::IntentTag;

    fn turn() -> ChatTurn {
        ChatTurn::new(
            "just watched Dune".to_string(),
            IntentTag::SubmitRecommendation,
            "Nice!".to_string(),
        )
    }

    #[tokio::test]
    async fn test_log_turn_persists() {
        let mut store = MockCatalogStore::new();
        store.expect_append_turn().times(1).returning(|_| Ok(()));

        log_turn(Arc::new(store), turn()).await.unwrap();
    }

    #[tokio::test]
    async fn test_log_turn_swallows_persistence_failure() {
        let mut store = MockCatalogStore::new();
        store
            .expect_append_turn()
            .returning(|_| Err(AppError::Internal("disk full".to_string())));

        // Must complete without panicking
        log_turn(Arc::new(store), turn()).await.unwrap();
    }
}
