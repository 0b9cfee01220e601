use std::sync::Arc;

use crate::{
    chat::{
        build_context, classify, extract_title, synthesize::Synthesizer, CatalogSnapshot,
        ReplyStatus, CONTEXT_LIMIT,
    },
    db::CatalogStore,
    models::{ChatTurn, IntentTag, SearchCandidate},
    services::{discovery::DiscoveryService, logger},
};

/// Structured outcome of one chat exchange. Infallible by construction:
/// the pipeline encodes every failure in `status`/`error` instead of
/// returning one.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub response: String,
    pub intent: Option<IntentTag>,
    pub candidates: Vec<SearchCandidate>,
    pub status: ReplyStatus,
    pub error: Option<String>,
}

/// Orchestrates a single stateless exchange: classify and extract in
/// front, search before generation (the reply may reference the
/// candidates), then the cascade, then a fire-and-forget audit write.
pub struct ChatService {
    store: Arc<dyn CatalogStore>,
    discovery: DiscoveryService,
    synthesizer: Synthesizer,
}

impl ChatService {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        discovery: DiscoveryService,
        synthesizer: Synthesizer,
    ) -> Self {
        Self {
            store,
            discovery,
            synthesizer,
        }
    }

    pub async fn handle(&self, message: &str) -> Exchange {
        let message = message.trim();

        if message.is_empty() {
            return Exchange {
                response: "Please ask me about films! Try \"recommend a sci-fi movie\" \
                           or \"what should I watch tonight?\""
                    .to_string(),
                intent: None,
                candidates: Vec::new(),
                status: ReplyStatus::Error,
                error: Some("Message is required".to_string()),
            };
        }

        let intent = classify(message);
        let extracted_title = extract_title(message);

        tracing::debug!(
            intent = %intent,
            title = extracted_title.as_deref().unwrap_or(""),
            "Utterance classified"
        );

        let candidates = self.gather_candidates(message, intent).await;
        let snapshot = self.snapshot().await;

        let reply = self
            .synthesizer
            .synthesize(
                message,
                intent,
                extracted_title.as_deref(),
                &snapshot,
                candidates,
            )
            .await;

        logger::log_turn(
            self.store.clone(),
            ChatTurn::new(message.to_string(), intent, reply.text.clone()),
        );

        Exchange {
            response: reply.text,
            intent: Some(intent),
            candidates: reply.candidates,
            status: reply.status,
            error: None,
        }
    }

    /// Search precedes generation. The similarity phrasing is checked
    /// before the exact-lookup phrasing because it is the more specific
    /// cue ("show me something like X" should anchor on X, not search
    /// for the literal phrase).
    async fn gather_candidates(&self, message: &str, intent: IntentTag) -> Vec<SearchCandidate> {
        if DiscoveryService::reference_title(message).is_some() {
            return self.discovery.find_similar(message).await;
        }
        if DiscoveryService::exact_query(message).is_some() {
            return self.discovery.find_exact(message).await;
        }
        if intent == IntentTag::RequestRecommendation && self.discovery.is_configured() {
            // No title to anchor on; find_similar degrades to the
            // popularity fallback.
            return self.discovery.find_similar(message).await;
        }

        Vec::new()
    }

    async fn snapshot(&self) -> CatalogSnapshot {
        build_context(self.store.as_ref(), CONTEXT_LIMIT).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockCatalogStore;
    use crate::models::{CatalogEntry, TmdbMovie};
    use crate::services::providers::MockMetadataProvider;
    use chrono::Utc;
    use uuid::Uuid;

    fn catalog_entry(title: &str) -> CatalogEntry {
        CatalogEntry {
            id: Uuid::new_v4(),
            tmdb_id: Some(1),
            title: title.to_string(),
            overview: Some("an overview".to_string()),
            rating: Some(7.5),
            genres: vec!["18".to_string()],
            poster_path: None,
            personal_note: None,
            enthusiasm: 4,
            created_at: Utc::now(),
        }
    }

    fn movie(id: i64, title: &str) -> TmdbMovie {
        TmdbMovie {
            id,
            title: title.to_string(),
            overview: Some("an overview".to_string()),
            poster_path: Some("/p.jpg".to_string()),
            vote_average: Some(7.8),
            genre_ids: vec![],
            release_date: None,
        }
    }

    fn store_with_catalog() -> MockCatalogStore {
        let mut store = MockCatalogStore::new();
        store
            .expect_entries()
            .returning(|_, _| Ok(vec![catalog_entry("Past Lives")]));
        store.expect_append_turn().returning(|_| Ok(()));
        store
    }

    #[tokio::test]
    async fn test_empty_message_is_structured_error() {
        let service = ChatService::new(
            Arc::new(MockCatalogStore::new()),
            DiscoveryService::new(None),
            Synthesizer::new(None),
        );

        let exchange = service.handle("   ").await;
        assert_eq!(exchange.status, ReplyStatus::Error);
        assert!(!exchange.response.is_empty());
        assert_eq!(exchange.error.as_deref(), Some("Message is required"));
        assert!(exchange.intent.is_none());
    }

    #[tokio::test]
    async fn test_similar_request_without_generation_yields_search_reply() {
        // Metadata configured, generation unconfigured: the reply comes
        // from the search-only tier, not the deterministic rule engine.
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_search()
            .returning(|_| Ok(vec![movie(157336, "Interstellar")]));
        provider.expect_similar().returning(|_| {
            Ok(vec![
                movie(1, "Contact"),
                movie(2, "Arrival"),
                movie(3, "Gravity"),
            ])
        });

        let service = ChatService::new(
            Arc::new(store_with_catalog()),
            DiscoveryService::new(Some(Arc::new(provider))),
            Synthesizer::new(None),
        );

        let exchange = service
            .handle("Find something similar to Interstellar")
            .await;

        assert_eq!(exchange.status, ReplyStatus::Completed);
        assert_eq!(exchange.candidates.len(), 3);
        assert!(exchange.response.contains("3 titles"));
    }

    #[tokio::test]
    async fn test_submission_skips_search() {
        // No provider expectations set: any search call would panic.
        let provider = MockMetadataProvider::new();

        let service = ChatService::new(
            Arc::new(store_with_catalog()),
            DiscoveryService::new(Some(Arc::new(provider))),
            Synthesizer::new(None),
        );

        let exchange = service.handle("I just watched Dune and loved it").await;

        assert_eq!(exchange.intent, Some(IntentTag::SubmitRecommendation));
        assert!(exchange.candidates.is_empty());
        assert!(exchange.response.contains("\"Dune\""));
    }

    #[tokio::test]
    async fn test_exact_lookup_attaches_candidates() {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_search()
            .returning(|_| Ok(vec![movie(438631, "Dune")]));

        let service = ChatService::new(
            Arc::new(store_with_catalog()),
            DiscoveryService::new(Some(Arc::new(provider))),
            Synthesizer::new(None),
        );

        let exchange = service.handle("show me Dune").await;

        assert_eq!(exchange.candidates.len(), 1);
        assert_eq!(exchange.candidates[0].title, "Dune");
        assert_eq!(exchange.status, ReplyStatus::Completed);
    }

    #[tokio::test]
    async fn test_pipeline_never_errors_when_everything_is_down() {
        let mut store = MockCatalogStore::new();
        store
            .expect_entries()
            .returning(|_, _| Err(crate::error::AppError::Internal("db down".to_string())));
        store.expect_append_turn().returning(|_| Ok(()));

        let service = ChatService::new(
            Arc::new(store),
            DiscoveryService::new(None),
            Synthesizer::new(None),
        );

        let exchange = service.handle("recommend something").await;

        assert!(!exchange.response.is_empty());
        assert_eq!(exchange.status, ReplyStatus::Error);
    }
}
