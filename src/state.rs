use std::sync::Arc;

use crate::{
    chat::Synthesizer,
    config::Config,
    db::CatalogStore,
    services::{
        discovery::DiscoveryService,
        generation::{GenerativeClient, OpenAiClient},
        providers::{MetadataProvider, TmdbProvider},
        ChatService,
    },
};

/// Shared application state
///
/// Every collaborator is an explicit, injected dependency so the router
/// can be built against mocks in tests. Absent API keys leave the
/// corresponding adapter unconfigured; the pipeline degrades instead of
/// refusing to start.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
    pub metadata: Option<Arc<dyn MetadataProvider>>,
    pub chat: Arc<ChatService>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        metadata: Option<Arc<dyn MetadataProvider>>,
        generative: Option<Arc<dyn GenerativeClient>>,
    ) -> Self {
        let chat = ChatService::new(
            store.clone(),
            DiscoveryService::new(metadata.clone()),
            Synthesizer::new(generative),
        );

        Self {
            store,
            metadata,
            chat: Arc::new(chat),
        }
    }

    /// Wire real collaborators from configuration
    pub fn from_config(config: &Config, store: Arc<dyn CatalogStore>) -> Self {
        let metadata: Option<Arc<dyn MetadataProvider>> = match &config.tmdb_api_key {
            Some(key) => Some(Arc::new(TmdbProvider::new(
                key.clone(),
                config.tmdb_api_url.clone(),
            ))),
            None => {
                tracing::warn!("TMDB_API_KEY not set, metadata search disabled");
                None
            }
        };

        let generative: Option<Arc<dyn GenerativeClient>> = match &config.openai_api_key {
            Some(key) => Some(Arc::new(OpenAiClient::new(
                key.clone(),
                config.openai_api_url.clone(),
                config.openai_model.clone(),
            ))),
            None => {
                tracing::warn!("OPENAI_API_KEY not set, generative tier disabled");
                None
            }
        };

        Self::new(store, metadata, generative)
    }
}
