use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{CatalogEntry, CatalogOrder, ChatTurn, NewCatalogEntry},
};

pub mod postgres;

pub use postgres::create_pool;
pub use postgres::PgCatalogStore;

/// Persistent-store boundary for the chat pipeline.
///
/// The schema and its migrations live with the store collaborator; this
/// trait is the only surface the pipeline sees. An explicit dependency
/// (never a module-level singleton) so every component can be tested
/// against a mock in isolation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Read up to `limit` catalog entries in the requested order
    async fn entries(&self, limit: i64, order: CatalogOrder) -> AppResult<Vec<CatalogEntry>>;

    /// Look up a single entry by catalog id
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<CatalogEntry>>;

    /// Look up a single entry by its TMDB id
    async fn find_by_tmdb_id(&self, tmdb_id: i64) -> AppResult<Option<CatalogEntry>>;

    /// Batched membership check: one key per input id, `true` iff the
    /// id is already in the catalog
    async fn membership(&self, tmdb_ids: &[i64]) -> AppResult<HashMap<i64, bool>>;

    /// Append one chat exchange to the audit log
    async fn append_turn(&self, turn: &ChatTurn) -> AppResult<()>;

    /// Insert a new catalog entry and return the stored row
    async fn insert_entry(&self, entry: &NewCatalogEntry) -> AppResult<CatalogEntry>;
}
