use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::{
    db::CatalogStore,
    error::AppResult,
    models::{CatalogEntry, CatalogOrder, ChatTurn, NewCatalogEntry},
};

/// Creates a PostgreSQL connection pool
///
/// Connections are established lazily so a store outage surfaces as a
/// degraded catalog read at request time rather than a startup failure.
pub fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect_lazy(database_url)?;

    Ok(pool)
}

const SELECT_ENTRY: &str = "SELECT id, tmdb_id, title, overview, rating, genres, poster_path, \
     personal_note, enthusiasm, created_at FROM catalog_entries";

/// PostgreSQL-backed catalog store
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn entries(&self, limit: i64, order: CatalogOrder) -> AppResult<Vec<CatalogEntry>> {
        let order_clause = match order {
            CatalogOrder::Recency => "ORDER BY created_at DESC",
            CatalogOrder::Enthusiasm => "ORDER BY enthusiasm DESC, created_at DESC",
        };

        let query = format!("{} {} LIMIT $1", SELECT_ENTRY, order_clause);
        let entries = sqlx::query_as::<_, CatalogEntry>(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(entries)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<CatalogEntry>> {
        let query = format!("{} WHERE id = $1", SELECT_ENTRY);
        let entry = sqlx::query_as::<_, CatalogEntry>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(entry)
    }

    async fn find_by_tmdb_id(&self, tmdb_id: i64) -> AppResult<Option<CatalogEntry>> {
        let query = format!("{} WHERE tmdb_id = $1", SELECT_ENTRY);
        let entry = sqlx::query_as::<_, CatalogEntry>(&query)
            .bind(tmdb_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(entry)
    }

    async fn membership(&self, tmdb_ids: &[i64]) -> AppResult<HashMap<i64, bool>> {
        let present: Vec<i64> = sqlx::query_scalar(
            "SELECT tmdb_id FROM catalog_entries WHERE tmdb_id = ANY($1)",
        )
        .bind(tmdb_ids)
        .fetch_all(&self.pool)
        .await?;

        let map = tmdb_ids
            .iter()
            .map(|id| (*id, present.contains(id)))
            .collect();

        Ok(map)
    }

    async fn append_turn(&self, turn: &ChatTurn) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO chat_turns (id, input, intent, response, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(Uuid::new_v4())
        .bind(&turn.input)
        .bind(turn.intent.as_str())
        .bind(&turn.response)
        .bind(turn.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn insert_entry(&self, entry: &NewCatalogEntry) -> AppResult<CatalogEntry> {
        let stored = sqlx::query_as::<_, CatalogEntry>(
            "INSERT INTO catalog_entries \
             (id, tmdb_id, title, overview, rating, genres, poster_path, personal_note, \
              enthusiasm, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW()) \
             RETURNING id, tmdb_id, title, overview, rating, genres, poster_path, \
                       personal_note, enthusiasm, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(entry.tmdb_id)
        .bind(&entry.title)
        .bind(&entry.overview)
        .bind(entry.rating)
        .bind(&entry.genres)
        .bind(&entry.poster_path)
        .bind(&entry.personal_note)
        .bind(entry.enthusiasm)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }
}
