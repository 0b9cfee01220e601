/// Metadata provider abstraction
///
/// The chat pipeline talks to a third-party movie metadata service through
/// this trait so the TMDB client can be swapped for a mock in tests. One
/// attempt per call, no retries: a failed call degrades to an empty
/// candidate list at the caller and the reply cascade moves on.
use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{TmdbCredits, TmdbMovie, TmdbMovieDetails, TmdbVideoPage},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Search movies by title
    async fn search(&self, query: &str) -> AppResult<Vec<TmdbMovie>>;

    /// Titles similar to the given one
    async fn similar(&self, tmdb_id: i64) -> AppResult<Vec<TmdbMovie>>;

    /// Currently popular titles
    async fn popular(&self) -> AppResult<Vec<TmdbMovie>>;

    /// Full record for a single title
    async fn details(&self, tmdb_id: i64) -> AppResult<TmdbMovieDetails>;

    /// Cast and crew for a single title
    async fn credits(&self, tmdb_id: i64) -> AppResult<TmdbCredits>;

    /// Trailers and clips for a single title
    async fn videos(&self, tmdb_id: i64) -> AppResult<TmdbVideoPage>;
}
