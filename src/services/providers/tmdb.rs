/// TMDB API provider
///
/// Talks to The Movie Database v3 REST API with bearer-token auth.
/// Every call is bounded by a fixed deadline; there are no retries, the
/// reply cascade substitutes a different strategy instead.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

use crate::{
    error::{AppError, AppResult},
    models::{TmdbCredits, TmdbMovie, TmdbMovieDetails, TmdbPage, TmdbVideoPage},
    services::providers::MetadataProvider,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String) -> Self {
        let http_client = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            http_client,
            api_key,
            api_url,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url.trim_end_matches('/'), path);

        let response = self
            .http_client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl MetadataProvider for TmdbProvider {
    async fn search(&self, query: &str) -> AppResult<Vec<TmdbMovie>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let page: TmdbPage = self
            .get_json("/search/movie", &[("query", query), ("page", "1")])
            .await?;

        tracing::info!(
            query = %query,
            results = page.results.len(),
            provider = "tmdb",
            "Title search completed"
        );

        Ok(page.results)
    }

    async fn similar(&self, tmdb_id: i64) -> AppResult<Vec<TmdbMovie>> {
        let path = format!("/movie/{}/similar", tmdb_id);
        let page: TmdbPage = self.get_json(&path, &[("page", "1")]).await?;

        tracing::info!(
            tmdb_id = tmdb_id,
            results = page.results.len(),
            provider = "tmdb",
            "Similar titles fetched"
        );

        Ok(page.results)
    }

    async fn popular(&self) -> AppResult<Vec<TmdbMovie>> {
        let page: TmdbPage = self.get_json("/movie/popular", &[("page", "1")]).await?;

        tracing::info!(
            results = page.results.len(),
            provider = "tmdb",
            "Popular titles fetched"
        );

        Ok(page.results)
    }

    async fn details(&self, tmdb_id: i64) -> AppResult<TmdbMovieDetails> {
        let path = format!("/movie/{}", tmdb_id);
        self.get_json(&path, &[]).await
    }

    async fn credits(&self, tmdb_id: i64) -> AppResult<TmdbCredits> {
        let path = format!("/movie/{}/credits", tmdb_id);
        self.get_json(&path, &[]).await
    }

    async fn videos(&self, tmdb_id: i64) -> AppResult<TmdbVideoPage> {
        let path = format!("/movie/{}/videos", tmdb_id);
        self.get_json(&path, &[]).await
    }
}
