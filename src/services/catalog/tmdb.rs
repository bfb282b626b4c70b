//! TMDB (The Movie Database) v3 catalog provider
//!
//! Endpoints used:
//! - `/discover/movie` browse by sort order
//! - `/search/movie` title search
//! - `/movie/now_playing` current theatrical releases
//! - `/movie/{id}` and `/movie/{id}/credits` for the detail page
//!
//! Every request carries the key as the `api_key` query parameter.
use crate::{
    error::{AppError, AppResult},
    models::{Credits, MovieDetail, MovieId, MoviePage, SortKey},
    services::catalog::{require_query, CatalogProvider},
};
use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;

/// Vote-count floor applied to rating sorts
const MIN_VOTE_COUNT: &str = "100";

#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbClient {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Query parameters for `/discover/movie`, excluding the key
    fn discover_params(page: u32, sort_key: SortKey) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("sort_by", sort_key.as_api_token().to_string()),
            ("page", page.to_string()),
        ];
        if sort_key.is_rating_sort() {
            params.push(("vote_count.gte", MIN_VOTE_COUNT.to_string()));
        }
        params
    }

    fn search_params(query: &str, page: u32) -> Vec<(&'static str, String)> {
        vec![("query", query.to_string()), ("page", page.to_string())]
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);

        // reqwest percent-encodes every query value
        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("TMDB resource {} not found", path)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(path = %path, status = %status, "TMDB request failed");
            return Err(AppError::FetchFailure(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        response.json::<T>().await.map_err(|e| {
            tracing::error!(path = %path, error = %e, "Failed to decode TMDB response");
            AppError::FetchFailure(format!("Failed to parse TMDB response: {}", e))
        })
    }

    async fn list(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> AppResult<MoviePage> {
        let page: MoviePage = self.get(path, params).await?;
        let page = page.normalized();

        tracing::info!(
            path = %path,
            results = page.results.len(),
            total_pages = page.total_pages,
            provider = "tmdb",
            "Catalog listing fetched"
        );

        Ok(page)
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbClient {
    async fn discover(&self, page: u32, sort_key: SortKey) -> AppResult<MoviePage> {
        self.list("/discover/movie", &Self::discover_params(page, sort_key))
            .await
    }

    async fn search(&self, query: &str, page: u32) -> AppResult<MoviePage> {
        require_query(query)?;
        self.list("/search/movie", &Self::search_params(query, page))
            .await
    }

    async fn now_playing(&self, page: u32) -> AppResult<MoviePage> {
        self.list("/movie/now_playing", &[("page", page.to_string())])
            .await
    }

    async fn movie_by_id(&self, id: MovieId) -> AppResult<MovieDetail> {
        let movie: MovieDetail = self.get(&format!("/movie/{}", id), &[]).await?;
        tracing::info!(movie_id = id, provider = "tmdb", "Movie detail fetched");
        Ok(movie)
    }

    async fn credits_by_id(&self, id: MovieId) -> AppResult<Credits> {
        let credits: Credits = self.get(&format!("/movie/{}/credits", id), &[]).await?;
        tracing::info!(
            movie_id = id,
            cast = credits.cast.len(),
            crew = credits.crew.len(),
            provider = "tmdb",
            "Movie credits fetched"
        );
        Ok(credits)
    }
}
