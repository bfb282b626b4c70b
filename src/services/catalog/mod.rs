//! Movie catalog abstraction
//!
//! The catalog is a read-only external service. Every operation is idempotent
//! and issued exactly once per call; callers decide whether to re-issue.
use crate::{
    error::{AppError, AppResult},
    models::{Credits, MovieDetail, MovieId, MoviePage, SortKey},
};

pub mod tmdb;

pub use tmdb::TmdbClient;

/// Trait for movie catalog providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Browse the whole catalog in the given order
    async fn discover(&self, page: u32, sort_key: SortKey) -> AppResult<MoviePage>;

    /// Search by title; `query` must not be blank
    async fn search(&self, query: &str, page: u32) -> AppResult<MoviePage>;

    /// Titles currently in theatres; the endpoint has no ordering control
    async fn now_playing(&self, page: u32) -> AppResult<MoviePage>;

    /// Fails with `NotFound` when the id does not resolve
    async fn movie_by_id(&self, id: MovieId) -> AppResult<MovieDetail>;

    async fn credits_by_id(&self, id: MovieId) -> AppResult<Credits>;
}

/// A single listing request, as decided by the browse state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogRequest {
    Search { query: String, page: u32 },
    NowPlaying { page: u32 },
    Discover { page: u32, sort_key: SortKey },
}

impl CatalogRequest {
    pub fn page(&self) -> u32 {
        match self {
            CatalogRequest::Search { page, .. }
            | CatalogRequest::NowPlaying { page }
            | CatalogRequest::Discover { page, .. } => *page,
        }
    }

    pub async fn execute(&self, catalog: &dyn CatalogProvider) -> AppResult<MoviePage> {
        match self {
            CatalogRequest::Search { query, page } => catalog.search(query, *page).await,
            CatalogRequest::NowPlaying { page } => catalog.now_playing(*page).await,
            CatalogRequest::Discover { page, sort_key } => {
                catalog.discover(*page, *sort_key).await
            }
        }
    }
}

pub(crate) fn require_query(query: &str) -> AppResult<()> {
    if query.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "Search query cannot be empty".to_string(),
        ));
    }
    Ok(())
}
