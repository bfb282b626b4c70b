use std::sync::Arc;

use serde::Serialize;

use crate::{
    error::AppError,
    models::{Credits, MovieDetail, MovieId, Person},
    services::catalog::CatalogProvider,
};

/// What the detail page shows for one movie id
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DetailView {
    NotFound,
    Loaded(MovieDetails),
}

#[derive(Debug, Clone, Serialize)]
pub struct MovieDetails {
    pub movie: MovieDetail,
    /// Absent when the credits lookup failed
    pub credits: Option<Credits>,
}

impl MovieDetails {
    pub fn directors(&self) -> Vec<&Person> {
        self.credits
            .as_ref()
            .map(Credits::directors)
            .unwrap_or_default()
    }

    pub fn cast(&self) -> &[Person] {
        self.credits
            .as_ref()
            .map(|credits| credits.cast.as_slice())
            .unwrap_or_default()
    }
}

/// Loads detail pages from the catalog
#[derive(Clone)]
pub struct DetailLoader {
    catalog: Arc<dyn CatalogProvider>,
}

impl DetailLoader {
    pub fn new(catalog: Arc<dyn CatalogProvider>) -> Self {
        Self { catalog }
    }

    /// Fetches the movie and its credits concurrently
    pub async fn load(&self, id: MovieId) -> DetailView {
        let (movie, credits) = tokio::join!(
            self.catalog.movie_by_id(id),
            self.catalog.credits_by_id(id)
        );

        let movie = match movie {
            Ok(movie) => movie,
            Err(AppError::NotFound(_)) => {
                tracing::info!(movie_id = id, "Movie not found");
                return DetailView::NotFound;
            }
            Err(e) => {
                tracing::error!(movie_id = id, error = %e, "Error fetching movie");
                return DetailView::NotFound;
            }
        };

        let credits = credits
            .map_err(|e| {
                tracing::error!(movie_id = id, error = %e, "Error fetching movie credits");
            })
            .ok();

        DetailView::Loaded(MovieDetails { movie, credits })
    }
}
