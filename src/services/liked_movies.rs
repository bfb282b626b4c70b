use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    db::LikedStorage,
    error::{AppError, AppResult},
    models::{unique_by_id, Movie, MovieId},
};

/// The session's liked set
///
/// Cloning hands out another reference to the same set; every consumer in a
/// session shares one store. All mutation goes through [`LikedStore::toggle`],
/// which holds the write lock until the new set has been persisted, so writes
/// reach storage in the order they were made.
#[derive(Clone)]
pub struct LikedStore {
    movies: Arc<RwLock<Vec<Movie>>>,
    storage: Arc<dyn LikedStorage>,
}

impl LikedStore {
    /// Loads the persisted snapshot
    ///
    /// Missing, unreadable or malformed data starts an empty set.
    pub async fn initialize(storage: Arc<dyn LikedStorage>) -> Self {
        let movies = match Self::load(storage.as_ref()).await {
            Ok(movies) => movies,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding persisted liked set");
                Vec::new()
            }
        };

        tracing::info!(count = movies.len(), "Liked set loaded");

        Self {
            movies: Arc::new(RwLock::new(movies)),
            storage,
        }
    }

    async fn load(storage: &dyn LikedStorage) -> AppResult<Vec<Movie>> {
        let Some(snapshot) = storage.read().await? else {
            return Ok(Vec::new());
        };
        if snapshot.trim().is_empty() {
            return Ok(Vec::new());
        }

        let movies: Vec<Movie> = serde_json::from_str(&snapshot)
            .map_err(|e| AppError::PersistenceCorrupt(e.to_string()))?;
        Ok(unique_by_id(movies))
    }

    /// Adds the movie if absent, removes it if present
    ///
    /// Returns whether the movie is liked afterwards.
    pub async fn toggle(&self, movie: Movie) -> bool {
        let mut movies = self.movies.write().await;

        let liked = match movies.iter().position(|m| m.id == movie.id) {
            Some(index) => {
                movies.remove(index);
                false
            }
            None => {
                movies.push(movie);
                true
            }
        };

        if let Err(e) = self.persist(&movies).await {
            tracing::error!(error = %e, "Failed to persist liked set");
        }

        liked
    }

    async fn persist(&self, movies: &[Movie]) -> AppResult<()> {
        let snapshot = serde_json::to_string(movies)
            .map_err(|e| AppError::Internal(format!("Liked set serialization error: {}", e)))?;
        self.storage.write(&snapshot).await
    }

    pub async fn is_liked(&self, id: MovieId) -> bool {
        self.movies.read().await.iter().any(|m| m.id == id)
    }

    /// Liked movies in the order they were liked
    pub async fn movies(&self) -> Vec<Movie> {
        self.movies.read().await.clone()
    }

    pub async fn titles(&self) -> Vec<String> {
        self.movies
            .read()
            .await
            .iter()
            .map(|m| m.title.clone())
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.movies.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.movies.read().await.is_empty()
    }
}
