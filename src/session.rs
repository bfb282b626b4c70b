use std::{sync::Arc, time::Duration};

use crate::{
    config::Config,
    db::{FileStorage, LikedStorage},
    error::{AppError, AppResult},
    models::{MovieDetail, MovieId},
    services::{
        browse::BrowseHandle,
        catalog::{CatalogProvider, TmdbClient},
        liked_movies::LikedStore,
        movie_details::{DetailLoader, DetailView},
        recommendations::{RecommendationClient, RecommendationSource, RecommendationsPanel},
    },
};

/// One user session of the client
///
/// Owns the liked store, the browser, the recommendations panel and the detail
/// loader. Views receive these from the session instead of reaching for
/// globals; everything is torn down by [`Session::end`].
pub struct Session {
    pub liked: LikedStore,
    pub browse: BrowseHandle,
    pub recommendations: RecommendationsPanel,
    pub details: DetailLoader,
}

impl Session {
    pub async fn start(
        catalog: Arc<dyn CatalogProvider>,
        storage: Arc<dyn LikedStorage>,
        recommender: Arc<dyn RecommendationSource>,
        search_debounce: Duration,
    ) -> Self {
        let liked = LikedStore::initialize(storage).await;
        let browse = BrowseHandle::spawn(catalog.clone(), search_debounce);
        let recommendations = RecommendationsPanel::new(recommender);
        let details = DetailLoader::new(catalog);

        tracing::info!("Session started");

        Self {
            liked,
            browse,
            recommendations,
            details,
        }
    }

    /// Session wired to TMDB, the on-disk liked set and the HTTP proxy
    pub async fn from_config(config: &Config) -> AppResult<Self> {
        let api_key = config.tmdb_api_key.clone().ok_or_else(|| {
            AppError::Internal("TMDB_API_KEY is not configured".to_string())
        })?;

        let catalog = Arc::new(TmdbClient::new(api_key, config.tmdb_api_url.clone()));
        let storage = Arc::new(FileStorage::new(config.liked_movies_path.clone()));
        let recommender = Arc::new(RecommendationClient::new(config.recommend_api_url.clone()));

        Ok(Self::start(catalog, storage, recommender, config.search_debounce()).await)
    }

    /// Likes or unlikes the movie shown on a detail page
    pub async fn toggle_detail(&self, movie: &MovieDetail) -> bool {
        self.liked.toggle(movie.to_movie()).await
    }

    pub async fn open_detail(&self, id: MovieId) -> DetailView {
        self.details.load(id).await
    }

    pub async fn end(self) {
        self.browse.shutdown().await;
        tracing::info!("Session ended");
    }
}
