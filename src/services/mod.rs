pub mod browse;
pub mod catalog;
pub mod liked_movies;
pub mod movie_details;
pub mod recommendations;

pub use browse::{BrowseHandle, BrowseState, BrowseView};
pub use catalog::{CatalogProvider, CatalogRequest, TmdbClient};
pub use liked_movies::LikedStore;
pub use movie_details::{DetailLoader, DetailView, MovieDetails};
pub use recommendations::{
    OllamaBackend, RecommendationClient, RecommendationEngine, RecommendationSource,
    RecommendationsPanel,
};
