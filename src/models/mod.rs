mod browse;
mod movie;
mod recommendation;

pub use browse::{BrowseMode, SortKey};
pub use movie::{
    unique_by_id, Credits, Genre, Movie, MovieDetail, MovieId, MoviePage, Person,
    BACKDROP_BASE_URL, MAX_TOTAL_PAGES, POSTER_BASE_URL, PROFILE_BASE_URL,
};
pub use recommendation::{
    ErrorBody, GeneratedItem, GeneratedYear, RecommendRequest, Recommendation,
    RecommendationOutcome,
};
