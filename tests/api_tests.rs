use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use mockall::mock;
use serde_json::{json, Value};

use movie_tracker::{
    error::{AppError, AppResult},
    models::{Credits, Movie, MovieDetail, MovieId, MoviePage, SortKey},
    routes::{create_router, AppState},
    services::{
        recommendations::GenerationBackend, CatalogProvider, RecommendationEngine,
    },
};

mock! {
    pub Backend {}

    #[async_trait::async_trait]
    impl GenerationBackend for Backend {
        async fn generate(&self, prompt: &str) -> AppResult<String>;
        fn name(&self) -> &'static str;
    }
}

/// Catalog with a fixed set of movies, searched by exact title
struct FixedCatalog {
    movies: Vec<Movie>,
}

#[async_trait::async_trait]
impl CatalogProvider for FixedCatalog {
    async fn discover(&self, _page: u32, _sort_key: SortKey) -> AppResult<MoviePage> {
        Ok(MoviePage::default())
    }

    async fn search(&self, query: &str, _page: u32) -> AppResult<MoviePage> {
        Ok(MoviePage {
            results: self
                .movies
                .iter()
                .filter(|m| m.title == query)
                .cloned()
                .collect(),
            total_pages: 1,
        })
    }

    async fn now_playing(&self, _page: u32) -> AppResult<MoviePage> {
        Ok(MoviePage::default())
    }

    async fn movie_by_id(&self, id: MovieId) -> AppResult<MovieDetail> {
        Err(AppError::NotFound(format!("movie {}", id)))
    }

    async fn credits_by_id(&self, _id: MovieId) -> AppResult<Credits> {
        Ok(Credits::default())
    }
}

fn backend_answering(raw: &'static str) -> MockBackend {
    let mut backend = MockBackend::new();
    backend
        .expect_generate()
        .times(1)
        .returning(move |_| Ok(raw.to_string()));
    backend.expect_name().return_const("mock");
    backend
}

fn create_test_server(engine: RecommendationEngine) -> TestServer {
    let app = create_router(AppState::new(engine));
    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(RecommendationEngine::new(Arc::new(MockBackend::new())));
    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_empty_liked_list_is_bad_request() {
    let mut backend = MockBackend::new();
    backend.expect_generate().never();
    let server = create_test_server(RecommendationEngine::new(Arc::new(backend)));

    let response = server
        .post("/api/recommend")
        .json(&json!({ "likedMovies": [] }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "No liked movies provided");
}

#[tokio::test]
async fn test_missing_liked_list_is_bad_request() {
    let mut backend = MockBackend::new();
    backend.expect_generate().never();
    let server = create_test_server(RecommendationEngine::new(Arc::new(backend)));

    let response = server.post("/api/recommend").json(&json!({})).await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_null_liked_list_is_bad_request() {
    let mut backend = MockBackend::new();
    backend.expect_generate().never();
    let server = create_test_server(RecommendationEngine::new(Arc::new(backend)));

    let response = server
        .post("/api/recommend")
        .json(&json!({ "likedMovies": null }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "error": "No liked movies provided" }));
}

#[tokio::test]
async fn test_non_json_body_is_bad_request() {
    let mut backend = MockBackend::new();
    backend.expect_generate().never();
    let server = create_test_server(RecommendationEngine::new(Arc::new(backend)));

    let response = server.post("/api/recommend").text("Inception").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "error": "No liked movies provided" }));

    let response = server
        .post("/api/recommend")
        .content_type("application/json")
        .bytes("{ likedMovies: [".into())
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "error": "No liked movies provided" }));
}

#[tokio::test]
async fn test_recommendations_returned() {
    let mut backend = MockBackend::new();
    backend
        .expect_generate()
        .withf(|prompt| prompt.contains("Based on these liked movies: Inception, Arrival"))
        .times(1)
        .returning(|_| {
            Ok(r#"[
                {"title": "Interstellar", "reason": "Nolan and time"},
                {"title": "Contact", "reason": "First contact"}
            ]"#
            .to_string())
        });
    backend.expect_name().return_const("mock");
    let server = create_test_server(RecommendationEngine::new(Arc::new(backend)));

    let response = server
        .post("/api/recommend")
        .json(&json!({ "likedMovies": ["Inception", "Arrival"] }))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "recommendations": [
            { "title": "Interstellar", "reason": "Nolan and time" },
            { "title": "Contact", "reason": "First contact" }
        ]
    }));
}

#[tokio::test]
async fn test_unparsable_model_output_is_server_error() {
    let backend = backend_answering("I recommend Heat and Ronin!");
    let server = create_test_server(RecommendationEngine::new(Arc::new(backend)));

    let response = server
        .post("/api/recommend")
        .json(&json!({ "likedMovies": ["Thief"] }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"], "Recommendation request failed");
    assert!(body.get("recommendations").is_none());
}

#[tokio::test]
async fn test_backend_failure_is_server_error() {
    let mut backend = MockBackend::new();
    backend
        .expect_generate()
        .returning(|_| Err(AppError::RecommendationFailure("connection refused".into())));
    let server = create_test_server(RecommendationEngine::new(Arc::new(backend)));

    let response = server
        .post("/api/recommend")
        .json(&json!({ "likedMovies": ["Heat"] }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_resolving_proxy_returns_movies() {
    let backend = backend_answering(
        r#"[
            {"title": "Sicario", "year": 2015},
            {"title": "Made Up Movie", "year": 2001},
            {"title": "Prisoners", "year": "2013"}
        ]"#,
    );
    let catalog = FixedCatalog {
        movies: vec![
            serde_json::from_value(json!({
                "id": 273481, "title": "Sicario", "release_date": "2015-09-17",
                "vote_average": 7.4, "popularity": 40.0
            }))
            .unwrap(),
            serde_json::from_value(json!({
                "id": 146233, "title": "Prisoners", "release_date": "2013-09-19",
                "vote_average": 8.1, "popularity": 35.0
            }))
            .unwrap(),
        ],
    };
    let server = create_test_server(RecommendationEngine::resolving(
        Arc::new(backend),
        Arc::new(catalog),
    ));

    let response = server
        .post("/api/recommend")
        .json(&json!({ "likedMovies": ["Arrival"] }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let movies = body["movies"].as_array().unwrap();
    assert_eq!(movies.len(), 2);
    assert_eq!(movies[0]["id"], 273481);
    assert_eq!(movies[1]["title"], "Prisoners");
}
