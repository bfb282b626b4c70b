use reqwest::{Client as HttpClient, StatusCode};

use crate::{
    error::{AppError, AppResult},
    models::{ErrorBody, RecommendRequest, RecommendationOutcome},
    services::recommendations::RecommendationSource,
};

/// HTTP client for the recommendation proxy's `POST /api/recommend`
#[derive(Clone)]
pub struct RecommendationClient {
    http_client: HttpClient,
    api_url: String,
}

impl RecommendationClient {
    pub fn new(api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    fn recommend_url(&self) -> String {
        format!("{}/api/recommend", self.api_url)
    }
}

/// Maps a proxy error response onto the error taxonomy
fn proxy_error(status: StatusCode, body: &str) -> AppError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| format!("Recommendation proxy returned status {}", status));

    match status {
        StatusCode::BAD_REQUEST => AppError::InvalidRequest(message),
        _ => AppError::RecommendationFailure(message),
    }
}

#[async_trait::async_trait]
impl RecommendationSource for RecommendationClient {
    async fn recommend(&self, liked_titles: Vec<String>) -> AppResult<RecommendationOutcome> {
        let request = RecommendRequest {
            liked_movies: liked_titles,
        };

        let response = self
            .http_client
            .post(self.recommend_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::RecommendationFailure(format!("Proxy unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(proxy_error(status, &body));
        }

        response.json::<RecommendationOutcome>().await.map_err(|e| {
            AppError::RecommendationFailure(format!("Failed to parse proxy response: {}", e))
        })
    }
}
