use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Text generation backend used to produce recommendations
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Returns the raw completion for `prompt`
    ///
    /// Any transport or backend failure is a `RecommendationFailure`.
    async fn generate(&self, prompt: &str) -> AppResult<String>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Local Ollama server, non-streaming `/api/generate`
#[derive(Clone)]
pub struct OllamaBackend {
    http_client: HttpClient,
    api_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaBackend {
    pub fn new(api_url: String, model: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            model,
        }
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.api_url)
    }
}

#[async_trait::async_trait]
impl GenerationBackend for OllamaBackend {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .http_client
            .post(self.generate_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::RecommendationFailure(format!("Ollama request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::RecommendationFailure(format!(
                "Ollama returned status {}: {}",
                status, body
            )));
        }

        let generated: GenerateResponse = response.json().await.map_err(|e| {
            AppError::RecommendationFailure(format!("Failed to parse Ollama response: {}", e))
        })?;

        tracing::debug!(
            model = %self.model,
            chars = generated.response.len(),
            "Ollama generation completed"
        );

        Ok(generated.response)
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}
