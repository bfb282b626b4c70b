//! AI recommendation round-trip
//!
//! The proxy side ([`RecommendationEngine`]) turns a list of liked titles into a
//! generation prompt, parses the model's JSON answer and, when a catalog is
//! configured, resolves each generated title back into a catalog movie. The
//! client side ([`RecommendationClient`], [`RecommendationsPanel`]) talks to the
//! proxy over HTTP and keeps the results on screen.
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{
        unique_by_id, GeneratedItem, Movie, Recommendation, RecommendationOutcome,
    },
    services::catalog::CatalogProvider,
};

pub mod backend;
pub mod client;
pub mod panel;

pub use backend::{GenerationBackend, OllamaBackend};
pub use client::RecommendationClient;
pub use panel::{PanelView, RecommendationsPanel};

/// Number of recommendations requested from the model
pub const RECOMMENDATION_COUNT: usize = 5;

/// Anything that answers a list of liked titles with recommendations
#[async_trait::async_trait]
pub trait RecommendationSource: Send + Sync {
    async fn recommend(&self, liked_titles: Vec<String>) -> AppResult<RecommendationOutcome>;
}

/// Which fields the model is asked to produce per item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStyle {
    /// `{title, reason}`, shown to the user as-is
    Reasons,
    /// `{title, year}`, looked up in the catalog afterwards
    Years,
}

pub fn build_prompt(liked_titles: &[String], style: PromptStyle) -> String {
    let (fields, shape) = match style {
        PromptStyle::Reasons => (
            "- title\n- short reason",
            r#"{ "title": "...", "reason": "..." }"#,
        ),
        PromptStyle::Years => (
            "- title\n- release year",
            r#"{ "title": "...", "year": 0000 }"#,
        ),
    };

    format!(
        r#"# Identity
You are a movie recommendation engine.

# Instructions
Based on these liked movies: {liked}
Recommend {count} movies
Only recommend movies with IMDB rating is greater than 6/10
For each movie, give:
{fields}

Return JSON only in this format:
[
    {shape}
]
Return ONLY valid JSON.
Do not include explanations.
Do not include markdown.
Do not include text outside JSON.
The response must start with '[' and end with ']'."#,
        liked = liked_titles.join(", "),
        count = RECOMMENDATION_COUNT,
    )
}

/// Parses the model's raw answer into canonical recommendations
pub fn parse_recommendations(raw: &str) -> AppResult<Vec<Recommendation>> {
    let items: Vec<GeneratedItem> = serde_json::from_str(raw.trim()).map_err(|e| {
        tracing::error!(error = %e, raw = %raw, "Unparsable generation output");
        AppError::RecommendationFailure(format!("Model output is not a recommendation list: {}", e))
    })?;

    Ok(items.into_iter().map(Recommendation::from).collect())
}

/// Picks the catalog match for a generated recommendation
///
/// Prefers a result released in the generated year, else the first result.
fn pick_match(candidates: Vec<Movie>, year: Option<i32>) -> Option<Movie> {
    if let Some(year) = year {
        if let Some(exact) = candidates.iter().find(|m| m.release_year() == Some(year)) {
            return Some(exact.clone());
        }
    }
    candidates.into_iter().next()
}

/// Proxy-side recommendation pipeline
pub struct RecommendationEngine {
    backend: Arc<dyn GenerationBackend>,
    catalog: Option<Arc<dyn CatalogProvider>>,
}

impl RecommendationEngine {
    /// Engine answering with `{title, reason}` recommendations
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            backend,
            catalog: None,
        }
    }

    /// Engine answering with catalog movies
    pub fn resolving(backend: Arc<dyn GenerationBackend>, catalog: Arc<dyn CatalogProvider>) -> Self {
        Self {
            backend,
            catalog: Some(catalog),
        }
    }

    pub fn prompt_style(&self) -> PromptStyle {
        match self.catalog {
            Some(_) => PromptStyle::Years,
            None => PromptStyle::Reasons,
        }
    }

    pub async fn recommend(&self, liked_titles: &[String]) -> AppResult<RecommendationOutcome> {
        if liked_titles.iter().all(|t| t.trim().is_empty()) {
            return Err(AppError::InvalidRequest(
                "No liked movies provided".to_string(),
            ));
        }

        let prompt = build_prompt(liked_titles, self.prompt_style());
        let raw = self.backend.generate(&prompt).await?;
        let recommendations = parse_recommendations(&raw)?;

        tracing::info!(
            liked = liked_titles.len(),
            generated = recommendations.len(),
            backend = self.backend.name(),
            "Recommendations generated"
        );

        match &self.catalog {
            None => Ok(RecommendationOutcome::Recommendations(recommendations)),
            Some(catalog) => Ok(RecommendationOutcome::Movies(
                Self::resolve(catalog, recommendations).await,
            )),
        }
    }

    /// Looks every recommendation up in the catalog; unresolved titles are dropped
    async fn resolve(
        catalog: &Arc<dyn CatalogProvider>,
        recommendations: Vec<Recommendation>,
    ) -> Vec<Movie> {
        let mut tasks = Vec::new();

        for rec in recommendations {
            let catalog = catalog.clone();
            let task = tokio::spawn(async move {
                let result = catalog.search(&rec.title, 1).await;
                (rec, result)
            });
            tasks.push(task);
        }

        let mut resolved = Vec::new();

        for task in tasks {
            match task.await {
                Ok((rec, Ok(page))) => match pick_match(page.results, rec.year) {
                    Some(movie) => resolved.push(movie),
                    None => tracing::warn!(
                        title = %rec.title,
                        year = ?rec.year,
                        "No catalog match for recommendation"
                    ),
                },
                Ok((rec, Err(e))) => {
                    tracing::warn!(
                        title = %rec.title,
                        error = %e,
                        "Catalog lookup failed for recommendation"
                    );
                }
                Err(e) => {
                    tracing::error!(error = %e, "Task join error");
                }
            }
        }

        unique_by_id(resolved)
    }
}

#[async_trait::async_trait]
impl RecommendationSource for RecommendationEngine {
    async fn recommend(&self, liked_titles: Vec<String>) -> AppResult<RecommendationOutcome> {
        RecommendationEngine::recommend(self, &liked_titles).await
    }
}
