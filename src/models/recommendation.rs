use serde::{Deserialize, Serialize};

use super::Movie;

/// A generated recommendation in canonical form
///
/// The generation backend answers either `{title, reason}` or `{title, year}`
/// depending on the prompt; both shapes are folded into this type at the proxy
/// boundary so callers never deal with the difference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recommendation {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

/// Raw item shape produced by the generation backend
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GeneratedItem {
    WithReason { title: String, reason: String },
    WithYear { title: String, year: GeneratedYear },
}

/// Models emit the year as a number or as a string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GeneratedYear {
    Number(i32),
    Text(String),
}

impl GeneratedYear {
    fn value(&self) -> Option<i32> {
        match self {
            GeneratedYear::Number(year) => Some(*year),
            GeneratedYear::Text(text) => text.trim().parse().ok(),
        }
    }
}

impl From<GeneratedItem> for Recommendation {
    fn from(item: GeneratedItem) -> Self {
        match item {
            GeneratedItem::WithReason { title, reason } => Self {
                title,
                reason: Some(reason),
                year: None,
            },
            GeneratedItem::WithYear { title, year } => Self {
                title,
                reason: None,
                year: year.value(),
            },
        }
    }
}

/// Request body of `POST /api/recommend`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    #[serde(default)]
    pub liked_movies: Vec<String>,
}

/// Successful response of `POST /api/recommend`
///
/// Serializes as `{"recommendations": [...]}` or `{"movies": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationOutcome {
    Recommendations(Vec<Recommendation>),
    Movies(Vec<Movie>),
}

impl RecommendationOutcome {
    pub fn len(&self) -> usize {
        match self {
            RecommendationOutcome::Recommendations(items) => items.len(),
            RecommendationOutcome::Movies(movies) => movies.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Error body returned by the proxy alongside a non-2xx status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
