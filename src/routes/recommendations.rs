use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::{RecommendRequest, RecommendationOutcome},
    routes::AppState,
};

/// Handler for the recommendation endpoint
///
/// A body that is not a usable `{likedMovies}` object (wrong content type,
/// malformed JSON, `null` or non-string entries) counts as no liked movies.
pub async fn recommend(
    State(state): State<AppState>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> AppResult<Json<RecommendationOutcome>> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "Rejected recommendation request body");
        AppError::InvalidRequest("No liked movies provided".to_string())
    })?;

    tracing::info!(
        liked_count = request.liked_movies.len(),
        "Processing recommendation request"
    );

    let outcome = state.engine.recommend(&request.liked_movies).await?;

    tracing::info!(count = outcome.len(), "Recommendation request completed");

    Ok(Json(outcome))
}
