use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use movie_tracker::{
    config::Config,
    routes::{create_router, AppState},
    services::{OllamaBackend, RecommendationEngine, TmdbClient},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("movie_tracker=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let backend = Arc::new(OllamaBackend::new(
        config.ollama_url.clone(),
        config.ollama_model.clone(),
    ));

    let engine = if config.resolve_recommendations {
        let api_key = config
            .tmdb_api_key
            .clone()
            .context("TMDB_API_KEY is required when RESOLVE_RECOMMENDATIONS is set")?;
        let catalog = Arc::new(TmdbClient::new(api_key, config.tmdb_api_url.clone()));
        RecommendationEngine::resolving(backend, catalog)
    } else {
        RecommendationEngine::new(backend)
    };

    tracing::info!(
        model = %config.ollama_model,
        resolve = config.resolve_recommendations,
        "Recommendation engine configured"
    );

    let app = create_router(AppState::new(engine));

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(addr = %addr, "Recommendation proxy listening");

    axum::serve(listener, app).await?;
    Ok(())
}
