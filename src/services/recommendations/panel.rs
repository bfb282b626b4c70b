use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::RecommendationOutcome,
    services::{liked_movies::LikedStore, recommendations::RecommendationSource},
};

/// Message shown for any failed round-trip
pub const FAILURE_MESSAGE: &str = "Could not get recommendations. Please try again.";

#[derive(Debug, Clone, Default, Serialize)]
pub struct PanelView {
    pub is_loading: bool,
    pub outcome: Option<RecommendationOutcome>,
    pub error: Option<String>,
}

/// Recommendations section of the liked-movies page
#[derive(Clone)]
pub struct RecommendationsPanel {
    source: Arc<dyn RecommendationSource>,
    view: Arc<RwLock<PanelView>>,
}

impl RecommendationsPanel {
    pub fn new(source: Arc<dyn RecommendationSource>) -> Self {
        Self {
            source,
            view: Arc::new(RwLock::new(PanelView::default())),
        }
    }

    pub async fn view(&self) -> PanelView {
        self.view.read().await.clone()
    }

    /// Requests recommendations for the current liked set
    ///
    /// An empty liked set is rejected locally. A trigger while a request is
    /// outstanding is ignored. A success replaces whatever was shown before;
    /// a failure clears it.
    ///
    /// The round-trip runs on its own task, so dropping the returned future
    /// does not abandon the loading state: the task still records the outcome.
    pub async fn request(&self, liked: &LikedStore) -> AppResult<()> {
        let titles = liked.titles().await;
        if titles.is_empty() {
            return Err(AppError::InvalidRequest(
                "No liked movies provided".to_string(),
            ));
        }

        {
            let mut view = self.view.write().await;
            if view.is_loading {
                tracing::debug!("Recommendation request already in flight");
                return Ok(());
            }
            view.is_loading = true;
        }

        tracing::info!(liked = titles.len(), "Requesting recommendations");

        let source = self.source.clone();
        let view = self.view.clone();
        let task = tokio::spawn(async move {
            let result = source.recommend(titles).await;
            Self::record(&view, result).await
        });

        match task.await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(error = %e, "Recommendation task join error");
                Self::record(
                    &self.view,
                    Err(AppError::Internal(format!("Recommendation task failed: {}", e))),
                )
                .await
            }
        }
    }

    async fn record(
        view: &RwLock<PanelView>,
        result: AppResult<RecommendationOutcome>,
    ) -> AppResult<()> {
        let mut view = view.write().await;
        view.is_loading = false;
        match result {
            Ok(outcome) => {
                tracing::info!(count = outcome.len(), "Recommendations received");
                view.outcome = Some(outcome);
                view.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Recommendation request failed");
                view.outcome = None;
                view.error = Some(FAILURE_MESSAGE.to_string());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::MemoryStorage,
        models::{Movie, Recommendation},
    };
    use std::sync::Mutex;
    use std::time::Duration;

    /// Returns queued outcomes in order and records every submitted title list
    #[derive(Default)]
    struct ScriptedSource {
        outcomes: Mutex<Vec<AppResult<RecommendationOutcome>>>,
        submissions: Mutex<Vec<Vec<String>>>,
        delay: Option<Duration>,
    }

    impl ScriptedSource {
        fn answering(outcomes: Vec<AppResult<RecommendationOutcome>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes),
                ..Default::default()
            }
        }

        fn submissions(&self) -> Vec<Vec<String>> {
            self.submissions.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl RecommendationSource for ScriptedSource {
        async fn recommend(&self, liked_titles: Vec<String>) -> AppResult<RecommendationOutcome> {
            self.submissions.lock().unwrap().push(liked_titles);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let mut outcomes = self.outcomes.lock().unwrap();
            if outcomes.is_empty() {
                return Err(AppError::RecommendationFailure("script exhausted".into()));
            }
            outcomes.remove(0)
        }
    }

    fn recommendations(titles: &[&str]) -> RecommendationOutcome {
        RecommendationOutcome::Recommendations(
            titles
                .iter()
                .map(|t| Recommendation {
                    title: t.to_string(),
                    reason: Some(format!("Because of {}", t)),
                    year: None,
                })
                .collect(),
        )
    }

    fn movie(id: u64, title: &str) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            poster_path: None,
            release_date: None,
            vote_average: 8.0,
            popularity: 50.0,
        }
    }

    async fn liked(titles: &[(u64, &str)]) -> LikedStore {
        let store = LikedStore::initialize(Arc::new(MemoryStorage::new())).await;
        for (id, title) in titles {
            store.toggle(movie(*id, title)).await;
        }
        store
    }

    #[tokio::test]
    async fn test_empty_liked_set_is_rejected_locally() {
        let source = Arc::new(ScriptedSource::default());
        let panel = RecommendationsPanel::new(source.clone());

        let result = panel.request(&liked(&[]).await).await;

        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
        assert!(source.submissions().is_empty());
        assert!(!panel.view().await.is_loading);
    }

    #[tokio::test]
    async fn test_titles_sent_in_liked_order() {
        let source = Arc::new(ScriptedSource::answering(vec![Ok(recommendations(&[
            "Interstellar",
        ]))]));
        let panel = RecommendationsPanel::new(source.clone());

        let liked = liked(&[(27205, "Inception"), (329865, "Arrival")]).await;
        panel.request(&liked).await.unwrap();

        assert_eq!(
            source.submissions(),
            vec![vec!["Inception".to_string(), "Arrival".to_string()]]
        );
        let view = panel.view().await;
        assert_eq!(view.outcome, Some(recommendations(&["Interstellar"])));
        assert!(!view.is_loading);
    }

    #[tokio::test]
    async fn test_new_results_replace_previous() {
        let source = Arc::new(ScriptedSource::answering(vec![
            Ok(recommendations(&["Heat", "Ronin"])),
            Ok(recommendations(&["Collateral"])),
        ]));
        let panel = RecommendationsPanel::new(source);
        let liked = liked(&[(1, "Thief")]).await;

        panel.request(&liked).await.unwrap();
        panel.request(&liked).await.unwrap();

        assert_eq!(panel.view().await.outcome, Some(recommendations(&["Collateral"])));
    }

    #[tokio::test]
    async fn test_failure_clears_results_and_shows_message() {
        let source = Arc::new(ScriptedSource::answering(vec![
            Ok(recommendations(&["Heat"])),
            Err(AppError::RecommendationFailure("model offline".into())),
        ]));
        let panel = RecommendationsPanel::new(source);
        let liked = liked(&[(1, "Thief")]).await;

        panel.request(&liked).await.unwrap();
        let result = panel.request(&liked).await;

        assert!(matches!(result, Err(AppError::RecommendationFailure(_))));
        let view = panel.view().await;
        assert_eq!(view.outcome, None);
        assert_eq!(view.error.as_deref(), Some(FAILURE_MESSAGE));
        assert!(!view.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_while_loading_is_ignored() {
        let source = Arc::new(ScriptedSource {
            outcomes: Mutex::new(vec![Ok(recommendations(&["Heat"]))]),
            delay: Some(Duration::from_secs(2)),
            ..Default::default()
        });
        let panel = RecommendationsPanel::new(source.clone());
        let liked = liked(&[(1, "Thief")]).await;

        let first = {
            let panel = panel.clone();
            let liked = liked.clone();
            tokio::spawn(async move { panel.request(&liked).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(panel.view().await.is_loading);

        panel.request(&liked).await.unwrap();
        first.await.unwrap().unwrap();

        assert_eq!(source.submissions().len(), 1);
        assert_eq!(panel.view().await.outcome, Some(recommendations(&["Heat"])));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_request_still_clears_loading() {
        let source = Arc::new(ScriptedSource {
            outcomes: Mutex::new(vec![
                Ok(recommendations(&["Heat"])),
                Ok(recommendations(&["Ronin"])),
            ]),
            delay: Some(Duration::from_secs(5)),
            ..Default::default()
        });
        let panel = RecommendationsPanel::new(source.clone());
        let liked = liked(&[(1, "Thief")]).await;

        let abandoned =
            tokio::time::timeout(Duration::from_secs(1), panel.request(&liked)).await;
        assert!(abandoned.is_err());
        assert!(panel.view().await.is_loading);

        tokio::time::sleep(Duration::from_secs(5)).await;
        let view = panel.view().await;
        assert!(!view.is_loading);
        assert_eq!(view.outcome, Some(recommendations(&["Heat"])));

        panel.request(&liked).await.unwrap();
        assert_eq!(source.submissions().len(), 2);
        assert_eq!(panel.view().await.outcome, Some(recommendations(&["Ronin"])));
    }
}
