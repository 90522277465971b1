use std::sync::Arc;

use crate::config::Config;
use crate::services::{
    CsvFallbackSource, KnnPredictor, Predictor, RecommendationDispatcher, ThreadRandom,
};

/// Shared application state
///
/// Everything in here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<RecommendationDispatcher>,
    pub api_key: Arc<str>,
    /// Target length of each recommendation list
    pub reco_count: usize,
}

impl AppState {
    pub fn new(
        dispatcher: RecommendationDispatcher,
        api_key: impl Into<Arc<str>>,
        reco_count: usize,
    ) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            api_key: api_key.into(),
            reco_count,
        }
    }

    /// Builds the production state, loading the k-NN model if its artifact exists
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let knn = KnnPredictor::load_if_exists(&config.knn_model_path)?
            .map(|predictor| Arc::new(predictor) as Arc<dyn Predictor>);

        let dispatcher = RecommendationDispatcher::new(
            knn,
            Arc::new(CsvFallbackSource::new(&config.fallback_csv_path)),
            Arc::new(ThreadRandom),
            config.k_recs,
        );

        tracing::info!(
            knn_loaded = dispatcher.has_knn(),
            fallback_csv = %config.fallback_csv_path,
            k_recs = config.k_recs,
            reco_count = config.reco_count,
            "Application state initialized"
        );

        Ok(Self::new(dispatcher, config.api_key.as_str(), config.reco_count))
    }
}
