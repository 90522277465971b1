use std::{collections::HashSet, sync::Arc};
use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    models::{user_exists, ItemId, ModelName, UserId},
    services::{fallback::FallbackSource, predictors::Predictor, random::RandomSource},
};

/// Items appended, in this order, when the `ALS` source returns too few ids
pub const SUPPLEMENTAL_ITEMS: [ItemId; 10] =
    [10440, 15297, 9728, 13865, 4151, 3734, 2657, 4880, 142, 6809];

/// Chooses a recommendation strategy per request and shapes its output
///
/// All collaborators are injected at construction. The k-NN predictor is optional:
/// when the model artifact was absent at startup, `knn` requests fail with an
/// internal error instead of being served.
pub struct RecommendationDispatcher {
    knn: Option<Arc<dyn Predictor>>,
    fallback: Arc<dyn FallbackSource>,
    random: Arc<dyn RandomSource>,
    k_recs: usize,
}

impl RecommendationDispatcher {
    pub fn new(
        knn: Option<Arc<dyn Predictor>>,
        fallback: Arc<dyn FallbackSource>,
        random: Arc<dyn RandomSource>,
        k_recs: usize,
    ) -> Self {
        Self {
            knn,
            fallback,
            random,
            k_recs,
        }
    }

    pub fn has_knn(&self) -> bool {
        self.knn.is_some()
    }

    /// Validates the model name and user id, then runs the selected strategy
    ///
    /// Fails with `ModelNotFound` for an unrecognised model and `UserNotFound` for ids
    /// above the known-user range. The model check runs first.
    #[instrument(skip(self))]
    pub async fn dispatch(
        &self,
        model_name: &str,
        user_id: UserId,
        n: usize,
    ) -> AppResult<Vec<ItemId>> {
        let model: ModelName = model_name.parse()?;

        if !user_exists(user_id) {
            return Err(AppError::UserNotFound(user_id.to_string()));
        }

        self.recommend(model, user_id, n).await
    }

    /// Runs a strategy for an already validated request
    pub async fn recommend(
        &self,
        model: ModelName,
        user_id: UserId,
        n: usize,
    ) -> AppResult<Vec<ItemId>> {
        let items = match model {
            ModelName::BestRandom => self.best_random(n),
            ModelName::Knn => self.knn(user_id, n).await?,
            ModelName::Als => self.als(user_id, n).await?,
            ModelName::SomeModel => self.placeholder(),
        };

        tracing::debug!(model = %model, count = items.len(), "Strategy finished");
        Ok(items)
    }

    /// Random permutation of `0..n`
    fn best_random(&self, n: usize) -> Vec<ItemId> {
        let mut items: Vec<ItemId> = (0..n as ItemId).collect();
        self.random.shuffle(&mut items);
        items
    }

    async fn knn(&self, user_id: UserId, n: usize) -> AppResult<Vec<ItemId>> {
        let predictor = self
            .knn
            .as_ref()
            .ok_or_else(|| AppError::Internal("knn model is not loaded".to_string()))?;

        tracing::debug!(predictor = predictor.name(), user_id, n, "Calling predictor");
        predictor.predict(user_id, n).await
    }

    async fn als(&self, user_id: UserId, n: usize) -> AppResult<Vec<ItemId>> {
        let primary = self.fallback.get(user_id).await?;
        let items = pad_with_supplemental(primary, n);

        if items.len() < n {
            tracing::warn!(
                user_id,
                count = items.len(),
                target = n,
                "ALS recommendations shorter than requested"
            );
        }

        Ok(items)
    }

    fn placeholder(&self) -> Vec<ItemId> {
        (0..self.k_recs as ItemId).collect()
    }
}

/// Keeps the first `n` distinct ids of `primary`, then tops up from
/// [`SUPPLEMENTAL_ITEMS`] skipping ids already present
///
/// May return fewer than `n` ids once the supplemental list is exhausted.
pub fn pad_with_supplemental(primary: Vec<ItemId>, n: usize) -> Vec<ItemId> {
    let mut seen = HashSet::with_capacity(n);
    let mut items = Vec::with_capacity(n);

    for item in primary.into_iter().take(n) {
        if seen.insert(item) {
            items.push(item);
        }
    }

    for item in SUPPLEMENTAL_ITEMS {
        if items.len() >= n {
            break;
        }
        if seen.insert(item) {
            items.push(item);
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{
        fallback::MockFallbackSource, predictors::MockPredictor, random::SeededRandom,
    };

    fn create_dispatcher(
        knn: Option<MockPredictor>,
        fallback: MockFallbackSource,
        k_recs: usize,
    ) -> RecommendationDispatcher {
        RecommendationDispatcher::new(
            knn.map(|p| Arc::new(p) as Arc<dyn Predictor>),
            Arc::new(fallback),
            Arc::new(SeededRandom::new(42)),
            k_recs,
        )
    }

    fn unused_fallback() -> MockFallbackSource {
        let mut fallback = MockFallbackSource::new();
        fallback.expect_get().never();
        fallback
    }

    #[tokio::test]
    async fn test_unknown_model() {
        let dispatcher = create_dispatcher(None, unused_fallback(), 10);
        let result = dispatcher.dispatch("unknown_model", 1, 10).await;
        assert!(matches!(result, Err(AppError::ModelNotFound(ref name)) if name == "unknown_model"));
    }

    #[tokio::test]
    async fn test_user_above_threshold() {
        let dispatcher = create_dispatcher(None, unused_fallback(), 10);
        for model in ModelName::ALL {
            let result = dispatcher
                .dispatch(model.as_str(), 1_000_000_001, 10)
                .await;
            assert!(matches!(result, Err(AppError::UserNotFound(ref id)) if id == "1000000001"));
        }
    }

    #[tokio::test]
    async fn test_model_checked_before_user() {
        let dispatcher = create_dispatcher(None, unused_fallback(), 10);
        let result = dispatcher.dispatch("nope", 1_000_000_001, 10).await;
        assert!(matches!(result, Err(AppError::ModelNotFound(_))));
    }

    #[tokio::test]
    async fn test_some_model_returns_placeholder() {
        let dispatcher = create_dispatcher(None, unused_fallback(), 5);
        let items = dispatcher.dispatch("some_model", 42, 10).await.unwrap();
        assert_eq!(items, vec![0, 1, 2, 3, 4]);

        let other_user = dispatcher.dispatch("some_model", 7, 10).await.unwrap();
        assert_eq!(other_user, items);
    }

    #[tokio::test]
    async fn test_best_random_is_permutation() {
        let dispatcher = create_dispatcher(None, unused_fallback(), 10);
        let mut items = dispatcher.dispatch("best_random", 1, 10).await.unwrap();
        assert_eq!(items.len(), 10);
        items.sort_unstable();
        assert_eq!(items, (0..10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_best_random_is_deterministic_with_seeded_source() {
        let a = create_dispatcher(None, unused_fallback(), 10);
        let b = create_dispatcher(None, unused_fallback(), 10);
        assert_eq!(
            a.dispatch("best_random", 1, 10).await.unwrap(),
            b.dispatch("best_random", 1, 10).await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_knn_returns_predictor_output_unchanged() {
        let mut predictor = MockPredictor::new();
        predictor
            .expect_predict()
            .withf(|user_id, n| *user_id == 3 && *n == 10)
            .times(1)
            .returning(|_, _| Ok(vec![5, 5, 1]));

        let dispatcher = create_dispatcher(Some(predictor), unused_fallback(), 10);
        let items = dispatcher.dispatch("knn", 3, 10).await.unwrap();
        assert_eq!(items, vec![5, 5, 1]);
    }

    #[tokio::test]
    async fn test_knn_without_model_is_internal_error() {
        let dispatcher = create_dispatcher(None, unused_fallback(), 10);
        assert!(!dispatcher.has_knn());
        let result = dispatcher.dispatch("knn", 3, 10).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_knn_predictor_error_propagates() {
        let mut predictor = MockPredictor::new();
        predictor
            .expect_predict()
            .returning(|_, _| Err(AppError::Internal("model exploded".to_string())));

        let dispatcher = create_dispatcher(Some(predictor), unused_fallback(), 10);
        let result = dispatcher.dispatch("knn", 3, 10).await;
        assert!(matches!(result, Err(AppError::Internal(ref msg)) if msg == "model exploded"));
    }

    #[tokio::test]
    async fn test_als_pads_short_fallback() {
        let mut fallback = MockFallbackSource::new();
        fallback
            .expect_get()
            .withf(|user_id| *user_id == 9)
            .times(1)
            .returning(|_| Ok(vec![1, 15297, 2]));

        let dispatcher = create_dispatcher(None, fallback, 10);
        let items = dispatcher.dispatch("ALS", 9, 10).await.unwrap();
        assert_eq!(
            items,
            vec![1, 15297, 2, 10440, 9728, 13865, 4151, 3734, 2657, 4880]
        );
    }

    #[tokio::test]
    async fn test_als_fallback_error_propagates() {
        let mut fallback = MockFallbackSource::new();
        fallback
            .expect_get()
            .returning(|_| Err(AppError::Internal("csv unreadable".to_string())));

        let dispatcher = create_dispatcher(None, fallback, 10);
        assert!(dispatcher.dispatch("ALS", 9, 10).await.is_err());
    }

    #[test]
    fn test_pad_keeps_first_n_of_long_source() {
        let primary: Vec<ItemId> = (100..120).collect();
        assert_eq!(pad_with_supplemental(primary, 10), (100..110).collect::<Vec<_>>());
    }

    #[test]
    fn test_pad_empty_source_uses_supplement_in_order() {
        assert_eq!(pad_with_supplemental(vec![], 10), SUPPLEMENTAL_ITEMS.to_vec());
    }

    #[test]
    fn test_pad_removes_duplicates() {
        let items = pad_with_supplemental(vec![7, 7, 10440, 7], 10);
        assert_eq!(
            items,
            vec![7, 10440, 15297, 9728, 13865, 4151, 3734, 2657, 4880, 142]
        );
        let unique: HashSet<_> = items.iter().collect();
        assert_eq!(unique.len(), items.len());
    }

    #[test]
    fn test_pad_can_return_short_list() {
        let items = pad_with_supplemental(vec![1, 2], 15);
        assert_eq!(items.len(), 12);
        assert_eq!(&items[..2], &[1, 2]);
        assert_eq!(&items[2..], &SUPPLEMENTAL_ITEMS);
    }
}
