/// Recommendation model abstraction
///
/// A predictor ranks item ids for a single user. Implementations are loaded once at
/// startup and are read-only afterwards, so they are shared across requests behind an
/// `Arc` without locking.
use crate::{
    error::AppResult,
    models::{ItemId, UserId},
};

pub mod knn;

pub use knn::{KnnModel, KnnPredictor};

/// Trait for trained recommendation models
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Predictor: Send + Sync {
    /// Returns up to `n` ranked item ids for the user
    async fn predict(&self, user_id: UserId, n: usize) -> AppResult<Vec<ItemId>>;

    /// Predictor name for logging and debugging
    fn name(&self) -> &'static str;
}
