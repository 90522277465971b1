use serde::Deserialize;
use std::path::PathBuf;
use tracing::instrument;

use crate::{
    error::AppResult,
    models::{ItemId, UserId},
};

/// Source of precomputed recommendations read from static data
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait FallbackSource: Send + Sync {
    /// Returns the user's precomputed item ids in rank order
    async fn get(&self, user_id: UserId) -> AppResult<Vec<ItemId>>;
}

#[derive(Debug, Deserialize)]
struct FallbackRecord {
    user_id: UserId,
    item_id: ItemId,
}

/// Reads a `user_id,item_id` CSV on every lookup
///
/// Rows for a user are expected in rank order. The file is not cached so it can be
/// replaced on disk without restarting the service.
#[derive(Debug, Clone)]
pub struct CsvFallbackSource {
    path: PathBuf,
}

impl CsvFallbackSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl FallbackSource for CsvFallbackSource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn get(&self, user_id: UserId) -> AppResult<Vec<ItemId>> {
        let data = tokio::fs::read(&self.path).await?;
        let mut reader = csv::Reader::from_reader(data.as_slice());

        let mut items = Vec::new();
        for record in reader.deserialize::<FallbackRecord>() {
            let record = record?;
            if record.user_id == user_id {
                items.push(record.item_id);
            }
        }

        tracing::debug!(count = items.len(), "Fallback recommendations read");
        Ok(items)
    }
}
