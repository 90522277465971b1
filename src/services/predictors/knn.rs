/// User-based k-nearest-neighbours predictor
///
/// The artifact is a JSON document holding every known user's interacted items and a
/// popularity-ordered item list:
///
/// ```json
/// { "k": 30, "interactions": { "42": [1, 7, 9] }, "popular": [7, 1, 3] }
/// ```
///
/// Neighbours are ranked by Jaccard similarity of their item sets. Candidate items are
/// scored by the summed similarity of the neighbours that interacted with them, items
/// the user has already seen are dropped, and the list is topped up from `popular`.
/// Users absent from the artifact receive the popular items.
use serde::{Deserialize, Serialize};
use std::{
    collections::{HashMap, HashSet},
    path::Path,
};
use tracing::instrument;

use crate::{
    error::AppResult,
    models::{ItemId, UserId},
    services::predictors::Predictor,
};

const DEFAULT_NEIGHBOURS: usize = 30;

fn default_neighbours() -> usize {
    DEFAULT_NEIGHBOURS
}

/// Serialized form of the k-NN model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KnnModel {
    /// Number of neighbours consulted per prediction
    #[serde(default = "default_neighbours")]
    pub k: usize,
    /// Items each known user has interacted with
    pub interactions: HashMap<UserId, Vec<ItemId>>,
    /// Items ordered by global popularity, used for cold users and padding
    #[serde(default)]
    pub popular: Vec<ItemId>,
}

pub struct KnnPredictor {
    k: usize,
    user_items: HashMap<UserId, HashSet<ItemId>>,
    popular: Vec<ItemId>,
}

impl KnnPredictor {
    pub fn new(model: KnnModel) -> Self {
        let user_items = model
            .interactions
            .into_iter()
            .map(|(user_id, items)| (user_id, items.into_iter().collect()))
            .collect();

        Self {
            k: model.k,
            user_items,
            popular: model.popular,
        }
    }

    /// Reads and deserializes a model artifact
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read knn model {}: {}", path.display(), e)
        })?;
        let model: KnnModel = serde_json::from_str(&raw).map_err(|e| {
            anyhow::anyhow!("Failed to parse knn model {}: {}", path.display(), e)
        })?;

        tracing::info!(
            path = %path.display(),
            users = model.interactions.len(),
            k = model.k,
            "Loaded knn model"
        );

        Ok(Self::new(model))
    }

    /// Loads the artifact if the file exists, `None` otherwise
    ///
    /// A file that exists but cannot be parsed is still an error.
    pub fn load_if_exists(path: impl AsRef<Path>) -> anyhow::Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(path = %path.display(), "knn model not found, knn strategy disabled");
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    fn jaccard(a: &HashSet<ItemId>, b: &HashSet<ItemId>) -> f64 {
        let intersection = a.intersection(b).count();
        if intersection == 0 {
            return 0.0;
        }
        let union = a.len() + b.len() - intersection;
        intersection as f64 / union as f64
    }

    /// Top `k` most similar users, most similar first
    fn neighbours(&self, user_id: UserId, items: &HashSet<ItemId>) -> Vec<(UserId, f64)> {
        let mut scored: Vec<(UserId, f64)> = self
            .user_items
            .iter()
            .filter(|(other, _)| **other != user_id)
            .map(|(other, other_items)| (*other, Self::jaccard(items, other_items)))
            .filter(|(_, similarity)| *similarity > 0.0)
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(self.k);
        scored
    }

    fn rank(&self, user_id: UserId, n: usize) -> Vec<ItemId> {
        let empty = HashSet::new();
        let seen = self.user_items.get(&user_id).unwrap_or(&empty);

        let mut scores: HashMap<ItemId, f64> = HashMap::new();
        if !seen.is_empty() {
            for (neighbour, similarity) in self.neighbours(user_id, seen) {
                for item in &self.user_items[&neighbour] {
                    if !seen.contains(item) {
                        *scores.entry(*item).or_insert(0.0) += similarity;
                    }
                }
            }
        }

        let mut ranked: Vec<(ItemId, f64)> = scores.into_iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        let mut result: Vec<ItemId> = ranked.into_iter().map(|(item, _)| item).take(n).collect();
        let mut present: HashSet<ItemId> = result.iter().copied().collect();

        for item in &self.popular {
            if result.len() >= n {
                break;
            }
            if !seen.contains(item) && present.insert(*item) {
                result.push(*item);
            }
        }

        result
    }
}

#[async_trait::async_trait]
impl Predictor for KnnPredictor {
    #[instrument(skip(self))]
    async fn predict(&self, user_id: UserId, n: usize) -> AppResult<Vec<ItemId>> {
        let items = self.rank(user_id, n);
        tracing::debug!(count = items.len(), "knn prediction ready");
        Ok(items)
    }

    fn name(&self) -> &'static str {
        "knn"
    }
}
