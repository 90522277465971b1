use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::AppError;

/// Recommendation strategy selected by the `{model_name}` path segment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ModelName {
    /// Placeholder list `0..k_recs`
    #[serde(rename = "some_model")]
    SomeModel,
    /// Random permutation of the candidate range
    #[serde(rename = "best_random")]
    BestRandom,
    /// User-based k-nearest-neighbours model
    #[serde(rename = "knn")]
    Knn,
    /// Precomputed ALS recommendations padded with a fixed item list
    #[serde(rename = "ALS")]
    Als,
}

impl ModelName {
    /// Every recognised model, in the order they are documented
    pub const ALL: [ModelName; 4] = [
        ModelName::SomeModel,
        ModelName::BestRandom,
        ModelName::Knn,
        ModelName::Als,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelName::SomeModel => "some_model",
            ModelName::BestRandom => "best_random",
            ModelName::Knn => "knn",
            ModelName::Als => "ALS",
        }
    }
}

impl FromStr for ModelName {
    type Err = AppError;

    /// Exact, case-sensitive match against the wire names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelName::ALL
            .into_iter()
            .find(|model| model.as_str() == s)
            .ok_or_else(|| AppError::ModelNotFound(s.to_string()))
    }
}

impl Display for ModelName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
