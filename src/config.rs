use serde::Deserialize;

use crate::models::DEFAULT_RECO_COUNT;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Static bearer token required on `/reco` routes
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// Length of the placeholder list served by `some_model`
    #[serde(default = "default_k_recs")]
    pub k_recs: usize,

    /// Target length of a recommendation list
    #[serde(default = "default_reco_count")]
    pub reco_count: usize,

    /// Serialized k-NN model, loaded once at startup if present
    #[serde(default = "default_knn_model_path")]
    pub knn_model_path: String,

    /// Precomputed per-user recommendations for the `ALS` strategy
    #[serde(default = "default_fallback_csv_path")]
    pub fallback_csv_path: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_api_key() -> String {
    "i_love_recsys".to_string()
}

fn default_k_recs() -> usize {
    10
}

fn default_reco_count() -> usize {
    DEFAULT_RECO_COUNT
}

fn default_knn_model_path() -> String {
    "recmodels/knn.json".to_string()
}

fn default_fallback_csv_path() -> String {
    "recmodels/als_recs.csv".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
