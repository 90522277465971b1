pub mod dispatcher;
pub mod fallback;
pub mod predictors;
pub mod random;

pub use dispatcher::{pad_with_supplemental, RecommendationDispatcher, SUPPLEMENTAL_ITEMS};
pub use fallback::{CsvFallbackSource, FallbackSource};
pub use predictors::{KnnModel, KnnPredictor, Predictor};
pub use random::{RandomSource, SeededRandom, ThreadRandom};
