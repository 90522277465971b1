pub mod model_name;
pub mod recommendation;

pub use model_name::ModelName;
pub use recommendation::{
    user_exists, ItemId, RecoResponse, UserId, DEFAULT_RECO_COUNT, MAX_USER_ID,
};
