use serde::{Deserialize, Serialize};

/// Users above this id are treated as nonexistent
pub const MAX_USER_ID: u64 = 1_000_000_000;

/// Default length of a recommendation list
pub const DEFAULT_RECO_COUNT: usize = 10;

pub type UserId = u64;
pub type ItemId = u64;

/// Returns true if the id falls inside the range of known users
pub fn user_exists(user_id: UserId) -> bool {
    user_id <= MAX_USER_ID
}

/// Recommendations returned for a single user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecoResponse {
    pub user_id: UserId,
    pub items: Vec<ItemId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_exists_boundary() {
        assert!(user_exists(0));
        assert!(user_exists(MAX_USER_ID));
        assert!(!user_exists(MAX_USER_ID + 1));
    }

    #[test]
    fn test_reco_response_serialization() {
        let response = RecoResponse {
            user_id: 42,
            items: vec![0, 1, 2],
        };
        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"user_id":42,"items":[0,1,2]}"#
        );
    }
}
