use serde::{Deserialize, Serialize};

/// Body returned by sign-up and login
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    #[serde(rename = "userId")]
    pub user_id: String,
}
