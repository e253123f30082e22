pub mod error;
pub mod models;

#[cfg(test)]
mod tests;

pub use error::{CoreError, Result};
pub use models::connectivity_mode::ConnectivityMode;
pub use models::credentials::{Credentials, normalize_email};
pub use models::identity::{Identity, OFFLINE_USER_ID};
pub use models::oauth_provider::OAuthProvider;
pub use models::user::User;
