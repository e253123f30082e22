pub mod connectivity_mode;
pub mod credentials;
pub mod identity;
pub mod oauth_provider;
pub mod user;
