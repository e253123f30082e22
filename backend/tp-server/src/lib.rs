pub mod api;
pub mod error;
pub mod health;
pub mod logger;
pub mod oauth;
pub mod routes;
pub mod state;

#[cfg(test)]
mod tests;

pub use api::{
    auth::{
        auth::{login, signup},
        login_request::LoginRequest,
        oauth::{oauth_callback, oauth_start},
        signup_request::SignupRequest,
        token_response::TokenResponse,
    },
    error::ApiError,
    error::Result as ApiResult,
    extractors::auth_user::AuthUser,
    user::user::me,
};
pub use error::{Result as ServerResult, ServerError};
pub use oauth::{OAuthClient, OAuthError, OAuthSettings, ProviderEndpoints};
pub use routes::build_router;
pub use state::AppState;
