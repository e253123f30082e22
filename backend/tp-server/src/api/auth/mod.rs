pub mod auth;
pub mod login_request;
pub mod oauth;
pub mod signup_request;
pub mod token_response;
