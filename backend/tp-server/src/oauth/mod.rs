//! Authorization-code sign-in against Google and Facebook.
//!
//! The server keeps one [`OAuthClient`] per configured provider. A sign-in
//! runs in two requests: the start handler redirects the browser to the
//! provider with a random `state` (also kept in a cookie), and the callback
//! handler checks that state, exchanges the code, reads the profile and
//! resolves the local account.

pub mod error;
pub mod oauth_client;
pub mod oauth_settings;
pub mod provider_endpoints;

pub use error::{OAuthError, Result};
pub use oauth_client::OAuthClient;
pub use oauth_settings::OAuthSettings;
pub use provider_endpoints::ProviderEndpoints;
