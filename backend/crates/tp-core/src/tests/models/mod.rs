mod credentials;
mod identity;
mod oauth_provider;
mod user;
