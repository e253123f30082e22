use tp_core::OAuthProvider;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OAuthError {
    #[error("Invalid {field} URL '{url}': {source} {location}")]
    InvalidUrl {
        field: &'static str,
        url: String,
        #[source]
        source: url::ParseError,
        location: ErrorLocation,
    },

    #[error("Incomplete {provider} client configuration: {message} {location}")]
    Incomplete {
        provider: OAuthProvider,
        message: String,
        location: ErrorLocation,
    },

    #[error("OAuth state missing or mismatched {location}")]
    StateMismatch { location: ErrorLocation },

    #[error("Provider returned an error: {reason} {location}")]
    Denied {
        reason: String,
        location: ErrorLocation,
    },

    #[error("Request to {endpoint} failed: {source} {location}")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
        location: ErrorLocation,
    },

    #[error("{endpoint} answered {status}: {body} {location}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
        location: ErrorLocation,
    },

    #[error("{provider} profile has no email address {location}")]
    MissingEmail {
        provider: OAuthProvider,
        location: ErrorLocation,
    },
}

impl OAuthError {
    #[track_caller]
    pub fn state_mismatch() -> Self {
        Self::StateMismatch {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn denied(reason: impl Into<String>) -> Self {
        Self::Denied {
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub(crate) fn request(endpoint: &'static str, source: reqwest::Error) -> Self {
        Self::Request {
            endpoint,
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, OAuthError>;
