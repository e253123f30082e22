use tp_core::CoreError;

use std::panic::Location;
use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error;

/// How the presentation layer should react to a failed session operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Shown inline next to the form; never fatal
    Validation,
    /// Backend unreachable; recovered by offline mode at startup
    Connectivity,
    /// Logged and shown as a generic retry message
    Unexpected,
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Invalid input: {message} {location}")]
    InvalidInput {
        message: String,
        field: Option<String>,
        location: ErrorLocation,
    },

    #[error("An account with this email already exists {location}")]
    DuplicateAccount { location: ErrorLocation },

    #[error("Invalid email or password {location}")]
    InvalidCredentials { location: ErrorLocation },

    #[error("Backend rejected request: {message} (code: {code}) {location}")]
    Rejected {
        code: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("{operation} is unavailable offline {location}")]
    OfflineUnavailable {
        operation: String,
        location: ErrorLocation,
    },

    #[error("Session store has not been started {location}")]
    NotStarted { location: ErrorLocation },

    #[error("Backend unreachable: {message} {location}")]
    Connectivity {
        message: String,
        location: ErrorLocation,
    },

    #[error("Unexpected backend response: {message} {location}")]
    Unexpected {
        message: String,
        location: ErrorLocation,
    },

    #[error("JSON error: {source} {location}")]
    Json {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. }
            | Self::DuplicateAccount { .. }
            | Self::InvalidCredentials { .. }
            | Self::Rejected { .. }
            | Self::OfflineUnavailable { .. } => ErrorKind::Validation,
            Self::Connectivity { .. } => ErrorKind::Connectivity,
            Self::NotStarted { .. } | Self::Unexpected { .. } | Self::Json { .. } => {
                ErrorKind::Unexpected
            }
        }
    }

    pub fn is_connectivity(&self) -> bool {
        self.kind() == ErrorKind::Connectivity
    }

    /// Message safe to show next to a form or in a toast
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput { message, .. } | Self::Rejected { message, .. } => message.clone(),
            Self::DuplicateAccount { .. } => {
                "An account with this email already exists.".to_string()
            }
            Self::InvalidCredentials { .. } => "Invalid email or password.".to_string(),
            Self::OfflineUnavailable { operation, .. } => {
                format!("{operation} is unavailable in offline mode.")
            }
            Self::Connectivity { .. } => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            Self::NotStarted { .. } | Self::Unexpected { .. } | Self::Json { .. } => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }

    #[track_caller]
    pub fn invalid_input(message: impl Into<String>, field: Option<&str>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: field.map(String::from),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn duplicate_account() -> Self {
        Self::DuplicateAccount {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_credentials() -> Self {
        Self::InvalidCredentials {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn rejected(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            code: code.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn offline_unavailable(operation: impl Into<String>) -> Self {
        Self::OfflineUnavailable {
            operation: operation.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn not_started() -> Self {
        Self::NotStarted {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn connectivity(message: impl Into<String>) -> Self {
        Self::Connectivity {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Transport failures are connectivity errors; anything reqwest reports
    /// about a response it did receive is unexpected.
    #[track_caller]
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_request() || err.is_body() {
            Self::connectivity(err.to_string())
        } else {
            Self::unexpected(err.to_string())
        }
    }
}

impl From<reqwest::Error> for SessionError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        SessionError::from_reqwest(err)
    }
}

impl From<serde_json::Error> for SessionError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        SessionError::Json {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<CoreError> for SessionError {
    #[track_caller]
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { message, field, .. } => SessionError::InvalidInput {
                message,
                field,
                location: ErrorLocation::from(Location::caller()),
            },
            other => SessionError::invalid_input(other.to_string(), None),
        }
    }
}

pub type Result<T> = StdResult<T, SessionError>;
