//! REST API error types
//!
//! These errors are designed to produce consistent JSON responses
//! with appropriate HTTP status codes.

use tp_auth::AuthError;
use tp_core::{CoreError, OAuthProvider};
use tp_db::DbError;

use std::panic::Location;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use error_location::ErrorLocation;
use serde::Serialize;
use thiserror::Error;

/// JSON error response body
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

/// Inner error body with code, message, and optional field
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    /// Machine-readable error code (e.g., "DUPLICATE_ACCOUNT", "VALIDATION_ERROR")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Field name if this is a validation error for a specific field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// API errors with associated HTTP status codes
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing input (400)
    #[error("Validation failed: {message} {location}")]
    Validation {
        message: String,
        field: Option<String>,
        location: ErrorLocation,
    },

    /// Sign-up with an email that already has an account (400)
    #[error("Duplicate account {location}")]
    DuplicateAccount { location: ErrorLocation },

    /// Unknown email or wrong password (400)
    #[error("Invalid credentials {location}")]
    InvalidCredentials { location: ErrorLocation },

    /// Missing, malformed or expired bearer token (401)
    #[error("Unauthorized ({code}): {message} {location}")]
    Unauthorized {
        code: &'static str,
        message: String,
        location: ErrorLocation,
    },

    /// Resource not found (404)
    #[error("Resource not found: {message} {location}")]
    NotFound {
        message: String,
        location: ErrorLocation,
    },

    /// OAuth requested for a provider without client credentials (503)
    #[error("Provider not configured: {provider} {location}")]
    ProviderNotConfigured {
        provider: OAuthProvider,
        location: ErrorLocation,
    },

    /// Internal server error (500)
    #[error("Internal error: {message} {location}")]
    Internal {
        message: String,
        location: ErrorLocation,
    },
}

impl ApiError {
    #[track_caller]
    pub fn invalid_credentials() -> Self {
        Self::InvalidCredentials {
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
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// HTTP status this error is answered with
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::DuplicateAccount { .. } => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::ProviderNotConfigured { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Client mistakes are routine; only our own failures are errors
        let status = self.status();
        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::warn!("{}", self);
        }

        let body = match self {
            ApiError::Validation { message, field, .. } => ApiErrorBody {
                code: "VALIDATION_ERROR".into(),
                message,
                field,
            },
            ApiError::DuplicateAccount { .. } => ApiErrorBody {
                code: "DUPLICATE_ACCOUNT".into(),
                message: "An account with this email already exists".into(),
                field: Some("email".into()),
            },
            ApiError::InvalidCredentials { .. } => ApiErrorBody {
                code: "INVALID_CREDENTIALS".into(),
                message: "Invalid credentials".into(),
                field: None,
            },
            ApiError::Unauthorized { code, message, .. } => ApiErrorBody {
                code: code.into(),
                message,
                field: None,
            },
            ApiError::NotFound { message, .. } => ApiErrorBody {
                code: "NOT_FOUND".into(),
                message,
                field: None,
            },
            ApiError::ProviderNotConfigured { provider, .. } => ApiErrorBody {
                code: "PROVIDER_NOT_CONFIGURED".into(),
                message: format!("{} sign-in is not configured", provider.label()),
                field: None,
            },
            ApiError::Internal { message, .. } => ApiErrorBody {
                code: "INTERNAL_ERROR".into(),
                message,
                field: None,
            },
        };

        (status, Json(ApiErrorResponse { error: body })).into_response()
    }
}

/// Convert database errors to API errors
impl From<DbError> for ApiError {
    #[track_caller]
    fn from(e: DbError) -> Self {
        match e {
            DbError::Duplicate { ref field, .. } if field == "email" => ApiError::DuplicateAccount {
                location: ErrorLocation::from(Location::caller()),
            },
            other => {
                // Don't expose internal database details to clients
                log::error!("Database error: {}", other);
                ApiError::Internal {
                    message: "Database operation failed".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                }
            }
        }
    }
}

/// Convert token and password errors to API errors
impl From<AuthError> for ApiError {
    #[track_caller]
    fn from(e: AuthError) -> Self {
        if !e.is_client_error() {
            log::error!("Auth error: {}", e);
            return ApiError::Internal {
                message: "Authentication failed".to_string(),
                location: ErrorLocation::from(Location::caller()),
            };
        }

        let (code, message) = match e {
            AuthError::TokenExpired { .. } => ("TOKEN_EXPIRED", "Token has expired".to_string()),
            AuthError::MissingHeader { .. } => {
                ("UNAUTHORIZED", "Authorization header is required".to_string())
            }
            other => ("UNAUTHORIZED", format!("Invalid token ({})", other.error_code())),
        };

        ApiError::Unauthorized {
            code,
            message,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Convert domain validation errors to API errors
impl From<CoreError> for ApiError {
    #[track_caller]
    fn from(e: CoreError) -> Self {
        let (message, field) = match e {
            CoreError::Validation { message, field, .. } => (message, field),
            CoreError::InvalidOAuthProvider { value, .. } => {
                (format!("Unknown provider '{value}'"), None)
            }
            CoreError::InvalidConnectivityMode { value, .. } => {
                (format!("Unknown connectivity mode '{value}'"), None)
            }
        };
        ApiError::Validation {
            message,
            field,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Unparseable or incomplete JSON bodies are validation failures
impl From<JsonRejection> for ApiError {
    #[track_caller]
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation {
            message: rejection.body_text(),
            field: None,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
