use crate::{CoreError, Result as CoreErrorResult};

use std::fmt;
use std::panic::Location;

use error_location::ErrorLocation;

/// Email/password pair submitted to sign-up or sign-in. Never stored.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Validate shape before the pair is sent anywhere that verifies it.
    ///
    /// Returns the normalized email.
    #[track_caller]
    pub fn validate(&self) -> CoreErrorResult<String> {
        let email = normalize_email(&self.email).ok_or_else(|| CoreError::Validation {
            message: "email must look like name@domain".to_string(),
            field: Some("email".to_string()),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if self.password.is_empty() {
            return Err(CoreError::Validation {
                message: "password cannot be empty".to_string(),
                field: Some("password".to_string()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(email)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Trim and lowercase an email, rejecting anything without exactly one `@`
/// between non-empty parts.
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    let (local, domain) = normalized.split_once('@')?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return None;
    }
    Some(normalized)
}
