use crate::{AuthError, DEFAULT_BCRYPT_COST, Result as AuthErrorResult};

use std::panic::Location;

use error_location::ErrorLocation;

/// bcrypt hashing for stored passwords.
///
/// Both calls are CPU-bound; async callers should run them on a blocking
/// thread.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    #[track_caller]
    pub fn hash(&self, password: &str) -> AuthErrorResult<String> {
        bcrypt::hash(password, self.cost).map_err(|e| AuthError::PasswordHash {
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Compare a candidate password against a stored hash.
    ///
    /// A malformed stored hash is an error, a mismatch is `Ok(false)`.
    #[track_caller]
    pub fn verify(&self, password: &str, hash: &str) -> AuthErrorResult<bool> {
        bcrypt::verify(password, hash).map_err(|e| AuthError::PasswordHash {
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}
