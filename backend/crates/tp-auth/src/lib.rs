pub mod bearer;
pub mod claims;
pub mod error;
pub mod jwt_issuer;
pub mod jwt_validator;
pub mod password_hasher;

pub use bearer::bearer_token;
pub use claims::Claims;
pub use error::{AuthError, Result};
pub use jwt_issuer::JwtIssuer;
pub use jwt_validator::JwtValidator;
pub use password_hasher::PasswordHasher;

/// Lifetime of tokens minted by the local auth service
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

/// bcrypt work factor for stored passwords
pub const DEFAULT_BCRYPT_COST: u32 = 12;

#[cfg(test)]
mod tests;
