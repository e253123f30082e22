//! User entity - the record the local auth service keeps per account.

use crate::{Identity, OAuthProvider};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored account. Keyed by email; OAuth accounts link a provider subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    /// bcrypt hash; `None` for accounts created through OAuth only
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
    pub facebook_id: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new local (email/password) account
    pub fn new(email: String, name: Option<String>, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            name,
            password_hash: Some(password_hash),
            google_id: None,
            facebook_id: None,
            avatar_url: None,
            created_at: Utc::now(),
        }
    }

    /// Create a new account from a provider profile
    pub fn from_oauth(
        provider: OAuthProvider,
        subject: String,
        email: String,
        name: Option<String>,
        avatar_url: Option<String>,
    ) -> Self {
        let mut user = Self {
            id: Uuid::new_v4(),
            email,
            name,
            password_hash: None,
            google_id: None,
            facebook_id: None,
            avatar_url,
            created_at: Utc::now(),
        };
        user.link_provider(provider, subject);
        user
    }

    pub fn provider_id(&self, provider: OAuthProvider) -> Option<&str> {
        match provider {
            OAuthProvider::Google => self.google_id.as_deref(),
            OAuthProvider::Facebook => self.facebook_id.as_deref(),
        }
    }

    pub fn link_provider(&mut self, provider: OAuthProvider, subject: String) {
        match provider {
            OAuthProvider::Google => self.google_id = Some(subject),
            OAuthProvider::Facebook => self.facebook_id = Some(subject),
        }
    }

    /// Whether this account can log in with a password
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }

    pub fn to_identity(&self) -> Identity {
        Identity::new(self.id.to_string(), self.email.clone())
            .with_name(self.name.clone())
            .with_avatar_url(self.avatar_url.clone())
    }
}
