//! Identity - the minimal profile of whoever is signed in.

use serde::{Deserialize, Serialize};

/// Id carried by the placeholder identity synthesized in offline mode.
pub const OFFLINE_USER_ID: &str = "offline-user";

/// Authenticated user's profile as held by the session store.
///
/// Both auth backends are adapted into this one shape; the serialized form is
/// what the local fallback store keeps under its identity key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque backend-assigned id (UUID for both backends, sentinel offline)
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl Identity {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: None,
            avatar_url: None,
        }
    }

    /// Placeholder identity used when the remote backend is unreachable.
    ///
    /// No credential was verified to produce it.
    pub fn offline(email: impl Into<String>) -> Self {
        Self::new(OFFLINE_USER_ID, email)
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn with_avatar_url(mut self, avatar_url: Option<String>) -> Self {
        self.avatar_url = avatar_url;
        self
    }

    /// True for the sentinel identity synthesized offline
    pub fn is_offline_sentinel(&self) -> bool {
        self.id == OFFLINE_USER_ID
    }

    /// Name to show in a user menu, falling back to the email's local part
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.email.split('@').next().unwrap_or(&self.email),
        }
    }
}
