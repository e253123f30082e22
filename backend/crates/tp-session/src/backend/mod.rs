pub mod hosted;
pub mod legacy;
pub mod token_cache;

pub(crate) mod http;

use crate::{Result as SessionResult, SessionSubscription};

use tp_core::{Credentials, Identity, OAuthProvider};

use async_trait::async_trait;
use serde::Serialize;

/// Where the presentation layer must send the user to continue an OAuth
/// sign-in. The identity arrives later through `complete_oauth`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OAuthRedirect {
    pub provider: OAuthProvider,
    pub url: String,
}

/// Account creation result. A backend may create the account without
/// opening a session, e.g. while email confirmation is pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpOutcome {
    pub identity: Identity,
    pub session_established: bool,
}

impl SignUpOutcome {
    pub fn signed_in(identity: Identity) -> Self {
        Self {
            identity,
            session_established: true,
        }
    }

    pub fn awaiting_confirmation(identity: Identity) -> Self {
        Self {
            identity,
            session_established: false,
        }
    }
}

/// A remote session provider, adapted onto [`Identity`].
#[async_trait]
pub trait RemoteAuthBackend: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// One reachability check. Any error means "offline".
    async fn probe(&self) -> SessionResult<()>;

    /// Session the backend already knows about, if any
    async fn current_session(&self) -> SessionResult<Option<Identity>>;

    async fn sign_up(&self, credentials: &Credentials) -> SessionResult<SignUpOutcome>;

    async fn sign_in(&self, credentials: &Credentials) -> SessionResult<Identity>;

    async fn sign_in_with_oauth(&self, provider: OAuthProvider) -> SessionResult<OAuthRedirect>;

    /// Finish an OAuth sign-in from the URL the provider redirected back to
    async fn complete_oauth(&self, callback_url: &str) -> SessionResult<Identity>;

    async fn sign_out(&self) -> SessionResult<()>;

    /// Session changes the backend observes on its own (refresh, sign-out
    /// elsewhere, OAuth completion).
    fn subscribe(&self) -> SessionSubscription;
}
