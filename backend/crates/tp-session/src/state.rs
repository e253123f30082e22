use tp_core::{ConnectivityMode, Identity};

use serde::Serialize;

/// What the presentation layer renders from.
///
/// `Initializing` lasts until the startup probe settles; there is no
/// terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "identity", rename_all = "snake_case")]
pub enum SessionState {
    Initializing,
    OnlineUnauthenticated,
    OnlineAuthenticated(Identity),
    OfflineUnauthenticated,
    OfflineAuthenticated(Identity),
}

impl SessionState {
    pub fn from_parts(mode: ConnectivityMode, identity: Option<Identity>) -> Self {
        match (mode, identity) {
            (ConnectivityMode::Online, Some(identity)) => Self::OnlineAuthenticated(identity),
            (ConnectivityMode::Online, None) => Self::OnlineUnauthenticated,
            (ConnectivityMode::Offline, Some(identity)) => Self::OfflineAuthenticated(identity),
            (ConnectivityMode::Offline, None) => Self::OfflineUnauthenticated,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::OnlineAuthenticated(identity) | Self::OfflineAuthenticated(identity) => {
                Some(identity)
            }
            _ => None,
        }
    }

    /// `None` while initializing
    pub fn mode(&self) -> Option<ConnectivityMode> {
        match self {
            Self::Initializing => None,
            Self::OnlineUnauthenticated | Self::OnlineAuthenticated(_) => {
                Some(ConnectivityMode::Online)
            }
            Self::OfflineUnauthenticated | Self::OfflineAuthenticated(_) => {
                Some(ConnectivityMode::Offline)
            }
        }
    }

    pub fn is_offline(&self) -> bool {
        self.mode().is_some_and(|mode| mode.is_offline())
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity().is_some()
    }

    pub fn is_initializing(&self) -> bool {
        matches!(self, Self::Initializing)
    }
}
