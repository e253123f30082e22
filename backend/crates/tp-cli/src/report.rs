use tp_session::{OAuthRedirect, SessionState};

use serde::Serialize;

const OFFLINE_WARNING: &str = "Warning: the auth server is unreachable. Running in offline mode: \
    the identity shown was not verified and OAuth sign-in is unavailable.";

/// What a command prints on stdout
#[derive(Debug, Serialize)]
pub struct Report {
    pub session: SessionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth: Option<OAuthRedirect>,
}

impl Report {
    pub fn new(session: SessionState, oauth: Option<OAuthRedirect>) -> Self {
        Self { session, oauth }
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

/// Line printed on stderr whenever the session runs offline
pub fn offline_warning(state: &SessionState) -> Option<&'static str> {
    state.is_offline().then_some(OFFLINE_WARNING)
}
