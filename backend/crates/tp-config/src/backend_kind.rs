use crate::{ConfigError, ConfigErrorResult};

use std::str::FromStr;

use serde::Deserialize;

/// Which remote auth backend the session store talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Hosted GoTrue-compatible auth service
    Hosted,
    /// The local auth service in this workspace
    #[default]
    Legacy,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hosted => "hosted",
            Self::Legacy => "legacy",
        }
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    #[track_caller]
    fn from_str(s: &str) -> ConfigErrorResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hosted" => Ok(Self::Hosted),
            "legacy" => Ok(Self::Legacy),
            other => Err(ConfigError::session(format!(
                "unknown backend '{other}', expected 'hosted' or 'legacy'"
            ))),
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
