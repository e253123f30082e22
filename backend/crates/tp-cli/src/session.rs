//! Wiring a [`SessionStore`] from configuration

use crate::{Cli, CliResult};

use tp_config::{BackendKind, Config, SessionConfig};
use tp_session::{
    FallbackStore, FileFallbackStore, HostedAuthBackend, LegacyAuthBackend, RemoteAuthBackend,
    SessionOptions, SessionStore, TokenCache,
};

use std::path::PathBuf;
use std::sync::Arc;

use log::debug;

/// Apply the global `--backend`, `--url` and `--api-key` flags, then
/// re-validate the session section.
pub fn apply_overrides(session: &mut SessionConfig, cli: &Cli) -> CliResult<()> {
    if let Some(ref backend) = cli.backend {
        session.backend = backend.parse::<BackendKind>()?;
    }
    if let Some(ref url) = cli.url {
        session.backend_url = url.clone();
    }
    if let Some(ref api_key) = cli.api_key {
        session.api_key = Some(api_key.clone());
    }

    session.validate()?;
    Ok(())
}

/// The adapter `session.backend` selects, keeping its token in `tokens`
pub fn build_backend(session: &SessionConfig, tokens: TokenCache) -> Arc<dyn RemoteAuthBackend> {
    match session.backend {
        BackendKind::Hosted => {
            let api_key = session.api_key.as_deref().unwrap_or_default();
            Arc::new(
                HostedAuthBackend::new(&session.backend_url, api_key, tokens)
                    .with_redirect_to(session.oauth_redirect_to.clone()),
            )
        }
        BackendKind::Legacy => Arc::new(LegacyAuthBackend::new(&session.backend_url, tokens)),
    }
}

/// Store backed by the file fallback under the config directory
pub fn build_store(config: &Config) -> CliResult<SessionStore> {
    Ok(build_store_at(&config.session, config.fallback_store_path()?))
}

/// Store whose fallback file lives at `path`.
///
/// The backend token is kept in the same file, under `session.token_key`,
/// so consecutive invocations share one session.
pub fn build_store_at(session: &SessionConfig, path: PathBuf) -> SessionStore {
    debug!("Session file: {}", path.display());

    let fallback: Arc<dyn FallbackStore> = Arc::new(FileFallbackStore::new(path));
    let tokens = TokenCache::persistent(Arc::clone(&fallback), session.token_key.clone());
    let backend = build_backend(session, tokens);

    SessionStore::new(
        backend,
        fallback,
        SessionOptions {
            probe_timeout: session.probe_timeout(),
            identity_key: session.identity_key.clone(),
        },
    )
}
