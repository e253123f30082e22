//! The session store state machine.
//!
//! `Initializing` until [`SessionStore::start`] settles the connectivity
//! mode, then one of the online/offline x authenticated/unauthenticated
//! states for the rest of the store's life. Every identity change is
//! mirrored to the fallback store before watchers are notified.

use crate::{
    DEFAULT_IDENTITY_KEY, DEFAULT_PROBE_TIMEOUT, FallbackStore, OAuthRedirect, RemoteAuthBackend,
    Result as SessionResult, SessionError, SessionState, SessionSubscription,
};

use tp_core::{ConnectivityMode, Credentials, Identity, OAuthProvider, normalize_email};

use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Upper bound for the startup reachability probe
    pub probe_timeout: Duration,
    /// Fallback store key holding the serialized identity
    pub identity_key: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            identity_key: String::from(DEFAULT_IDENTITY_KEY),
        }
    }
}

pub struct SessionStore {
    inner: Arc<Inner>,
    listener: StdMutex<Option<JoinHandle<()>>>,
}

struct Inner {
    backend: Arc<dyn RemoteAuthBackend>,
    fallback: Arc<dyn FallbackStore>,
    options: SessionOptions,
    /// Serializes mutations; the last one to finish wins
    mutation: Mutex<()>,
    state: watch::Sender<SessionState>,
}

impl SessionStore {
    pub fn new(
        backend: Arc<dyn RemoteAuthBackend>,
        fallback: Arc<dyn FallbackStore>,
        options: SessionOptions,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::Initializing);
        Self {
            inner: Arc::new(Inner {
                backend,
                fallback,
                options,
                mutation: Mutex::new(()),
                state,
            }),
            listener: StdMutex::new(None),
        }
    }

    /// Decide the connectivity mode and load the initial identity.
    ///
    /// Runs once; later calls return the current state.
    pub async fn start(&self) -> SessionState {
        let _guard = self.inner.mutation.lock().await;

        if !self.inner.state.borrow().is_initializing() {
            return self.state();
        }
        self.inner.state.send_replace(SessionState::Initializing);

        let backend = &self.inner.backend;
        let probe = tokio::time::timeout(self.inner.options.probe_timeout, backend.probe()).await;
        let online = match probe {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                warn!("{} backend unreachable, starting offline: {e}", backend.name());
                false
            }
            Err(_) => {
                warn!(
                    "{} backend probe timed out after {:?}, starting offline",
                    backend.name(),
                    self.inner.options.probe_timeout
                );
                false
            }
        };

        if online {
            // Subscribe first so a change published during the fetch still arrives
            let subscription = backend.subscribe();
            match backend.current_session().await {
                Ok(identity) => {
                    self.inner.commit(ConnectivityMode::Online, identity);
                    self.spawn_listener(subscription);
                    return self.state();
                }
                Err(e) if e.is_connectivity() => {
                    warn!("Lost backend while fetching session, starting offline: {e}");
                }
                Err(e) => {
                    error!("Could not fetch current session: {e}");
                    self.inner.commit(ConnectivityMode::Online, None);
                    self.spawn_listener(subscription);
                    return self.state();
                }
            }
        }

        let cached = self.inner.load_cached_identity();
        self.inner
            .state
            .send_replace(SessionState::from_parts(ConnectivityMode::Offline, cached));
        info!("Session store running in offline mode");
        self.state()
    }

    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.inner.state.borrow().identity().cloned()
    }

    /// `None` until started
    pub fn mode(&self) -> Option<ConnectivityMode> {
        self.inner.state.borrow().mode()
    }

    /// Offline sign-ins are unverified; render a persistent indicator
    pub fn is_offline(&self) -> bool {
        self.inner.state.borrow().is_offline()
    }

    /// Receiver that wakes on every published state
    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    pub async fn sign_up(&self, credentials: &Credentials) -> SessionResult<Identity> {
        let _guard = self.inner.mutation.lock().await;

        match self.started_mode()? {
            ConnectivityMode::Online => {
                let outcome = self.inner.backend.sign_up(credentials).await?;
                if outcome.session_established {
                    self.inner
                        .commit(ConnectivityMode::Online, Some(outcome.identity.clone()));
                } else {
                    info!(
                        "Account {} created without a session, staying signed out",
                        outcome.identity.id
                    );
                }
                Ok(outcome.identity)
            }
            ConnectivityMode::Offline => self.sign_in_offline(credentials),
        }
    }

    pub async fn sign_in(&self, credentials: &Credentials) -> SessionResult<Identity> {
        let _guard = self.inner.mutation.lock().await;

        match self.started_mode()? {
            ConnectivityMode::Online => {
                let identity = self.inner.backend.sign_in(credentials).await?;
                self.inner
                    .commit(ConnectivityMode::Online, Some(identity.clone()));
                Ok(identity)
            }
            ConnectivityMode::Offline => self.sign_in_offline(credentials),
        }
    }

    /// Start an OAuth sign-in; the caller navigates to the returned URL.
    pub async fn sign_in_with_oauth(&self, provider: OAuthProvider) -> SessionResult<OAuthRedirect> {
        match self.started_mode()? {
            ConnectivityMode::Online => self.inner.backend.sign_in_with_oauth(provider).await,
            ConnectivityMode::Offline => Err(SessionError::offline_unavailable(format!(
                "Sign-in with {}",
                provider.label()
            ))),
        }
    }

    /// Finish an OAuth sign-in from the provider's callback URL
    pub async fn complete_oauth(&self, callback_url: &str) -> SessionResult<Identity> {
        let _guard = self.inner.mutation.lock().await;

        match self.started_mode()? {
            ConnectivityMode::Online => {
                let identity = self.inner.backend.complete_oauth(callback_url).await?;
                self.inner
                    .commit(ConnectivityMode::Online, Some(identity.clone()));
                Ok(identity)
            }
            ConnectivityMode::Offline => Err(SessionError::offline_unavailable("OAuth sign-in")),
        }
    }

    /// Clear the identity locally in every mode. A backend failure is
    /// returned only after the local state is already cleared.
    pub async fn sign_out(&self) -> SessionResult<()> {
        let _guard = self.inner.mutation.lock().await;

        let mode = self.started_mode()?;
        let remote = match mode {
            ConnectivityMode::Online => self.inner.backend.sign_out().await,
            ConnectivityMode::Offline => Ok(()),
        };

        self.inner.commit(mode, None);

        if let Err(ref e) = remote {
            warn!("Backend sign-out failed after local sign-out: {e}");
        }
        remote
    }

    /// Stop listening for backend session changes
    pub fn shutdown(&self) {
        let handle = self
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.abort();
            debug!("Session listener stopped");
        }
    }

    /// True while the backend listener task is alive
    pub fn is_listening(&self) -> bool {
        self.listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn started_mode(&self) -> SessionResult<ConnectivityMode> {
        self.mode().ok_or_else(SessionError::not_started)
    }

    /// Offline: no password is checked, the sentinel identity stands in
    fn sign_in_offline(&self, credentials: &Credentials) -> SessionResult<Identity> {
        if normalize_email(&credentials.email).is_none() {
            return Err(SessionError::invalid_input(
                "email must look like name@domain",
                Some("email"),
            ));
        }

        let identity = Identity::offline(credentials.email.trim());
        self.inner
            .commit(ConnectivityMode::Offline, Some(identity.clone()));
        Ok(identity)
    }

    fn spawn_listener(&self, mut subscription: SessionSubscription) {
        let inner = Arc::clone(&self.inner);

        let handle = tokio::spawn(async move {
            while let Some(identity) = subscription.next().await {
                let _guard = inner.mutation.lock().await;
                debug!(
                    "Backend session change: {}",
                    identity.as_ref().map_or("signed out", |i| i.id.as_str())
                );
                inner.commit(ConnectivityMode::Online, identity);
            }
            debug!("Backend closed session change stream");
        });

        let previous = self
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }
}

impl Drop for SessionStore {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Inner {
    /// Mirror to the fallback store, then publish. Callers hold `mutation`.
    fn commit(&self, mode: ConnectivityMode, identity: Option<Identity>) {
        let key = &self.options.identity_key;
        let mirrored = match identity {
            Some(ref identity) => serde_json::to_string(identity)
                .map_err(|e| e.to_string())
                .and_then(|json| self.fallback.set(key, &json).map_err(|e| e.to_string())),
            None => self.fallback.remove(key).map_err(|e| e.to_string()),
        };
        if let Err(e) = mirrored {
            error!("Could not update fallback store, continuing: {e}");
        }

        self.state
            .send_replace(SessionState::from_parts(mode, identity));
    }

    /// Cached identity for offline startup. A corrupted entry is removed.
    fn load_cached_identity(&self) -> Option<Identity> {
        let key = &self.options.identity_key;

        let raw = match self.fallback.get(key) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Could not read cached identity: {e}");
                if e.is_corrupted()
                    && let Err(e) = self.fallback.remove(key)
                {
                    error!("Could not clear corrupted fallback store: {e}");
                }
                return None;
            }
        };

        match serde_json::from_str::<Identity>(&raw) {
            Ok(identity) => {
                info!("Restored cached identity {}", identity.id);
                Some(identity)
            }
            Err(e) => {
                warn!("Cached identity is corrupted, discarding: {e}");
                if let Err(e) = self.fallback.remove(key) {
                    error!("Could not remove corrupted identity: {e}");
                }
                None
            }
        }
    }
}
