#![allow(dead_code)]

use tp_core::{Credentials, Identity, OAuthProvider};
use tp_session::{
    FallbackStore, MemoryFallbackStore, OAuthRedirect, RemoteAuthBackend, SessionError,
    SessionEvents, SessionOptions, SessionState, SessionStore, SessionSubscription, SignUpOutcome,
    StoreError, StoreResult,
};

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

/// How `current_session` should fail, if at all
#[derive(Clone, Copy)]
pub enum SessionFailure {
    Connectivity,
    Unexpected,
}

/// In-process backend with scriptable reachability and failures
#[derive(Default)]
pub struct FakeBackend {
    reachable: bool,
    probe_delay: Option<Duration>,
    session: Mutex<Option<Identity>>,
    session_failure: Mutex<Option<SessionFailure>>,
    change_during_fetch: Mutex<Option<Identity>>,
    requires_confirmation: bool,
    accounts: Mutex<HashMap<String, (String, Identity)>>,
    sign_out_fails: AtomicBool,
    probes: AtomicUsize,
    events: SessionEvents,
}

impl FakeBackend {
    pub fn online() -> Self {
        Self {
            reachable: true,
            ..Self::default()
        }
    }

    pub fn offline() -> Self {
        Self::default()
    }

    /// Reachable, but the probe takes `delay` to answer
    pub fn slow(delay: Duration) -> Self {
        Self {
            reachable: true,
            probe_delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn with_session(self, identity: Identity) -> Self {
        *self.session.lock().unwrap() = Some(identity);
        self
    }

    pub fn with_session_failure(self, failure: SessionFailure) -> Self {
        *self.session_failure.lock().unwrap() = Some(failure);
        self
    }

    /// Sign-ups create the account but open no session
    pub fn requiring_confirmation(self) -> Self {
        Self {
            requires_confirmation: true,
            ..self
        }
    }

    /// Publish `identity` while `current_session` is still in flight
    pub fn with_change_during_fetch(self, identity: Identity) -> Self {
        *self.change_during_fetch.lock().unwrap() = Some(identity);
        self
    }

    pub fn fail_sign_out(&self) {
        self.sign_out_fails.store(true, Ordering::SeqCst);
    }

    pub fn account_count(&self) -> usize {
        self.accounts.lock().unwrap().len()
    }

    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    /// Simulate a session change observed by the backend itself
    pub fn push(&self, identity: Option<Identity>) {
        self.events.publish(identity);
    }
}

#[async_trait]
impl RemoteAuthBackend for FakeBackend {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn probe(&self) -> tp_session::Result<()> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.probe_delay {
            tokio::time::sleep(delay).await;
        }
        if self.reachable {
            Ok(())
        } else {
            Err(SessionError::connectivity("connection refused"))
        }
    }

    async fn current_session(&self) -> tp_session::Result<Option<Identity>> {
        if let Some(identity) = self.change_during_fetch.lock().unwrap().take() {
            self.events.publish(Some(identity));
        }
        match *self.session_failure.lock().unwrap() {
            Some(SessionFailure::Connectivity) => {
                Err(SessionError::connectivity("connection reset"))
            }
            Some(SessionFailure::Unexpected) => Err(SessionError::unexpected("500")),
            None => Ok(self.session.lock().unwrap().clone()),
        }
    }

    async fn sign_up(&self, credentials: &Credentials) -> tp_session::Result<SignUpOutcome> {
        let email = credentials.validate()?;
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(&email) {
            return Err(SessionError::duplicate_account());
        }

        let identity = Identity::new(format!("user-{}", accounts.len() + 1), email.clone());
        accounts.insert(email, (credentials.password.clone(), identity.clone()));
        if self.requires_confirmation {
            return Ok(SignUpOutcome::awaiting_confirmation(identity));
        }
        *self.session.lock().unwrap() = Some(identity.clone());
        Ok(SignUpOutcome::signed_in(identity))
    }

    async fn sign_in(&self, credentials: &Credentials) -> tp_session::Result<Identity> {
        let email = credentials.validate()?;
        let accounts = self.accounts.lock().unwrap();
        match accounts.get(&email) {
            Some((password, identity)) if *password == credentials.password => {
                *self.session.lock().unwrap() = Some(identity.clone());
                Ok(identity.clone())
            }
            _ => Err(SessionError::invalid_credentials()),
        }
    }

    async fn sign_in_with_oauth(
        &self,
        provider: OAuthProvider,
    ) -> tp_session::Result<OAuthRedirect> {
        Ok(OAuthRedirect {
            provider,
            url: format!("https://fake.test/authorize?provider={provider}"),
        })
    }

    async fn complete_oauth(&self, callback_url: &str) -> tp_session::Result<Identity> {
        if !callback_url.contains("token=") {
            return Err(SessionError::rejected("OAUTH_FAILED", "cancelled"));
        }
        let identity = Identity::new("oauth-user", "oauth@example.com")
            .with_name(Some(String::from("OAuth User")));
        *self.session.lock().unwrap() = Some(identity.clone());
        Ok(identity)
    }

    async fn sign_out(&self) -> tp_session::Result<()> {
        *self.session.lock().unwrap() = None;
        if self.sign_out_fails.load(Ordering::SeqCst) {
            return Err(SessionError::connectivity("logout timed out"));
        }
        Ok(())
    }

    fn subscribe(&self) -> SessionSubscription {
        self.events.subscribe()
    }
}

/// Store whose writes always fail
#[derive(Default)]
pub struct ReadOnlyStore {
    inner: MemoryFallbackStore,
}

impl ReadOnlyStore {
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::default();
        store.inner.set(key, value).unwrap();
        store
    }
}

impl FallbackStore for ReadOnlyStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, _key: &str, _value: &str) -> StoreResult<()> {
        Err(StoreError::file_write(
            "session.json".into(),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        ))
    }

    fn remove(&self, _key: &str) -> StoreResult<()> {
        Err(StoreError::file_write(
            "session.json".into(),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        ))
    }
}

pub fn fast_options() -> SessionOptions {
    SessionOptions {
        probe_timeout: Duration::from_millis(200),
        ..SessionOptions::default()
    }
}

pub async fn started_store(
    backend: Arc<FakeBackend>,
    fallback: Arc<dyn FallbackStore>,
) -> SessionStore {
    let store = SessionStore::new(backend, fallback, fast_options());
    store.start().await;
    store
}

/// Wait until the store publishes a state satisfying `predicate`
pub async fn wait_for_state(
    store: &SessionStore,
    predicate: impl Fn(&SessionState) -> bool,
) -> SessionState {
    let mut rx = store.watch();
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if predicate(&rx.borrow_and_update()) {
                return rx.borrow().clone();
            }
            rx.changed().await.unwrap();
        }
    })
    .await
    .expect("state never reached")
}

pub fn credentials(email: &str, password: &str) -> Credentials {
    Credentials::new(email, password)
}
